//! Authentication module for the PIN flow.
//!
//! This module provides:
//! - `PinAuthenticator`: requests PINs, checks their status, holds the token
//! - `Authenticator`: the contract a host client library calls for a token
//! - `Session`: the token obtained so far, if any

pub mod authenticator;
pub mod session;

pub use authenticator::{Authenticator, PinAuthenticator, TokenCallback};
pub use session::{Session, SessionData};
