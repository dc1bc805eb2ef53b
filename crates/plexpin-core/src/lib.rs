//! Core library for plexpin - PIN authentication against plex.tv.
//!
//! The flow: [`PinAuthenticator::request_pin`] mints a PIN whose code the
//! user enters at plex.tv/link, the caller polls
//! [`PinAuthenticator::check_pin_status`] on its own interval until the PIN
//! is `Authorized` or `Invalid`, and the token is then served through the
//! [`Authenticator`] contract.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod parser;

pub use api::{ClientOptions, PinError, Result};
pub use auth::{Authenticator, PinAuthenticator, Session, SessionData, TokenCallback};
pub use config::Config;
pub use models::{Pin, PinId, PinStatus};
