//! plex.tv API plumbing for the PIN flow.
//!
//! This module provides the `PinClient` transport, the client
//! identification headers every request carries, and the `PinError`
//! type shared by the whole crate.

pub mod client;
pub mod error;
pub mod headers;

pub use client::{PinClient, PinResponse};
pub use error::{PinError, Result};
pub use headers::{build_headers, ClientOptions};
