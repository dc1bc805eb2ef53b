//! Data models for the PIN flow.
//!
//! - `Pin`: code/identifier pair issued by plex.tv
//! - `PinId`: identifier used to poll a PIN, built from a `Pin` or a bare id
//! - `PinStatus`: classification of a status check

pub mod pin;

pub use pin::{Pin, PinId, PinStatus};
