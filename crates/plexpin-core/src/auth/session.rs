use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PinId;

/// Token obtained from plex.tv, with where and when it came from.
///
/// Serializable so a host can persist it; this crate never writes it anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    /// PIN that was redeemed for this token, `None` when supplied up front
    pub pin_id: Option<String>,
    pub authorized_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new() -> Self {
        Self { data: None }
    }

    /// Session seeded with a token obtained earlier
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            return Self::new();
        }
        Self {
            data: Some(SessionData {
                token,
                pin_id: None,
                authorized_at: Utc::now(),
            }),
        }
    }

    /// Record the token a PIN was redeemed for. A later authorization replaces it.
    pub fn authorize(&mut self, token: String, pin_id: &PinId) {
        self.data = Some(SessionData {
            token,
            pin_id: Some(pin_id.to_string()),
            authorized_at: Utc::now(),
        });
    }

    /// Clear session data
    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }
}
