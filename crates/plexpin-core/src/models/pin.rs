use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{PinError, Result};

/// A PIN issued by plex.tv.
///
/// `code` is shown to the user, who enters it at plex.tv/link; `id` is what
/// the application polls with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub code: String,
    pub id: String,
    /// Expiry advertised by the service. Informational only.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Pin {
    pub fn new(code: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            id: id.into(),
            expires_at: None,
        }
    }

    /// Whether the advertised expiry has passed. A PIN without one never expires locally.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| Utc::now() > at).unwrap_or(false)
    }

    /// Seconds left before the advertised expiry (for display), clamped at zero
    pub fn seconds_remaining(&self) -> Option<i64> {
        self.expires_at
            .map(|at| (at - Utc::now()).num_seconds().max(0))
    }
}

/// Identifier of a PIN to poll, accepted either bare or taken from a [`Pin`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinId(String);

impl PinId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// PIN identifiers are decimal numerals
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Refuse an id that cannot name a PIN, before it reaches a URL
    pub fn validated(self) -> Result<Self> {
        if self.is_well_formed() {
            Ok(self)
        } else {
            Err(PinError::ContractViolation(format!(
                "PIN id must be a decimal number, got {:?}",
                self.0
            )))
        }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Pin> for PinId {
    fn from(pin: &Pin) -> Self {
        PinId(pin.id.clone())
    }
}

impl From<Pin> for PinId {
    fn from(pin: Pin) -> Self {
        PinId(pin.id)
    }
}

impl From<&str> for PinId {
    fn from(id: &str) -> Self {
        PinId(id.to_string())
    }
}

impl From<String> for PinId {
    fn from(id: String) -> Self {
        PinId(id)
    }
}

impl From<u64> for PinId {
    fn from(id: u64) -> Self {
        PinId(id.to_string())
    }
}

/// Classification of one status-check response.
///
/// `Waiting` is the only state a PIN can stay in; `Authorized` and `Invalid`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinStatus {
    Waiting,
    Authorized,
    Invalid,
}

impl PinStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PinStatus::Waiting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PinStatus::Waiting => "waiting",
            PinStatus::Authorized => "authorized",
            PinStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for PinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_pin_id_from_pin_and_bare_id() {
        let pin = Pin::new("MOCA", "12345678");
        assert_eq!(PinId::from(&pin), PinId::from("12345678"));
        assert_eq!(PinId::from(pin), PinId::from(12345678u64));
    }

    #[test]
    fn test_pin_id_well_formed() {
        assert!(PinId::from("87654321").is_well_formed());
        assert!(!PinId::from("").is_well_formed());
        assert!(!PinId::from("12ab").is_well_formed());
        assert!(!PinId::from("../pins").is_well_formed());
    }

    #[test]
    fn test_pin_id_validated() {
        assert_eq!(PinId::from("42").validated().unwrap().as_str(), "42");
        assert!(matches!(
            PinId::from("abc").validated(),
            Err(PinError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_pin_expiry() {
        let mut pin = Pin::new("MOCA", "1");
        assert!(!pin.is_expired());
        assert_eq!(pin.seconds_remaining(), None);

        pin.expires_at = Some(Utc::now() - Duration::minutes(1));
        assert!(pin.is_expired());
        assert_eq!(pin.seconds_remaining(), Some(0));

        pin.expires_at = Some(Utc::now() + Duration::minutes(15));
        assert!(!pin.is_expired());
        assert!(pin.seconds_remaining().unwrap() > 800);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!PinStatus::Waiting.is_terminal());
        assert!(PinStatus::Authorized.is_terminal());
        assert!(PinStatus::Invalid.is_terminal());
        assert_eq!(PinStatus::Invalid.to_string(), "invalid");
        assert_eq!(serde_json::to_string(&PinStatus::Authorized).unwrap(), "\"authorized\"");
    }
}
