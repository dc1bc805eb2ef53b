//! Client identification headers sent with every plex.tv request.

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Length of a generated client identifier
const CLIENT_IDENTIFIER_LENGTH: usize = 24;

const DEFAULT_PRODUCT: &str = "plexpin";

const X_PLEX_CLIENT_IDENTIFIER: &str = "x-plex-client-identifier";
const X_PLEX_PRODUCT: &str = "x-plex-product";
const X_PLEX_VERSION: &str = "x-plex-version";
const X_PLEX_DEVICE: &str = "x-plex-device";
const X_PLEX_DEVICE_NAME: &str = "x-plex-device-name";
const X_PLEX_PLATFORM: &str = "x-plex-platform";
const X_PLEX_PLATFORM_VERSION: &str = "x-plex-platform-version";

/// Identification of the application asking for a PIN.
///
/// plex.tv ties a PIN to the client identifier that created it, so the
/// same options must be used for creation and every status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    pub identifier: String,
    pub product: String,
    pub version: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub platform_version: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            identifier: generate_identifier(),
            product: DEFAULT_PRODUCT.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            device: None,
            device_name: None,
            platform: None,
            platform_version: None,
        }
    }
}

impl ClientOptions {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_product(mut self, product: impl Into<String>, version: impl Into<String>) -> Self {
        self.product = product.into();
        self.version = version.into();
        self
    }

    pub fn with_device(mut self, device: impl Into<String>, device_name: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self.device_name = Some(device_name.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>, version: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self.platform_version = Some(version.into());
        self
    }
}

fn generate_identifier() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CLIENT_IDENTIFIER_LENGTH)
        .map(char::from)
        .collect()
}

/// Build the request headers for the given client options.
pub fn build_headers(options: &ClientOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/xml"));

    let fields = [
        (X_PLEX_CLIENT_IDENTIFIER, Some(&options.identifier)),
        (X_PLEX_PRODUCT, Some(&options.product)),
        (X_PLEX_VERSION, Some(&options.version)),
        (X_PLEX_DEVICE, options.device.as_ref()),
        (X_PLEX_DEVICE_NAME, options.device_name.as_ref()),
        (X_PLEX_PLATFORM, options.platform.as_ref()),
        (X_PLEX_PLATFORM_VERSION, options.platform_version.as_ref()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            headers.insert(HeaderName::from_static(name), HeaderValue::from_str(value)?);
        }
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PinError;

    #[test]
    fn test_generated_identifier() {
        let a = ClientOptions::default();
        let b = ClientOptions::default();
        assert_eq!(a.identifier.len(), CLIENT_IDENTIFIER_LENGTH);
        assert!(a.identifier.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a.identifier, b.identifier);
    }

    #[test]
    fn test_required_headers_only() {
        let headers = build_headers(&ClientOptions::new("abc123")).unwrap();
        assert_eq!(headers.get(header::ACCEPT).unwrap(), "application/xml");
        assert_eq!(headers.get(X_PLEX_CLIENT_IDENTIFIER).unwrap(), "abc123");
        assert_eq!(headers.get(X_PLEX_PRODUCT).unwrap(), DEFAULT_PRODUCT);
        assert!(headers.get(X_PLEX_DEVICE).is_none());
        assert!(headers.get(X_PLEX_PLATFORM_VERSION).is_none());
    }

    #[test]
    fn test_optional_headers() {
        let options = ClientOptions::new("abc123")
            .with_product("Media Helper", "2.1.0")
            .with_device("Linux", "living-room")
            .with_platform("Rust", "1.80");
        let headers = build_headers(&options).unwrap();
        assert_eq!(headers.get(X_PLEX_PRODUCT).unwrap(), "Media Helper");
        assert_eq!(headers.get(X_PLEX_VERSION).unwrap(), "2.1.0");
        assert_eq!(headers.get(X_PLEX_DEVICE_NAME).unwrap(), "living-room");
        assert_eq!(headers.get(X_PLEX_PLATFORM).unwrap(), "Rust");
    }

    #[test]
    fn test_invalid_header_value() {
        let options = ClientOptions::new("bad\nidentifier");
        assert!(matches!(build_headers(&options), Err(PinError::InvalidHeader(_))));
    }
}
