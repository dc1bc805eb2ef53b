use reqwest::header::InvalidHeaderValue;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinError {
    #[error("Invalid argument: {0}")]
    ContractViolation(String),

    #[error("User has not authenticated yet")]
    NotAuthenticated,

    #[error("Error while contacting the authentication service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from the authentication service: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, PinError>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl PinError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn unexpected_status(status: StatusCode, body: &str) -> Self {
        PinError::UnexpectedStatus {
            status,
            body: Self::truncate_body(body),
        }
    }

    /// The observed HTTP status, if this error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PinError::UnexpectedStatus { status, .. } => Some(*status),
            PinError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_body_is_kept() {
        let err = PinError::unexpected_status(StatusCode::BAD_GATEWAY, "upstream down");
        match err {
            PinError::UnexpectedStatus { status, body } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_long_body_is_truncated_on_char_boundary() {
        // 'é' is two bytes, so byte 500 falls inside a character
        let body = format!("a{}", "é".repeat(400));
        let err = PinError::unexpected_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let PinError::UnexpectedStatus { body: truncated, .. } = err else {
            panic!("expected UnexpectedStatus");
        };
        assert!(truncated.contains("(truncated, 801 total bytes)"));
        assert!(truncated.len() < body.len());
    }

    #[test]
    fn test_status_accessor() {
        let err = PinError::unexpected_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(PinError::NotAuthenticated.status(), None);
    }
}
