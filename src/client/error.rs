use reqwest::StatusCode;
use thiserror::Error;

/// Failures raised by [`super::ApiClient`].
///
/// A non-success status is always an error; the body is kept so callers can log it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Status reported by the API, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_only_for_status_errors() {
        let err = ClientError::Status {
            status: StatusCode::NOT_FOUND,
            body: "{}".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API responded with 404 Not Found: {}");

        let err = ClientError::from(url::Url::parse("not a url").unwrap_err());
        assert_eq!(err.status(), None);
    }
}
