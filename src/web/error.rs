use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use super::pages;
use crate::client::ClientError;

/// Failures surfaced by the front-end pages. Each one renders as an HTML error page.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("An error occurred while {action}.")]
    Api {
        action: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Api { source, .. } if source.is_not_found() => StatusCode::NOT_FOUND,
            WebError::Api { .. } | WebError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn page_message(&self) -> String {
        match self {
            WebError::Api { source, .. } if source.is_not_found() => {
                "The requested resource was not found.".to_string()
            }
            WebError::Render(_) => "An error occurred while rendering the page.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            WebError::Api { action, source } if status.is_server_error() => match source {
                ClientError::Status { status: api_status, body } => {
                    error!(%api_status, %body, "API call failed while {}", action);
                }
                other => error!(error = %other, "API call failed while {}", action),
            },
            WebError::Render(err) => error!(error = %err, "page rendering failed"),
            _ => warn!(%status, error = %self, "request rejected"),
        }

        (status, pages::error_page(status, &self.page_message())).into_response()
    }
}

/// Tags a call-layer failure with what the page was doing at the time.
pub trait ApiContext<T> {
    fn during(self, action: &'static str) -> Result<T, WebError>;
}

impl<T> ApiContext<T> for Result<T, ClientError> {
    fn during(self, action: &'static str) -> Result<T, WebError> {
        self.map_err(|source| WebError::Api { action, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn api_error(status: StatusCode) -> WebError {
        Err::<(), _>(ClientError::Status {
            status,
            body: "{\"error\":\"x\"}".into(),
        })
        .during("retrieving the order")
        .unwrap_err()
    }

    #[rstest]
    #[case(WebError::NotFound("Order".into()), StatusCode::NOT_FOUND)]
    #[case(WebError::BadRequest("id mismatch".into()), StatusCode::BAD_REQUEST)]
    #[case(api_error(StatusCode::NOT_FOUND), StatusCode::NOT_FOUND)]
    #[case(api_error(StatusCode::BAD_REQUEST), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(api_error(StatusCode::INTERNAL_SERVER_ERROR), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(WebError::Render(askama::Error::Fmt(std::fmt::Error)), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_to_page_status(#[case] err: WebError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn api_failures_read_as_the_failed_action() {
        assert_eq!(
            api_error(StatusCode::BAD_GATEWAY).to_string(),
            "An error occurred while retrieving the order."
        );
    }
}
