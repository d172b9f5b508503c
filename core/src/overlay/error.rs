//! Relay error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors that can occur while relaying a request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The `url` query parameter was absent or empty.
    #[error("missing url parameter")]
    MissingUrl,

    /// The parameter was not valid base64.
    #[error("url parameter is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The decoded bytes were not UTF-8.
    #[error("decoded url is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The outbound request could not be sent.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl => StatusCode::BAD_REQUEST,
            // Decode and fetch failures are not the caller's fault as far as
            // the overlay page is concerned; they stay 500-class.
            Self::InvalidEncoding(_) | Self::InvalidUtf8(_) | Self::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn missing_url_is_a_client_error() {
        assert_eq!(RelayError::MissingUrl.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn decode_failure_is_a_server_error() {
        let err = base64::engine::general_purpose::STANDARD
            .decode("abc")
            .unwrap_err();
        let response = RelayError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
