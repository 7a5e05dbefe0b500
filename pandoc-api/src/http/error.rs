//! JSON error responses.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pandoc_options::OptionError;
use serde::Serialize;

use crate::config::RunMode;

/// An error reported to the client as `{"status", "code", "message"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable detail, omitted in production for internal failures.
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: u16,
    code: &'a str,
    message: Option<&'a str>,
}

impl ApiError {
    /// Creates an error with an explicit status, code and message.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: Some(message.into()),
        }
    }

    /// The request carried no `file` part.
    #[must_use]
    pub fn missing_input() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "missing_input",
            "cannot find input file",
        )
    }

    /// A raw upload lacked usable `Content-Type` or `Content-Disposition`.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_header", message)
    }

    /// No route matched the request.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "route_not_found",
            "the requested path does not exist",
        )
    }

    /// The request body could not be read.
    #[must_use]
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "payload_too_large"
        } else {
            "invalid_body"
        };
        Self::new(status, code, message)
    }

    /// An unexpected failure. The detail is always logged and only returned
    /// outside production.
    #[must_use]
    pub fn internal(err: &dyn fmt::Display, mode: RunMode) -> Self {
        tracing::error!(error = %err, "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_server_error",
            message: (!mode.is_production()).then(|| err.to_string()),
        }
    }
}

impl From<OptionError> for ApiError {
    fn from(err: OptionError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_option", err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            code: self.code,
            message: self.message.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RunMode::Development, Some("converter exploded"))]
    #[case(RunMode::Production, None)]
    fn internal_detail_depends_on_mode(#[case] mode: RunMode, #[case] expected: Option<&str>) {
        let err = ApiError::internal(&"converter exploded", mode);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "internal_server_error");
        assert_eq!(err.message.as_deref(), expected);
    }

    #[rstest]
    fn option_errors_are_bad_requests() {
        let err = ApiError::from(OptionError::UnknownOption {
            key: "bogus".to_owned(),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "invalid_option");
        assert_eq!(err.message.as_deref(), Some("invalid option 'bogus'"));
    }

    #[rstest]
    #[case(StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")]
    #[case(StatusCode::BAD_REQUEST, "invalid_body")]
    fn rejection_codes(#[case] status: StatusCode, #[case] code: &str) {
        assert_eq!(ApiError::rejected(status, "nope").code, code);
    }
}
