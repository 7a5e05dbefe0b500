//! HTTP surface: routing, shared state and the help banner.

pub mod error;
pub mod handlers;
pub mod upload;

use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::routing::{get, post};
use pandoc_options::OptionCatalog;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use crate::config::RunMode;
use crate::converter::Converter;
use crate::storage::UploadStore;

/// Path serving the composed help document.
pub const HELP_PATH: &str = "/api/help";
/// Value of the `X-Powered-By` header on every response.
pub const POWERED_BY: &str = concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION"));

const POWERED_BY_HEADER: &str = "x-powered-by";

/// State shared by every request.
#[derive(Debug)]
pub struct AppState {
    /// Option catalogue parsed at startup.
    pub catalog: Arc<OptionCatalog>,
    /// Converter used for conversions.
    pub converter: Converter,
    /// Temporary file storage.
    pub store: Arc<UploadStore>,
    /// Help document served at [`HELP_PATH`].
    pub help: Arc<str>,
    /// Error-detail policy.
    pub mode: RunMode,
}

impl AppState {
    pub(crate) fn internal(&self, err: &dyn fmt::Display) -> ApiError {
        ApiError::internal(err, self.mode)
    }
}

/// Usage banner placed ahead of the converter's own help.
#[must_use]
pub fn usage_banner(base_url: &str) -> String {
    [
        "pandoc-api, a RESTful wrapper for pandoc".to_owned(),
        "  please visit https://github.com/alphakevin/pandoc-api".to_owned(),
        String::new(),
        "converting:".to_owned(),
        "  upload with multipart/form-data:".to_owned(),
        format!(
            "    curl -F file=@example.docx {base_url}/api/convert/from/docx/to/html > result.html"
        ),
        "  upload raw:".to_owned(),
        "    curl -X POST \\".to_owned(),
        "      -T \"example.docx\" \\".to_owned(),
        "      -H \"Content-Type: application/vnd.openxmlformats-officedocument.wordprocessingml.document\" \\"
            .to_owned(),
        "      -H \"Content-Disposition: attachment; filename=\"example.docx\"\" \\".to_owned(),
        format!("      {base_url}/api/convert/from/docx/to/html > result.html"),
        String::new(),
        "converter options:".to_owned(),
    ]
    .join("\n")
}

/// Builds the service router.
#[must_use]
pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(HELP_PATH, get(handlers::help))
        .route("/api/convert", post(handlers::convert_with_defaults))
        .route("/api/convert/{*command}", post(handlers::convert))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(POWERED_BY_HEADER),
            HeaderValue::from_static(POWERED_BY),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn banner_points_at_the_configured_address() {
        let banner = usage_banner("http://0.0.0.0:8080");
        assert!(banner.starts_with("pandoc-api, a RESTful wrapper for pandoc\n"));
        assert!(banner.contains("curl -F file=@example.docx http://0.0.0.0:8080/api/convert/"));
        assert!(banner.ends_with("converter options:"));
    }

    #[rstest]
    fn powered_by_names_the_package() {
        assert!(POWERED_BY.starts_with("pandoc-api@"));
        assert!(HeaderValue::from_str(POWERED_BY).is_ok());
    }
}
