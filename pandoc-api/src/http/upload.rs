//! Extraction of the uploaded document from a conversion request.
//!
//! Two shapes are accepted: a `multipart/form-data` body with a `file` part,
//! or a raw body named by `Content-Disposition`.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{HeaderMap, header};

use super::error::ApiError;
use crate::disposition;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";
const MULTIPART: &str = "multipart/form-data";
const UNNAMED_UPLOAD: &str = "document";

/// A document received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Client-supplied file name, without directory components.
    pub file_name: String,
    /// Document bytes.
    pub contents: Bytes,
}

/// Reads the upload from `request`.
///
/// # Errors
///
/// Returns `invalid_header` when a raw upload lacks `Content-Type` or a
/// `Content-Disposition` file name, `missing_input` when a multipart body has
/// no `file` part, and the body rejection when the payload cannot be read.
pub async fn extract(request: Request) -> Result<Upload, ApiError> {
    let content_type = header_text(request.headers(), &header::CONTENT_TYPE)?;
    match content_type {
        Some(value) if value.to_ascii_lowercase().starts_with(MULTIPART) => {
            extract_multipart(request).await
        }
        Some(_) => extract_raw(request).await,
        None => Err(ApiError::invalid_header(
            "Could not find Content-Type or Content-Disposition header",
        )),
    }
}

async fn extract_multipart(request: Request) -> Result<Upload, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| ApiError::rejected(rejection.status(), rejection.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::rejected(err.status(), err.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map_or_else(|| UNNAMED_UPLOAD.to_owned(), base_name);
        let contents = field
            .bytes()
            .await
            .map_err(|err| ApiError::rejected(err.status(), err.body_text()))?;
        return Ok(Upload {
            file_name,
            contents,
        });
    }
    Err(ApiError::missing_input())
}

async fn extract_raw(request: Request) -> Result<Upload, ApiError> {
    let disposition = header_text(request.headers(), &header::CONTENT_DISPOSITION)?
        .ok_or_else(|| {
            ApiError::invalid_header("Could not find Content-Type or Content-Disposition header")
        })?;
    let file_name = disposition::parse_filename(&disposition)
        .map(|name| base_name(&name))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::invalid_header("invalid Content-Disposition header"))?;
    let contents = Bytes::from_request(request, &())
        .await
        .map_err(|rejection| ApiError::rejected(rejection.status(), rejection.body_text()))?;
    Ok(Upload {
        file_name,
        contents,
    })
}

fn header_text(
    headers: &HeaderMap,
    name: &header::HeaderName,
) -> Result<Option<String>, ApiError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(ToOwned::to_owned)
                .map_err(|_| ApiError::invalid_header(format!("{name} is not valid text")))
        })
        .transpose()
}

/// Drops any directory components a client put in the file name.
fn base_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or(name).to_owned()
}
