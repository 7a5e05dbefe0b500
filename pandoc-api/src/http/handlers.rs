//! Route handlers.

use std::io;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{self, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use camino::{Utf8Path, Utf8PathBuf};
use pandoc_options::{OptionSet, parse_command};
use tracing::{debug, info, warn};

use super::error::ApiError;
use super::upload::{self, Upload};
use super::{AppState, HELP_PATH};
use crate::disposition;
use crate::error::PandocApiError;
use crate::storage::{StoredUpload, UploadStore};

/// Redirects the root to the help document.
pub async fn index() -> Redirect {
    Redirect::to(HELP_PATH)
}

/// Serves the composed help document.
pub async fn help(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.help.to_string(),
    )
}

/// Converts the uploaded document using the options in the path.
///
/// # Errors
///
/// Returns an [`ApiError`] for invalid options, missing uploads and failed
/// conversions.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Path(command): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    run_conversion(&state, &command, request).await
}

/// Converts the uploaded document with no converter options.
///
/// # Errors
///
/// Returns an [`ApiError`] for missing uploads and failed conversions.
pub async fn convert_with_defaults(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    run_conversion(&state, "", request).await
}

/// Answers unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::route_not_found()
}

/// Converted document ready to be sent back.
struct Converted {
    original_name: String,
    output: Utf8PathBuf,
    contents: Vec<u8>,
}

async fn run_conversion(
    state: &Arc<AppState>,
    command: &str,
    request: Request,
) -> Result<Response, ApiError> {
    let options = parse_command(&state.catalog, command)?;
    let upload = upload::extract(request).await?;
    info!(
        file = %upload.file_name,
        bytes = upload.contents.len(),
        options = %options,
        "conversion requested"
    );

    // Detached so temporary files are removed even if the client disconnects.
    let task_state = Arc::clone(state);
    let converted =
        tokio::spawn(async move { convert_upload(&task_state, upload, &options).await })
            .await
            .unwrap_or_else(|err| {
                Err(PandocApiError::Message(format!(
                    "conversion task failed: {err}"
                )))
            })
            .map_err(|err| state.internal(&err))?;

    attachment_response(
        &converted.original_name,
        &converted.output,
        converted.contents,
    )
    .map_err(|err| state.internal(&err))
}

async fn convert_upload(
    state: &AppState,
    upload: Upload,
    options: &OptionSet,
) -> Result<Converted, PandocApiError> {
    let stored = on_store(state, move |store| {
        store.store(&upload.file_name, &upload.contents)
    })
    .await?;
    let output = state.converter.output_path(&stored.path, options);

    let contents = read_conversion(state, &stored, options).await;
    discard(state, &output).await;
    // Same-extension conversions overwrite the input in place.
    if output != stored.path {
        discard(state, &stored.path).await;
    }

    Ok(Converted {
        original_name: stored.original_name,
        output,
        contents: contents?,
    })
}

async fn read_conversion(
    state: &AppState,
    stored: &StoredUpload,
    options: &OptionSet,
) -> Result<Vec<u8>, PandocApiError> {
    let output = state.converter.convert(&stored.path, options).await?;
    on_store(state, move |store| store.read(&output)).await
}

fn attachment_response(
    original_name: &str,
    output: &Utf8Path,
    contents: Vec<u8>,
) -> Result<Response, http::Error> {
    let download_name = output.extension().map_or_else(
        || original_name.to_owned(),
        |extension| format!("{original_name}.{extension}"),
    );
    let content_type = mime_guess::from_path(output).first_or_octet_stream();
    http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(
            header::CONTENT_DISPOSITION,
            disposition::attachment(&download_name),
        )
        .body(Body::from(contents))
}

async fn on_store<T, F>(state: &AppState, task: F) -> Result<T, PandocApiError>
where
    F: FnOnce(&UploadStore) -> Result<T, PandocApiError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || task(&store))
        .await
        .map_err(|err| PandocApiError::Message(format!("storage task failed: {err}")))?
}

async fn discard(state: &AppState, path: &Utf8Path) {
    let target = path.to_path_buf();
    match on_store(state, move |store| store.remove(&target)).await {
        Ok(()) => {}
        Err(PandocApiError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path, "temporary file was never written");
        }
        Err(err) => warn!(path = %path, error = %err, "failed to remove temporary file"),
    }
}
