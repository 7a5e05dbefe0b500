//! Service bootstrap: state construction and the listen loop.

use std::sync::Arc;

use pandoc_options::compose_help;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::converter::Converter;
use crate::error::{PandocApiError, Result};
use crate::http::{AppState, build_router, usage_banner};
use crate::process::ProcessRunner;
use crate::storage::UploadStore;

/// Opens the temporary directory, loads the converter's options and builds
/// the shared request state.
///
/// # Errors
///
/// Returns [`PandocApiError::Io`] when the temporary directory is unusable
/// and [`PandocApiError::Convert`] when the converter help cannot be read.
pub async fn build_state(
    config: &ServiceConfig,
    runner: Arc<dyn ProcessRunner>,
) -> Result<Arc<AppState>> {
    let store = UploadStore::open(&config.temp_dir)?;
    let converter = Converter::new(config.converter.as_str(), store.root(), runner);
    let catalog = converter.load_catalog().await?;
    info!(
        converter = %config.converter,
        options = catalog.len(),
        temp_dir = %store.root(),
        "converter options loaded"
    );
    let help = compose_help(&usage_banner(&config.base_url()), catalog.help_text());
    Ok(Arc::new(AppState {
        catalog: Arc::new(catalog),
        converter,
        store: Arc::new(store),
        help: Arc::from(help),
        mode: config.mode,
    }))
}

/// Reads the converter help and prefixes the usage banner.
///
/// # Errors
///
/// Returns [`PandocApiError::Convert`] when the converter cannot be run.
pub async fn converter_help(
    config: &ServiceConfig,
    runner: Arc<dyn ProcessRunner>,
) -> Result<String> {
    let converter = Converter::new(config.converter.as_str(), config.temp_dir.as_path(), runner);
    let help = converter.fetch_help().await?;
    Ok(compose_help(&usage_banner(&config.base_url()), &help))
}

/// Binds the configured address and serves until interrupted.
///
/// # Errors
///
/// Returns [`PandocApiError::Bind`] when the address cannot be bound and
/// [`PandocApiError::Message`] when the server fails while running.
pub async fn serve(config: &ServiceConfig, state: Arc<AppState>) -> Result<()> {
    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| PandocApiError::Bind {
            address: address.clone(),
            source,
        })?;
    let local = listener
        .local_addr()
        .map_or_else(|_| address.clone(), |addr| addr.to_string());
    info!(address = %local, mode = ?config.mode, "pandoc-api started on http://{address}");

    axum::serve(listener, build_router(state, config.max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| PandocApiError::Message(format!("server failed: {err}")))
}

/// Builds the state with `runner` and serves.
///
/// # Errors
///
/// Propagates [`build_state`] and [`serve`] failures.
pub async fn start(config: &ServiceConfig, runner: Arc<dyn ProcessRunner>) -> Result<()> {
    let state = build_state(config, runner).await?;
    serve(config, state).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
