//! Layered service configuration.
//!
//! Sources merge from lowest to highest precedence: built-in defaults, an
//! optional TOML file, the legacy `PORT` and `HOSTNAME` variables,
//! `PANDOC_API_*` variables, then command-line overrides.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{PandocApiError, Result};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "PANDOC_API_CONFIG_PATH";
/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "pandoc-api.toml";
/// Prefix for environment variables mapped onto [`ServiceConfig`] fields.
pub const ENV_PREFIX: &str = "PANDOC_API_";

const LEGACY_PORT_ENV: &str = "PORT";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_CONVERTER: &str = "pandoc";
const TEMP_SUBDIR: &str = "pandoc-api";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Controls how much failure detail reaches clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Internal error messages are returned to clients.
    #[default]
    Development,
    /// Internal error messages are only logged.
    Production,
}

impl RunMode {
    /// Returns `true` in production mode.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Resolved settings for one service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Interface or hostname to listen on.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Converter binary, resolved through `PATH` when not absolute.
    pub converter: String,
    /// Directory for uploads and conversion output.
    pub temp_dir: Utf8PathBuf,
    /// Error-detail policy.
    pub mode: RunMode,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            converter: DEFAULT_CONVERTER.to_owned(),
            temp_dir: default_temp_dir(),
            mode: RunMode::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Socket address string passed to the listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL advertised in the help banner.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address())
    }
}

/// Values supplied on the command line.
///
/// Unset fields leave lower-precedence sources untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    /// Explicit configuration file; it must exist.
    #[serde(skip)]
    pub config_path: Option<Utf8PathBuf>,
    /// Listen host override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Listen port override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Builds the layered figment without extracting it.
///
/// # Errors
///
/// Returns [`PandocApiError::Io`] when an explicitly named configuration file
/// does not exist.
pub fn figment(overrides: &ConfigOverrides) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(ServiceConfig::default()));
    if let Some(path) = config_file(overrides)? {
        tracing::debug!(path = %path, "loading configuration file");
        figment = figment.merge(Toml::file(path.as_std_path()));
    }
    if let Some(port) = legacy_port() {
        figment = figment.merge(Serialized::default("port", port));
    }
    Ok(figment
        .merge(Env::raw().only(&["hostname"]).map(|_| "host".into()))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides)))
}

/// Loads the service configuration from every source.
///
/// # Errors
///
/// Returns [`PandocApiError::Config`] when a source cannot be parsed or a
/// value has the wrong type, and [`PandocApiError::Io`] when an explicitly
/// named configuration file is missing.
pub fn load(overrides: &ConfigOverrides) -> Result<ServiceConfig> {
    Ok(figment(overrides)?.extract()?)
}

fn config_file(overrides: &ConfigOverrides) -> Result<Option<Utf8PathBuf>> {
    let explicit = overrides.config_path.clone().or_else(|| {
        std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .map(Utf8PathBuf::from)
    });
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path)),
        Some(path) => Err(PandocApiError::Io {
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "configuration file not found",
            ),
            path,
        }),
        None => {
            let fallback = Utf8Path::new(DEFAULT_CONFIG_FILE);
            Ok(fallback.is_file().then(|| fallback.to_path_buf()))
        }
    }
}

/// Reads `PORT`, ignoring values that are not a usable port number.
fn legacy_port() -> Option<u16> {
    let raw = std::env::var(LEGACY_PORT_ENV).ok()?;
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .or_else(|| {
            tracing::warn!(value = %raw, "ignoring unusable PORT value");
            None
        })
}

fn default_temp_dir() -> Utf8PathBuf {
    let base = Utf8PathBuf::from_path_buf(std::env::temp_dir())
        .unwrap_or_else(|path| Utf8PathBuf::from(path.to_string_lossy().into_owned()));
    base.join(TEMP_SUBDIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_the_documented_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.address(), "localhost:4000");
        assert_eq!(config.converter, "pandoc");
        assert_eq!(config.mode, RunMode::Development);
        assert_eq!(config.max_upload_bytes, 104_857_600);
        assert_eq!(config.temp_dir.file_name(), Some("pandoc-api"));
    }

    #[rstest]
    #[case(RunMode::Development, false)]
    #[case(RunMode::Production, true)]
    fn production_flag(#[case] mode: RunMode, #[case] expected: bool) {
        assert_eq!(mode.is_production(), expected);
    }

    #[rstest]
    fn base_url_uses_host_and_port() {
        let config = ServiceConfig {
            host: "0.0.0.0".to_owned(),
            port: 8080,
            ..ServiceConfig::default()
        };
        assert_eq!(config.base_url(), "http://0.0.0.0:8080");
    }
}
