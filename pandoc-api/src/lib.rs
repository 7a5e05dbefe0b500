//! RESTful document conversion service wrapping the pandoc command line.
//!
//! Requests encode converter options in the URL path, for example
//! `POST /api/convert/from/docx/to/html`. Options are validated against a
//! catalogue parsed from the converter's own `--help` output before the
//! upload is written to disk and handed to the converter.

pub mod app;
pub mod cli;
pub mod config;
pub mod converter;
pub mod disposition;
pub mod error;
pub mod http;
pub mod process;
pub mod storage;
pub mod telemetry;

pub use config::{ConfigOverrides, RunMode, ServiceConfig};
pub use converter::Converter;
pub use error::{ConvertError, PandocApiError, Result};
pub use http::{AppState, build_router};
pub use process::{ProcessOutput, ProcessRunner, TokioRunner};
pub use storage::{StoredUpload, UploadStore};
