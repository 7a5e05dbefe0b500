//! Conversion service driving the external converter.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use pandoc_options::{OptionCatalog, OptionSet, extension_for};
use tracing::{info, warn};

use crate::error::ConvertError;
use crate::process::ProcessRunner;

const HELP_FLAG: &str = "--help";
const FALLBACK_STEM: &str = "output";

/// Invokes the converter binary for help text and conversions.
#[derive(Debug, Clone)]
pub struct Converter {
    program: String,
    output_dir: Utf8PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl Converter {
    /// Creates a converter running `program`, writing results to `output_dir`.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        output_dir: impl Into<Utf8PathBuf>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            program: program.into(),
            output_dir: output_dir.into(),
            runner,
        }
    }

    /// Name or path of the converter binary.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Directory conversion results are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Runs the converter's help flag and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UpstreamUnavailable`] when the converter cannot
    /// be started or exits unsuccessfully.
    pub async fn fetch_help(&self) -> Result<String, ConvertError> {
        let output = self
            .runner
            .run(&self.program, &[HELP_FLAG.to_owned()])
            .await
            .map_err(|err| self.unavailable(err.to_string()))?;
        if !output.success() {
            let message = format!(
                "exited with status {}: {}",
                output
                    .status
                    .map_or_else(|| "unknown".to_owned(), |code| code.to_string()),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(self.unavailable(message));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Fetches the help text and parses it into an option catalogue.
    ///
    /// # Errors
    ///
    /// Propagates [`Converter::fetch_help`] failures.
    pub async fn load_catalog(&self) -> Result<OptionCatalog, ConvertError> {
        let help = self.fetch_help().await?;
        Ok(OptionCatalog::parse(help))
    }

    /// Output path for converting `input` with `options`.
    ///
    /// The input's stem is kept and the extension follows the `to` option.
    #[must_use]
    pub fn output_path(&self, input: &Utf8Path, options: &OptionSet) -> Utf8PathBuf {
        let extension = extension_for(options.get_text("to"));
        let stem = input.file_stem().unwrap_or(FALLBACK_STEM);
        self.output_dir.join(format!("{stem}.{extension}"))
    }

    /// Full argument list for one conversion.
    #[must_use]
    pub fn arguments(input: &Utf8Path, output: &Utf8Path, options: &OptionSet) -> Vec<String> {
        let mut args = options.to_args();
        args.push(format!("--output={output}"));
        args.push(input.to_string());
        args
    }

    /// Converts `input`, returning the path of the converted file.
    ///
    /// Any output on the converter's error stream fails the conversion, even
    /// when the process exits with status zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ConversionFailed`] carrying the error-stream
    /// text, or the spawn failure when the converter cannot be started.
    pub async fn convert(
        &self,
        input: &Utf8Path,
        options: &OptionSet,
    ) -> Result<Utf8PathBuf, ConvertError> {
        let output_path = self.output_path(input, options);
        let args = Self::arguments(input, &output_path, options);
        info!(program = %self.program, args = %args.join(" "), "running converter");

        let output = self.runner.run(&self.program, &args).await.map_err(|err| {
            ConvertError::ConversionFailed {
                message: format!("failed to start {}: {err}", self.program),
            }
        })?;

        // Exit status is deliberately not the failure signal; stderr is.
        if !output.stderr.is_empty() {
            return Err(ConvertError::ConversionFailed {
                message: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        if !output.success() {
            warn!(
                status = ?output.status,
                output = %output_path,
                "converter exited unsuccessfully without diagnostics"
            );
        }
        Ok(output_path)
    }

    fn unavailable(&self, message: String) -> ConvertError {
        ConvertError::UpstreamUnavailable {
            program: self.program.clone(),
            message,
        }
    }
}
