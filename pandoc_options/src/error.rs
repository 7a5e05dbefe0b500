//! Error types for option validation.

use thiserror::Error;

use crate::definition::OptionKind;

/// Failures raised while assigning option values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// The key does not match any spelling advertised by the converter.
    #[error("invalid option '{key}'")]
    UnknownOption {
        /// Spelling supplied by the caller.
        key: String,
    },

    /// The value is not acceptable for the option's kind.
    #[error("invalid option of {kind} type: {key}={}", .value.as_deref().unwrap_or(""))]
    InvalidOptionValue {
        /// Spelling supplied by the caller.
        key: String,
        /// Value supplied by the caller, if any.
        value: Option<String>,
        /// Kind of the resolved option.
        kind: OptionKind,
    },
}

impl OptionError {
    pub(crate) fn unknown(key: &str) -> Self {
        Self::UnknownOption {
            key: key.to_owned(),
        }
    }

    pub(crate) fn invalid(key: &str, value: Option<&str>, kind: OptionKind) -> Self {
        Self::InvalidOptionValue {
            key: key.to_owned(),
            value: value.map(str::to_owned),
            kind,
        }
    }
}
