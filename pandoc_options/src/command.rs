//! Parsing of path-style conversion commands.
//!
//! A command alternates option spellings and values, for example
//! `from/docx/to/html/standalone/true`.

use std::sync::Arc;

use crate::error::OptionError;
use crate::help::OptionCatalog;
use crate::option_set::OptionSet;

/// Parses `command` into an [`OptionSet`] validated against `catalog`.
///
/// Segments are consumed in `key/value` pairs. A trailing key without a value
/// is assigned no value, which only optional-value options accept. Leading
/// and trailing slashes are ignored.
///
/// # Errors
///
/// Propagates the first [`OptionError`] raised by [`OptionSet::set`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pandoc_options::{OptionCatalog, parse_command};
///
/// let catalog = Arc::new(OptionCatalog::parse(
///     "  -f FORMAT  --from=FORMAT\n  -t FORMAT  --to=FORMAT\n",
/// ));
/// let options = parse_command(&catalog, "from/docx/to/html").expect("valid command");
/// assert_eq!(options.to_string(), "--from=docx --to=html");
/// ```
pub fn parse_command(catalog: &Arc<OptionCatalog>, command: &str) -> Result<OptionSet, OptionError> {
    let mut options = OptionSet::new(Arc::clone(catalog));
    let trimmed = command.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(options);
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    for pair in segments.chunks(2) {
        match pair {
            [key, value] => options.set(key, Some(*value))?,
            [key] => options.set(key, None)?,
            _ => {}
        }
    }
    tracing::debug!(command, args = %options, "parsed conversion command");
    Ok(options)
}
