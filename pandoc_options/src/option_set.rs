//! Validated option assignments for a single conversion.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::definition::{OptionDefinition, OptionKind};
use crate::error::OptionError;
use crate::help::OptionCatalog;

const TRUTHY: &[&str] = &["yes", "on", "true", "1"];
const FALSY: &[&str] = &["no", "off", "false", "0"];

/// Value assigned to an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A satisfied switch, emitted without a value.
    Flag,
    /// A value emitted as `name=value`.
    Text(String),
}

impl OptionValue {
    /// Returns the textual value, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Flag => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// Option assignments keyed by default spelling, in insertion order.
#[derive(Debug, Clone)]
pub struct OptionSet {
    catalog: Arc<OptionCatalog>,
    values: IndexMap<String, OptionValue>,
}

impl OptionSet {
    /// Creates an empty set validated against `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<OptionCatalog>) -> Self {
        Self {
            catalog,
            values: IndexMap::new(),
        }
    }

    /// Assigns `value` to the option spelled `key`.
    ///
    /// Booleans take one of `yes`, `on`, `true`, `1` (stored) or `no`, `off`,
    /// `false`, `0` (ignored). Enums must use one of their values. String and
    /// meta values are stored verbatim; they may only be omitted when the
    /// option's value is optional.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownOption`] when `key` is not a known
    /// spelling and [`OptionError::InvalidOptionValue`] when the value does not
    /// fit the option.
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), OptionError> {
        let definition = Arc::clone(
            self.catalog
                .get(key)
                .ok_or_else(|| OptionError::unknown(key))?,
        );
        let Some(assigned) = Self::validate(&definition, key, value)? else {
            return Ok(());
        };
        self.values
            .insert(definition.default_name().to_owned(), assigned);
        Ok(())
    }

    fn validate(
        definition: &OptionDefinition,
        key: &str,
        value: Option<&str>,
    ) -> Result<Option<OptionValue>, OptionError> {
        let kind = definition.kind();
        let invalid = || OptionError::invalid(key, value, kind);
        match (kind, value) {
            (OptionKind::Boolean, Some(raw)) if TRUTHY.contains(&raw) => Ok(Some(OptionValue::Flag)),
            (OptionKind::Boolean, Some(raw)) if FALSY.contains(&raw) => Ok(None),
            (OptionKind::Boolean, _) => Err(invalid()),
            (OptionKind::Enum, Some(raw)) if definition.accepts(raw) => {
                Ok(Some(OptionValue::Text(raw.to_owned())))
            }
            (OptionKind::Enum, _) => Err(invalid()),
            (OptionKind::String | OptionKind::Meta, Some(raw)) => {
                Ok(Some(OptionValue::Text(raw.to_owned())))
            }
            (OptionKind::String | OptionKind::Meta, None) if definition.optional_value() => {
                Ok(Some(OptionValue::Flag))
            }
            (OptionKind::String | OptionKind::Meta, None) => Err(invalid()),
        }
    }

    /// Returns the value assigned to the option spelled `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(self.resolve(key)?)
    }

    /// Returns the textual value assigned to the option spelled `key`.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_text)
    }

    /// Returns `true` when the option spelled `key` has a value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes the option spelled `key`, returning its previous value.
    pub fn delete(&mut self, key: &str) -> Option<OptionValue> {
        let name = self.resolve(key)?.to_owned();
        self.values.shift_remove(&name)
    }

    /// Iterates over `(default spelling, value)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of assigned options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Renders the assignments as converter arguments, in insertion order.
    ///
    /// Single-character names use one dash and multi-character names two;
    /// valued options are always joined with `=`, short ones included.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use pandoc_options::{OptionCatalog, OptionSet};
    ///
    /// let catalog = Arc::new(OptionCatalog::parse("  -s  --standalone\n  -x N\n"));
    /// let mut options = OptionSet::new(catalog);
    /// options.set("x", Some("4")).expect("x accepts any value");
    /// options.set("s", Some("yes")).expect("s is a switch");
    /// assert_eq!(options.to_args(), ["-x=4", "--standalone"]);
    /// ```
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|(name, value)| {
                let dashes = if name.chars().nth(1).is_some() { "--" } else { "-" };
                match value {
                    OptionValue::Flag => format!("{dashes}{name}"),
                    OptionValue::Text(text) => format!("{dashes}{name}={text}"),
                }
            })
            .collect()
    }

    /// The catalogue assignments are validated against.
    #[must_use]
    pub fn catalog(&self) -> &Arc<OptionCatalog> {
        &self.catalog
    }

    fn resolve(&self, key: &str) -> Option<&str> {
        self.catalog
            .get(key)
            .map(|definition| definition.default_name())
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}
