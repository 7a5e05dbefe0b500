//! Data model describing a single converter option.
//!
//! Definitions are produced once by [`crate::help::parse_help`] and shared
//! read-only afterwards, so nothing here mutates after construction outside
//! the parser.

use std::fmt;

/// Value shape accepted by an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Presence/absence switch.
    Boolean,
    /// Free-form value.
    String,
    /// Value restricted to a closed set.
    Enum,
    /// Converter-specific structured value (for example `KEY[:VALUE]`).
    Meta,
}

impl OptionKind {
    /// Returns the lowercase name used in help and error output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Meta => "meta",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed description of one converter option and all of its spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDefinition {
    kind: OptionKind,
    names: Vec<String>,
    default_name: String,
    optional_value: bool,
    values: Vec<String>,
}

impl Default for OptionDefinition {
    fn default() -> Self {
        Self {
            kind: OptionKind::Boolean,
            names: Vec::new(),
            default_name: String::new(),
            optional_value: false,
            values: Vec::new(),
        }
    }
}

impl OptionDefinition {
    /// Returns the value shape of the option.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Every spelling recognised for the option, in the order encountered.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Canonical spelling used when the option is re-emitted as an argument.
    #[must_use]
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Whether the option may appear without a value.
    #[must_use]
    pub const fn optional_value(&self) -> bool {
        self.optional_value
    }

    /// Legal values; empty unless the option is an [`OptionKind::Enum`].
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns `true` when `value` is one of the enumerated values.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.values.iter().any(|candidate| candidate == value)
    }

    /// Records a spelling and updates the default spelling.
    ///
    /// The first spelling becomes the default; a long spelling replaces a
    /// short default, but never another long one.
    pub(crate) fn push_name(&mut self, name: &str) {
        self.names.push(name.to_owned());
        let is_long = name.chars().nth(1).is_some();
        let default_is_short = self.default_name.chars().nth(1).is_none();
        if self.default_name.is_empty() || (is_long && default_is_short) {
            self.default_name = name.to_owned();
        }
    }

    pub(crate) const fn set_kind(&mut self, kind: OptionKind) {
        self.kind = kind;
    }

    pub(crate) const fn mark_optional_value(&mut self) {
        self.optional_value = true;
    }

    pub(crate) fn set_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
    }

    /// Returns `true` once at least one spelling has been recorded.
    pub(crate) const fn has_names(&self) -> bool {
        !self.names.is_empty()
    }
}
