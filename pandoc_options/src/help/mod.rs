//! Parser turning the converter's `--help` output into option definitions.
//!
//! Every line carrying at least one option-like token describes one logical
//! option; all tokens on that line are aliases of it. Value shapes are
//! inferred from the placeholder syntax and then overridden for the options
//! listed in [`crate::formats::known_values`].

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::definition::{OptionDefinition, OptionKind};
use crate::formats;

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static OPTION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s-([a-zA-Z])(?: ([A-Z:\[\]]+))?|--([a-z\-]+)([a-zA-Z=:\[\]|]+)?")
        .expect("option token pattern must compile")
});

/// Lookup table keyed by every recognised spelling.
pub type OptionLookup = HashMap<String, Arc<OptionDefinition>>;

/// Option definitions parsed from one help text, plus the text itself.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, Default)]
pub struct OptionCatalog {
    definitions: Vec<Arc<OptionDefinition>>,
    lookup: OptionLookup,
    help_text: String,
}

impl OptionCatalog {
    /// Parses the help `text` into a catalogue.
    ///
    /// # Examples
    ///
    /// ```
    /// use pandoc_options::{OptionCatalog, OptionKind};
    ///
    /// let catalog = OptionCatalog::parse("  -s  --standalone\n  -o FILE  --output=FILE\n");
    /// assert_eq!(catalog.len(), 2);
    /// let output = catalog.get("o").expect("output option");
    /// assert_eq!(output.default_name(), "output");
    /// assert_eq!(output.kind(), OptionKind::String);
    /// ```
    #[must_use]
    pub fn parse(text: impl Into<String>) -> Self {
        let help_text = text.into();
        let (definitions, lookup) = parse_help(&help_text);
        Self {
            definitions,
            lookup,
            help_text,
        }
    }

    /// Resolves any spelling of an option.
    #[must_use]
    pub fn get(&self, spelling: &str) -> Option<&Arc<OptionDefinition>> {
        self.lookup.get(spelling)
    }

    /// Returns `true` when `spelling` names a known option.
    #[must_use]
    pub fn contains(&self, spelling: &str) -> bool {
        self.lookup.contains_key(spelling)
    }

    /// Definitions in the order their lines appear in the help text.
    #[must_use]
    pub fn definitions(&self) -> &[Arc<OptionDefinition>] {
        &self.definitions
    }

    /// The spelling lookup table.
    #[must_use]
    pub const fn lookup(&self) -> &OptionLookup {
        &self.lookup
    }

    /// The unmodified help text the catalogue was built from.
    #[must_use]
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    /// Number of parsed definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` when no option lines were recognised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Parses help text into the definition list and spelling lookup table.
///
/// A spelling that reappears on a later line is re-pointed at the later
/// definition.
#[must_use]
pub fn parse_help(help_text: &str) -> (Vec<Arc<OptionDefinition>>, OptionLookup) {
    let mut definitions = Vec::new();
    let mut lookup = OptionLookup::new();

    for definition in help_text.lines().filter_map(parse_line) {
        let shared = Arc::new(definition);
        for name in shared.names() {
            lookup.insert(name.clone(), Arc::clone(&shared));
        }
        definitions.push(shared);
    }

    tracing::debug!(
        options = definitions.len(),
        spellings = lookup.len(),
        "parsed converter help text"
    );
    (definitions, lookup)
}

/// Prefixes the raw converter help with a service banner.
#[must_use]
pub fn compose_help(banner: &str, help_text: &str) -> String {
    format!("{banner}\n\n{help_text}")
}

fn parse_line(line: &str) -> Option<OptionDefinition> {
    let mut definition = OptionDefinition::default();

    for captures in OPTION_TOKEN.captures_iter(line) {
        if let Some(short) = captures.get(1) {
            definition.push_name(short.as_str());
            if let Some(placeholder) = captures.get(2) {
                definition.set_kind(placeholder_kind(placeholder.as_str()));
            }
        } else if let Some(long) = captures.get(3) {
            definition.push_name(long.as_str());
            if let Some(suffix) = captures.get(4) {
                apply_long_suffix(&mut definition, suffix.as_str());
            }
        }
    }

    if !definition.has_names() {
        return None;
    }

    if let Some(values) = formats::known_values(definition.default_name()) {
        definition.set_kind(OptionKind::Enum);
        definition.set_values(values.iter().copied());
    }
    Some(definition)
}

fn placeholder_kind(placeholder: &str) -> OptionKind {
    if placeholder.contains(':') {
        OptionKind::Meta
    } else {
        OptionKind::String
    }
}

fn apply_long_suffix(definition: &mut OptionDefinition, suffix: &str) {
    if suffix.contains(':') {
        definition.set_kind(OptionKind::Meta);
    } else if suffix.starts_with('[') {
        definition.set_kind(OptionKind::String);
        definition.mark_optional_value();
    } else if suffix.contains('|') {
        let alternatives: Vec<&str> = suffix.trim_start_matches('=').split('|').collect();
        if alternatives.first().is_some_and(|first| is_lowercase_word(first)) {
            definition.set_kind(OptionKind::Enum);
            definition.set_values(alternatives);
        } else {
            definition.set_kind(OptionKind::String);
        }
    } else {
        definition.set_kind(OptionKind::String);
    }
}

fn is_lowercase_word(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.chars().all(|ch| ch.is_ascii_lowercase())
}
