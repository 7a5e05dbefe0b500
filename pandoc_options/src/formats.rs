//! Static format tables for the converter.
//!
//! The help text lists the input and output formats as prose, so their value
//! sets are pinned here and applied over whatever the parser inferred.

/// Formats accepted by the `from` option.
pub const FROM_FORMATS: &[&str] = &[
    "commonmark",
    "creole",
    "docbook",
    "docx",
    "dokuwiki",
    "epub",
    "fb2",
    "gfm",
    "haddock",
    "html",
    "ipynb",
    "jats",
    "json",
    "latex",
    "markdown",
    "markdown_mmd",
    "markdown_phpextra",
    "markdown_strict",
    "mediawiki",
    "man",
    "muse",
    "native",
    "odt",
    "opml",
    "org",
    "rst",
    "t2t",
    "textile",
    "tikiwiki",
    "twiki",
    "vimwiki",
];

/// Formats accepted by the `to` option.
pub const TO_FORMATS: &[&str] = &[
    "asciidoc",
    "beamer",
    "commonmark",
    "context",
    "docbook",
    "docbook5",
    "docx",
    "dokuwiki",
    "epub",
    "epub2",
    "fb2",
    "gfm",
    "haddock",
    "html",
    "html4",
    "icml",
    "ipynb",
    "jats",
    "jira",
    "json",
    "latex",
    "man",
    "markdown",
    "markdown_mmd",
    "markdown_phpextra",
    "markdown_strict",
    "mediawiki",
    "ms",
    "muse",
    "native",
    "odt",
    "opml",
    "opendocument",
    "org",
    "plain",
    "pptx",
    "rst",
    "rtf",
    "texinfo",
    "textile",
    "slideous",
    "slidy",
    "dzslides",
    "revealjs",
    "s5",
    "tei",
    "xwiki",
    "zimwiki",
];

/// Extension used when a destination format is missing from [`EXTENSIONS`].
pub const FALLBACK_EXTENSION: &str = "txt";

/// Destination format to output file extension.
pub const EXTENSIONS: &[(&str, &str)] = &[
    ("commonmark", "md"),
    ("creole", "creole"),
    ("docbook", "docbook"),
    ("docx", "docx"),
    ("dokuwiki", "dokuwiki"),
    ("epub", "epub"),
    ("fb2", "fb2"),
    ("gfm", "md"),
    ("haddock", "haddock"),
    ("html", "html"),
    ("ipynb", "ipynb"),
    ("jats", "jats"),
    ("json", "json"),
    ("latex", "latex"),
    ("markdown", "md"),
    ("markdown_mmd", "md"),
    ("markdown_phpextra", "md"),
    ("markdown_strict", "md"),
    ("mediawiki", "wiki"),
    ("man", "man"),
    ("muse", "muse"),
    ("native", "bin"),
    ("odt", "odt"),
    ("opml", "opml"),
    ("org", "org"),
    ("rst", "rst"),
    ("t2t", "t2t"),
    ("textile", "textile"),
    ("tikiwiki", "tikiwiki"),
    ("twiki", "twiki"),
    ("vimwiki", "vimwiki"),
    ("asciidoc", "asciidoc"),
    ("beamer", "beamer"),
    ("context", "context"),
    ("docbook5", "docbook5"),
    ("epub2", "epub2"),
    ("html4", "html4"),
    ("icml", "icml"),
    ("jira", "jira"),
    ("ms", "ms"),
    ("opendocument", "opendocument"),
    ("plain", "txt"),
    ("pptx", "pptx"),
    ("rtf", "rtf"),
    ("texinfo", "texinfo"),
    ("slideous", "slideous"),
    ("slidy", "slidy"),
    ("dzslides", "dzslides"),
    ("revealjs", "revealjs"),
    ("s5", "s5"),
    ("tei", "tei"),
    ("xwiki", "xwiki"),
    ("zimwiki", "zimwiki"),
];

/// Returns the pinned value set for an option's default spelling.
#[must_use]
pub fn known_values(default_name: &str) -> Option<&'static [&'static str]> {
    match default_name {
        "from" => Some(FROM_FORMATS),
        "to" => Some(TO_FORMATS),
        _ => None,
    }
}

/// Maps a destination format to an output file extension.
///
/// Unknown or absent formats fall back to [`FALLBACK_EXTENSION`].
#[must_use]
pub fn extension_for(format: Option<&str>) -> &'static str {
    format
        .and_then(|name| {
            EXTENSIONS
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, extension)| *extension)
        })
        .unwrap_or(FALLBACK_EXTENSION)
}
