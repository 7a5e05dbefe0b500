//! Self-describing option model for the pandoc command line.
//!
//! The converter's `--help` output is parsed once into an [`OptionCatalog`].
//! Requests then build an [`OptionSet`] from a path-style command with
//! [`parse_command`], and the set renders back into converter arguments with
//! [`OptionSet::to_args`].

pub mod command;
pub mod definition;
pub mod error;
pub mod formats;
pub mod help;
pub mod option_set;

pub use command::parse_command;
pub use definition::{OptionDefinition, OptionKind};
pub use error::OptionError;
pub use formats::extension_for;
pub use help::{OptionCatalog, OptionLookup, compose_help, parse_help};
pub use option_set::{OptionSet, OptionValue};
