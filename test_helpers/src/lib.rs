//! Test helpers shared across crates in the pandoc-api workspace.
//!
//! Provides the converter help transcript and catalogues built from it.

pub mod fixtures;
