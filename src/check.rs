//! Cross-table consistency checks.
//!
//! Identifier grammar and by-name lookups that must succeed before
//! emission starts. The table-specific rules (required columns, duplicate
//! names, alias integrity) live with the builders in [`crate::catalog`]
//! and [`crate::resolve`]; this module holds what is shared between them
//! and the pipeline.

use regex_lite::Regex;
use thiserror::Error;

use crate::catalog::{OptionCatalog, OptionDef};
use crate::resolve::Characterization;

/// Lookup failures for names supplied at invocation time.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("unknown characterization '{0}'")]
    UnknownCharacterization(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),
}

/// Identifier grammar shared by option names and characterization IDs.
pub fn is_identifier(name: &str) -> bool {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$")
        .unwrap()
        .is_match(name)
}

/// Find the characterization selected at invocation time.
pub fn find_characterization<'a>(
    characterizations: &'a [Characterization],
    char_id: &str,
) -> Result<&'a Characterization, CheckError> {
    characterizations
        .iter()
        .find(|ch| ch.char_id == char_id)
        .ok_or_else(|| CheckError::UnknownCharacterization(char_id.to_string()))
}

/// Find a catalog option by name.
pub fn find_option<'a>(
    catalog: &'a OptionCatalog,
    name: &str,
) -> Result<&'a OptionDef, CheckError> {
    catalog
        .get(name)
        .ok_or_else(|| CheckError::UnknownOption(name.to_string()))
}
