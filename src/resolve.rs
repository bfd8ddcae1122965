//! Characterization resolution.
//!
//! A characterization is one named hardware/software variant: a row of the
//! characterization table carrying selective option overrides. Resolution
//! computes, for every catalog option, the final literal value (override
//! or default, with value aliases chased to their terminal literal) and
//! the final declaration kind after the TESTING reclassification.
//!
//! Resolution is pure: no state is shared across characterizations, and
//! resolving the same inputs twice yields identical results.

use std::collections::HashMap;

use thiserror::Error;
use togglegen_tables::{Table, TableError};

use crate::catalog::{DeclBase, EmittedKind, OptionCatalog, OptionKind};
use crate::check;

/// Required fixed columns of the characterization table; every further
/// column must name a catalog option.
pub const CHARACTERIZATION_COLUMNS: &[&str] = &["CHAR_ID", "BRIEF", "DESCRIPTION"];

/// Name of the option controlling the TESTING reclassification.
pub const TESTING_OPTION: &str = "TESTING";

/// Reserved characterization ID for the synthesized test variant.
pub const TEST_CHAR_ID: &str = "CHAR_ID_TEST";

/// Alias resolution failure, before characterization context is attached.
#[derive(Debug, Error)]
pub enum AliasFailure {
    #[error("'{0}' is not a VALUE option and cannot be aliased")]
    Dangling(String),

    #[error("alias cycle: {}", .chain.join(" -> "))]
    Cycle { chain: Vec<String> },
}

/// Errors raised while loading or resolving characterizations.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("line {line}: invalid characterization ID '{char_id}'")]
    InvalidIdentifier { line: usize, char_id: String },

    #[error("characterization '{char_id}' (line {line}) is defined more than once")]
    DuplicateCharId { line: usize, char_id: String },

    #[error("characterization table column '{column}' does not name a catalog option")]
    UnknownOptionColumn { column: String },

    #[error("characterization '{char_id}', option '{option}': {source}")]
    Alias {
        char_id: String,
        option: String,
        source: AliasFailure,
    },
}

/// One characterization row: identity, documentation, and the raw
/// overrides (non-empty cells only; an empty cell means "use default").
#[derive(Debug, Clone)]
pub struct Characterization {
    pub char_id: String,
    pub brief: String,
    pub description: String,
    overrides: HashMap<String, String>,
}

impl Characterization {
    /// Load all characterizations from the table, in row order.
    ///
    /// Fixed columns are validated for presence, IDs for grammar and
    /// uniqueness, and every remaining column must name a catalog option.
    pub fn from_table(
        table: &Table,
        catalog: &OptionCatalog,
    ) -> Result<Vec<Self>, ResolveError> {
        table.require_columns(CHARACTERIZATION_COLUMNS)?;
        let id_col = table.column_required("CHAR_ID")?;
        let brief_col = table.column_required("BRIEF")?;
        let description_col = table.column_required("DESCRIPTION")?;

        let fixed = [id_col, brief_col, description_col];
        for (i, column) in table.header().iter().enumerate() {
            if !fixed.contains(&i) && !catalog.contains(column) {
                return Err(ResolveError::UnknownOptionColumn {
                    column: column.clone(),
                });
            }
        }

        let mut characterizations: Vec<Self> = Vec::with_capacity(table.rows().len());
        for row in table.rows() {
            let char_id = row.cell(id_col).to_string();
            if !check::is_identifier(&char_id) {
                return Err(ResolveError::InvalidIdentifier {
                    line: row.line(),
                    char_id,
                });
            }
            if characterizations.iter().any(|ch| ch.char_id == char_id) {
                return Err(ResolveError::DuplicateCharId {
                    line: row.line(),
                    char_id,
                });
            }

            let mut overrides = HashMap::new();
            for (i, column) in table.header().iter().enumerate() {
                if !fixed.contains(&i) && !row.is_blank(i) {
                    overrides.insert(column.clone(), row.cell(i).to_string());
                }
            }

            characterizations.push(Self {
                char_id,
                brief: row.cell(brief_col).to_string(),
                description: row.cell(description_col).to_string(),
                overrides,
            });
        }

        Ok(characterizations)
    }

    /// The synthesized test variant: every option at its default with
    /// TESTING forced on.
    pub fn synthetic_test() -> Self {
        let mut overrides = HashMap::new();
        overrides.insert(TESTING_OPTION.to_string(), "1".to_string());
        Self {
            char_id: TEST_CHAR_ID.to_string(),
            brief: "Testing characterization.".to_string(),
            description: "All options at their defaults with TESTING enabled.".to_string(),
            overrides,
        }
    }

    /// The raw override for an option, when present and non-empty.
    pub fn override_for(&self, option: &str) -> Option<&str> {
        self.overrides.get(option).map(String::as_str)
    }
}

/// One fully resolved option within one characterization.
#[derive(Debug, Clone)]
pub struct ResolvedOption {
    pub name: String,
    /// Final literal value, with aliases substituted.
    pub value: String,
    /// Final declaration kind, after the TESTING reclassification.
    pub kind: EmittedKind,
    /// True when TESTING reclassified this declaration.
    pub transformed: bool,
    /// Expansion of `@CONST@` for this option: `const` unless the
    /// declaration was reclassified or is a VAR.
    pub constness: bool,
}

/// A characterization resolved against the option catalog: exactly one
/// entry per catalog option, in catalog order.
#[derive(Debug, Clone)]
pub struct ResolvedCharacterization {
    pub char_id: String,
    pub brief: String,
    pub description: String,
    pub testing: bool,
    pub options: Vec<ResolvedOption>,
}

/// Result of chasing value aliases from a raw literal.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The terminal literal.
    pub value: String,
    /// The alias names traversed to reach it, in order. Empty when the
    /// raw literal named nothing in the catalog.
    pub chain: Vec<String>,
}

/// Chase value aliases: while the literal names a catalog option, it must
/// be a VALUE option, and its own default is substituted recursively.
/// Literals naming nothing in the catalog (including C spellings such as
/// `true` or `NULL`) pass through untouched.
pub fn resolve_value(catalog: &OptionCatalog, raw: &str) -> Result<Resolution, AliasFailure> {
    let mut chain: Vec<String> = Vec::new();
    let mut current = raw.to_string();

    while let Some(target) = catalog.get(&current) {
        if target.kind != OptionKind::Value {
            return Err(AliasFailure::Dangling(current));
        }
        if chain.contains(&current) {
            chain.push(current);
            return Err(AliasFailure::Cycle { chain });
        }
        chain.push(current.clone());
        current = target.default.clone();
    }

    Ok(Resolution {
        value: current,
        chain,
    })
}

/// TESTING truthiness: empty, `0`, and `false` are off; anything else on.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Resolve one characterization against the catalog.
pub fn resolve(
    catalog: &OptionCatalog,
    characterization: &Characterization,
) -> Result<ResolvedCharacterization, ResolveError> {
    // First pass: effective literal per option. VALUE options never take
    // overrides; their final value is always the (alias-resolved) default.
    let mut values = Vec::with_capacity(catalog.len());
    for def in catalog.options() {
        let raw = match def.kind {
            OptionKind::Option => characterization
                .override_for(&def.name)
                .unwrap_or(def.default.as_str()),
            OptionKind::Value => def.default.as_str(),
        };
        let resolution =
            resolve_value(catalog, raw).map_err(|source| ResolveError::Alias {
                char_id: characterization.char_id.clone(),
                option: def.name.clone(),
                source,
            })?;
        values.push(resolution.value);
    }

    let testing = catalog
        .options()
        .iter()
        .zip(&values)
        .find(|(def, _)| def.name == TESTING_OPTION)
        .map(|(_, value)| is_truthy(value))
        .unwrap_or(false);

    let options = catalog
        .options()
        .iter()
        .zip(values)
        .map(|(def, value)| {
            let transformed =
                testing && def.kind == OptionKind::Option && def.decl.is_testable();
            ResolvedOption {
                name: def.name.clone(),
                value,
                kind: def.decl.emitted_kind(transformed),
                transformed,
                constness: !transformed && def.decl.base != DeclBase::Var,
            }
        })
        .collect();

    Ok(ResolvedCharacterization {
        char_id: characterization.char_id.clone(),
        brief: characterization.brief.clone(),
        description: characterization.description.clone(),
        testing,
        options,
    })
}
