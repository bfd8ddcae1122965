//! Option catalog built from the defaults table.
//!
//! Each defaults-table row becomes one immutable [`OptionDef`]. The
//! catalog preserves row order, which is the emission order for generated
//! declarations, and indexes options by name for alias resolution.

mod decl;
mod template;

pub use decl::{DeclBase, DeclSpec, EmittedKind, PrimType};
pub use template::{default_header, default_source, Template};

use std::collections::HashMap;

use thiserror::Error;
use togglegen_tables::{Table, TableError};

use crate::check;

/// Required columns of the defaults table.
pub const DEFAULTS_COLUMNS: &[&str] = &[
    "NAME",
    "DEFAULT",
    "TYPE",
    "DECL",
    "BRIEF",
    "DESCRIPTION",
    "H",
    "C",
];

/// Errors raised while building the option catalog. All are fatal; no
/// output is written.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("line {line}: invalid option name '{name}'")]
    InvalidIdentifier { line: usize, name: String },

    #[error("option '{name}' (line {line}): unknown DECL '{tag}'")]
    UnknownDecl {
        line: usize,
        name: String,
        tag: String,
    },

    #[error("option '{name}' (line {line}): unknown TYPE '{value}', expected OPTION or VALUE")]
    UnknownKind {
        line: usize,
        name: String,
        value: String,
    },

    #[error("option '{name}' (line {line}) is defined more than once")]
    DuplicateName { line: usize, name: String },
}

/// OPTION/VALUE classification from the TYPE column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Overridable per characterization; subject to the TESTING
    /// reclassification.
    Option,
    /// Fixed across all characterizations; usable as an alias target.
    /// Never overridden, never reclassified.
    Value,
}

impl OptionKind {
    /// Parse the TYPE cell. An empty cell defaults to OPTION.
    fn parse(cell: &str) -> Option<Self> {
        match cell {
            "" | "OPTION" => Some(OptionKind::Option),
            "VALUE" => Some(OptionKind::Value),
            _ => None,
        }
    }

    /// The tag spelling, for reports.
    pub fn tag(self) -> &'static str {
        match self {
            OptionKind::Option => "OPTION",
            OptionKind::Value => "VALUE",
        }
    }
}

/// One option definition from the defaults table. Immutable once built.
#[derive(Debug, Clone)]
pub struct OptionDef {
    pub name: String,
    /// Default literal, or the name of a VALUE option to alias.
    pub default: String,
    pub kind: OptionKind,
    pub decl: DeclSpec,
    /// Custom header template (H column), when given.
    pub header_template: Option<Template>,
    /// Custom source template (C column), when given.
    pub source_template: Option<Template>,
    pub brief: String,
    pub description: String,
}

/// The ordered option catalog.
#[derive(Debug, Clone)]
pub struct OptionCatalog {
    options: Vec<OptionDef>,
    index: HashMap<String, usize>,
}

impl OptionCatalog {
    /// Build the catalog from the defaults table, validating names, TYPE
    /// tags, and DECL tags row by row.
    pub fn from_table(table: &Table) -> Result<Self, CatalogError> {
        table.require_columns(DEFAULTS_COLUMNS)?;
        let name_col = table.column_required("NAME")?;
        let default_col = table.column_required("DEFAULT")?;
        let kind_col = table.column_required("TYPE")?;
        let decl_col = table.column_required("DECL")?;
        let brief_col = table.column_required("BRIEF")?;
        let description_col = table.column_required("DESCRIPTION")?;
        let header_col = table.column_required("H")?;
        let source_col = table.column_required("C")?;

        let mut options: Vec<OptionDef> = Vec::with_capacity(table.rows().len());
        let mut index = HashMap::new();

        for row in table.rows() {
            let name = row.cell(name_col).to_string();
            if !check::is_identifier(&name) {
                return Err(CatalogError::InvalidIdentifier {
                    line: row.line(),
                    name,
                });
            }
            if index.contains_key(&name) {
                return Err(CatalogError::DuplicateName {
                    line: row.line(),
                    name,
                });
            }

            let kind_cell = row.cell(kind_col);
            let kind = OptionKind::parse(kind_cell).ok_or_else(|| CatalogError::UnknownKind {
                line: row.line(),
                name: name.clone(),
                value: kind_cell.to_string(),
            })?;

            let tag = row.cell(decl_col);
            let decl = DeclSpec::parse(tag).ok_or_else(|| CatalogError::UnknownDecl {
                line: row.line(),
                name: name.clone(),
                tag: tag.to_string(),
            })?;

            index.insert(name.clone(), options.len());
            options.push(OptionDef {
                name,
                default: row.cell(default_col).to_string(),
                kind,
                decl,
                header_template: custom_template(row.cell(header_col)),
                source_template: custom_template(row.cell(source_col)),
                brief: row.cell(brief_col).to_string(),
                description: row.cell(description_col).to_string(),
            });
        }

        Ok(Self { options, index })
    }

    /// Options in defaults-table order.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    /// Look up an option by name.
    pub fn get(&self, name: &str) -> Option<&OptionDef> {
        self.index.get(name).map(|&i| &self.options[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// An empty cell means "synthesize the default template".
fn custom_template(cell: &str) -> Option<Template> {
    if cell.is_empty() {
        None
    } else {
        Some(Template::parse(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults_table(body: &str) -> Table {
        let text = format!("NAME\tDEFAULT\tTYPE\tDECL\tBRIEF\tDESCRIPTION\tH\tC\n{body}");
        Table::parse(&text).unwrap()
    }

    #[test]
    fn test_build_catalog() {
        let table = defaults_table(
            "TESTING\t0\tOPTION\tMACRO\tTest mode.\t\t\t\n\
             SERIAL_DEBUG\tNO_SER_DBG\tOPTION\tMACRO_INT8\tSerial debug port.\t\t\t\n\
             NO_SER_DBG\t0\tVALUE\tMACRO_INT8\tNo serial debug.\t\t\t\n",
        );
        let catalog = OptionCatalog::from_table(&table).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.options()[1].name, "SERIAL_DEBUG");
        assert_eq!(catalog.options()[1].default, "NO_SER_DBG");

        let value = catalog.get("NO_SER_DBG").unwrap();
        assert_eq!(value.kind, OptionKind::Value);
        assert!(catalog.get("MISSING").is_none());
    }

    #[test]
    fn test_empty_type_defaults_to_option() {
        let table = defaults_table("FOO\t1\t\tMACRO\tFoo.\t\t\t\n");
        let catalog = OptionCatalog::from_table(&table).unwrap();
        assert_eq!(catalog.options()[0].kind, OptionKind::Option);
    }

    #[test]
    fn test_custom_templates_kept() {
        let table = defaults_table(
            "FOO\t1\tOPTION\tMACRO\tFoo.\t\t#define @NAME@_ALT @VALUE@\t\n",
        );
        let catalog = OptionCatalog::from_table(&table).unwrap();
        let foo = catalog.get("FOO").unwrap();
        let header = foo.header_template.as_ref().unwrap();
        assert_eq!(header.render("FOO", "1", true), "#define FOO_ALT 1");
        assert!(foo.source_template.is_none());
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let table = defaults_table("9LIVES\t0\tOPTION\tMACRO\t\t\t\t\n");
        assert!(matches!(
            OptionCatalog::from_table(&table),
            Err(CatalogError::InvalidIdentifier { line: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let table = defaults_table(
            "FOO\t0\tOPTION\tMACRO\t\t\t\t\nFOO\t1\tOPTION\tMACRO\t\t\t\t\n",
        );
        assert!(matches!(
            OptionCatalog::from_table(&table),
            Err(CatalogError::DuplicateName { line: 3, .. })
        ));
    }

    #[test]
    fn test_unknown_decl_rejected() {
        let table = defaults_table("FOO\t0\tOPTION\tMACRO_VOID\t\t\t\t\n");
        assert!(matches!(
            OptionCatalog::from_table(&table),
            Err(CatalogError::UnknownDecl { .. })
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let table = defaults_table("FOO\t0\tSETTING\tMACRO\t\t\t\t\n");
        assert!(matches!(
            OptionCatalog::from_table(&table),
            Err(CatalogError::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_missing_column_rejected() {
        let table = Table::parse("NAME\tDEFAULT\nFOO\t0\n").unwrap();
        assert!(matches!(
            OptionCatalog::from_table(&table),
            Err(CatalogError::Table(TableError::MissingColumn(_)))
        ));
    }
}
