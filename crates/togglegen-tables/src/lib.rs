//! Tab-separated table model for the toggle generator.
//!
//! The generator's two inputs — the option defaults table and the
//! characterization table — share one structural format: tab-delimited
//! fields, double-quote quoting with doubled quotes for embedded quotes,
//! first row as header. This crate parses that format into ordered row
//! records and performs the structural validation that happens before any
//! semantic interpretation of the cells.

mod reader;

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Structural table errors.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read table: {0}")]
    Io(#[from] io::Error),

    #[error("table has no header row")]
    MissingHeader,

    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: row has {found} fields but the header has {expected}")]
    TooManyFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("missing required column '{0}'")]
    MissingColumn(String),
}

/// One data row, tagged with the 1-based line number where it starts.
#[derive(Debug, Clone)]
pub struct Row {
    line: usize,
    cells: Vec<String>,
}

impl Row {
    /// 1-based line number of the row's first character in the input.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Cell value by column index. Rows are padded to the header width, so
    /// every index below the header length yields a cell; out-of-range
    /// indexes yield the empty cell.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// True when the cell is empty, meaning "not specified".
    pub fn is_blank(&self, index: usize) -> bool {
        self.cell(index).is_empty()
    }
}

/// A parsed table: ordered header plus ordered data rows.
///
/// Row order is load order and is significant: declarations are emitted in
/// defaults-table order and characterizations are numbered in
/// characterization-table order.
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Parse a table from text.
    ///
    /// Rows whose cells are all empty are skipped. Rows shorter than the
    /// header are padded with empty cells (editors that strip trailing
    /// whitespace also truncate trailing tab runs); rows longer than the
    /// header fail with [`TableError::TooManyFields`].
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut records = reader::parse_records(text)?;
        if records.is_empty() {
            return Err(TableError::MissingHeader);
        }
        let header = records.remove(0).cells;

        let mut rows = Vec::new();
        for record in records {
            if record.cells.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            if record.cells.len() > header.len() {
                return Err(TableError::TooManyFields {
                    line: record.line,
                    expected: header.len(),
                    found: record.cells.len(),
                });
            }
            let mut cells = record.cells;
            cells.resize(header.len(), String::new());
            rows.push(Row {
                line: record.line,
                cells,
            });
        }

        Ok(Self { header, rows })
    }

    /// Load and parse a table file.
    pub fn from_file(path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Header cells, in column order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, in load order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Index of a named column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Index of a named column, failing when absent.
    pub fn column_required(&self, name: &str) -> Result<usize, TableError> {
        self.column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Check that every named column is present.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), TableError> {
        for name in names {
            self.column_required(name)?;
        }
        Ok(())
    }
}
