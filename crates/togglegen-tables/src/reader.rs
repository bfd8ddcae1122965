//! Record-level parser for the tab-separated format.
//!
//! Handles the quoting conventions of spreadsheet exports:
//! - fields are separated by horizontal tabs, records by newlines
//! - a field starting with `"` is quoted; it may contain tabs and newlines
//! - `""` inside a quoted field is a literal quote
//! - CRLF is normalized to LF, inside and outside quotes
//!
//! Cells are also normalized for the typographic characters word processors
//! and spreadsheet editors substitute silently: curly double quotes become
//! ASCII quotes and en dashes become hyphens.

use crate::TableError;

/// One raw record: starting line number plus its cells.
#[derive(Debug)]
pub(crate) struct RawRecord {
    pub(crate) line: usize,
    pub(crate) cells: Vec<String>,
}

/// Split input text into records.
///
/// The returned records are unpadded and unvalidated; [`crate::Table`]
/// applies the header-width rules.
pub(crate) fn parse_records(text: &str) -> Result<Vec<RawRecord>, TableError> {
    let mut records = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1usize;

    while chars.peek().is_some() {
        let record_line = line;
        let mut cells = Vec::new();
        let mut cell = String::new();

        'fields: loop {
            // Quoted prefix of the field.
            if chars.peek() == Some(&'"') {
                chars.next();
                loop {
                    match chars.next() {
                        None => {
                            return Err(TableError::UnterminatedQuote { line: record_line });
                        }
                        Some('"') => {
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                cell.push('"');
                            } else {
                                break;
                            }
                        }
                        Some('\r') if chars.peek() == Some(&'\n') => {}
                        Some('\n') => {
                            line += 1;
                            cell.push('\n');
                        }
                        Some(c) => cell.push(c),
                    }
                }
            }

            // Unquoted remainder, up to the next tab or end of record.
            // Text after a closing quote is kept literally, like the
            // spreadsheet tools that produce these files do.
            loop {
                match chars.next() {
                    None => {
                        cells.push(normalize_cell(&cell));
                        break 'fields;
                    }
                    Some('\t') => {
                        cells.push(normalize_cell(&cell));
                        cell.clear();
                        continue 'fields;
                    }
                    Some('\r') if chars.peek() == Some(&'\n') => {}
                    Some('\n') => {
                        line += 1;
                        cells.push(normalize_cell(&cell));
                        break 'fields;
                    }
                    Some(c) => cell.push(c),
                }
            }
        }

        records.push(RawRecord {
            line: record_line,
            cells,
        });
    }

    Ok(records)
}

/// Replace the typographic characters LibreOffice Calc and friends insert.
fn normalize_cell(cell: &str) -> String {
    if !cell.contains(['\u{201C}', '\u{201D}', '\u{2013}']) {
        return cell.to_string();
    }
    cell.replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2013}', "-")
}
