// file: src/dataset/csv.rs
// version: 1.0.0
// guid: 0b7f3e21-5c84-4d9a-b6e0-2a9d1c7f4e58

//! RFC 4180 cells for the task metadata sheets

use crate::{error::BatchError, Result};
use std::fs;
use std::path::Path;

/// A parsed sheet: the header row plus every data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of a header column
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// Quote a cell, doubling embedded quotes
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Split CSV text into records. Blank lines are skipped; an unterminated
/// quoted cell is an error.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_started = false;
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' => {}
            '\n' => {
                if field_started || !field.is_empty() || !record.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(BatchError::validation("unterminated quoted CSV cell"));
    }
    if field_started || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

/// Read a CSV file whose first record is the header
pub fn read_table(path: &Path) -> Result<CsvTable> {
    let text = fs::read_to_string(path)?;
    let mut records = parse_records(&text)
        .map_err(|e| BatchError::validation(format!("{}: {}", path.display(), e)))?
        .into_iter();
    let header = records.next().unwrap_or_default();
    Ok(CsvTable {
        header,
        rows: records.collect(),
    })
}
