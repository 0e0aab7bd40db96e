// file: src/compare.rs
// version: 1.0.0
// guid: 78690c86-bbb3-40f5-aa3a-eb7f0823912f

//! Structural diff between two JSON documents

use crate::{error::BatchError, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt::{self, Write as _};
use std::io;
use std::path::Path;

/// Width at which rendered values are cut off
pub const SHORT_WIDTH: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiffKind {
    MissingInLeft,
    MissingInRight,
    TypeMismatch,
    ValueDiff,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiffKind::MissingInLeft => "MISSING_IN_LEFT",
            DiffKind::MissingInRight => "MISSING_IN_RIGHT",
            DiffKind::TypeMismatch => "TYPE_MISMATCH",
            DiffKind::ValueDiff => "VALUE_DIFF",
        })
    }
}

/// One difference. For `TypeMismatch` the sides hold type names.
#[derive(Debug, Clone, PartialEq)]
pub struct Diff {
    pub kind: DiffKind,
    pub path: String,
    pub left: Option<Value>,
    pub right: Option<Value>,
}

/// JSON type name; integers and floats count as different types
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Differ with a compiled identifier pattern
pub struct JsonDiffer {
    ident: Regex,
}

impl JsonDiffer {
    pub fn new() -> Result<Self> {
        let ident = Regex::new(r"^[A-Za-z_]\w*$")
            .map_err(|e| BatchError::config(format!("Invalid regex pattern: {}", e)))?;
        Ok(Self { ident })
    }

    fn key_path(&self, base: &str, key: &str) -> String {
        if self.ident.is_match(key) {
            format!("{}.{}", base, key)
        } else {
            format!(
                "{}[\"{}\"]",
                base,
                key.replace('\\', "\\\\").replace('"', "\\\"")
            )
        }
    }

    /// All differences, sorted by path then kind
    pub fn diff(&self, left: &Value, right: &Value) -> Vec<Diff> {
        let mut diffs = Vec::new();
        self.diff_values(left, right, "$", &mut diffs);
        diffs.sort_by(|a, b| a.path.cmp(&b.path).then(a.kind.cmp(&b.kind)));
        diffs
    }

    fn diff_values(&self, left: &Value, right: &Value, path: &str, diffs: &mut Vec<Diff>) {
        if type_name(left) != type_name(right) {
            diffs.push(Diff {
                kind: DiffKind::TypeMismatch,
                path: path.to_string(),
                left: Some(Value::String(type_name(left).to_string())),
                right: Some(Value::String(type_name(right).to_string())),
            });
            return;
        }

        match (left, right) {
            (Value::Object(l), Value::Object(r)) => {
                let keys: BTreeSet<&String> = l.keys().chain(r.keys()).collect();
                for key in keys {
                    let child = self.key_path(path, key);
                    match (l.get(key), r.get(key)) {
                        (Some(lv), Some(rv)) => self.diff_values(lv, rv, &child, diffs),
                        (Some(lv), None) => diffs.push(Diff {
                            kind: DiffKind::MissingInRight,
                            path: child,
                            left: Some(lv.clone()),
                            right: None,
                        }),
                        (None, Some(rv)) => diffs.push(Diff {
                            kind: DiffKind::MissingInLeft,
                            path: child,
                            left: None,
                            right: Some(rv.clone()),
                        }),
                        (None, None) => {}
                    }
                }
            }
            (Value::Array(l), Value::Array(r)) => {
                for i in 0..l.len().max(r.len()) {
                    let child = format!("{}[{}]", path, i);
                    match (l.get(i), r.get(i)) {
                        (Some(lv), Some(rv)) => self.diff_values(lv, rv, &child, diffs),
                        (Some(lv), None) => diffs.push(Diff {
                            kind: DiffKind::MissingInRight,
                            path: child,
                            left: Some(lv.clone()),
                            right: None,
                        }),
                        (None, Some(rv)) => diffs.push(Diff {
                            kind: DiffKind::MissingInLeft,
                            path: child,
                            left: None,
                            right: Some(rv.clone()),
                        }),
                        (None, None) => {}
                    }
                }
            }
            _ if left != right => diffs.push(Diff {
                kind: DiffKind::ValueDiff,
                path: path.to_string(),
                left: Some(left.clone()),
                right: Some(right.clone()),
            }),
            _ => {}
        }
    }
}

/// Single-line JSON with a space after `,` and `:`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

fn spaced(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

/// Spaced single-line JSON rendering cut to `width` characters
pub fn short(value: &Value, width: usize) -> String {
    let text = spaced(value);
    if text.chars().count() <= width {
        text
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Human-readable report for a diff list
pub fn render_report(diffs: &[Diff], left_name: &str, right_name: &str) -> String {
    let mut out = String::new();
    if diffs.is_empty() {
        out.push_str("No differences found.\n");
        return out;
    }

    let _ = writeln!(out, "{} differences found:\n", diffs.len());
    for diff in diffs {
        let _ = writeln!(out, "[{}] {}", diff.kind, diff.path);
        let side = |value: &Option<Value>| match (diff.kind, value) {
            (_, None) => "(missing)".to_string(),
            (DiffKind::TypeMismatch, Some(Value::String(name))) => name.clone(),
            (_, Some(v)) => short(v, SHORT_WIDTH),
        };
        let _ = writeln!(out, "  - {}: {}", left_name, side(&diff.left));
        let _ = writeln!(out, "  + {}: {}", right_name, side(&diff.right));
        out.push('\n');
    }
    out
}

/// Load a JSON file
pub fn load_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| BatchError::file_not_found(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| BatchError::validation(format!("Failed to parse {}: {}", path.display(), e)))
}
