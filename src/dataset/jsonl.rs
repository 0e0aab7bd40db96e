// file: src/dataset/jsonl.rs
// version: 1.0.0
// guid: b40c6a59-4bf7-45db-be34-fdf21a064959

//! JSON Lines reading, writing and merging

use crate::{error::BatchError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parse every non-blank line of a JSONL file
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)
        .map_err(|e| BatchError::file_not_found(format!("{}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            BatchError::validation(format!("{}:{}: {}", path.display(), idx + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Like `read_records` for raw values, but skips lines that are not JSON.
/// Returns the values and the number of skipped lines.
pub fn read_values_lenient(path: &Path) -> Result<(Vec<Value>, usize)> {
    let file = File::open(path)
        .map_err(|e| BatchError::file_not_found(format!("{}: {}", path.display(), e)))?;

    let mut values = Vec::new();
    let mut skipped = 0;
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(value) => values.push(value),
            Err(e) => {
                debug!("Skipping non-JSON line in {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }
    Ok((values, skipped))
}

/// Write values one per line
pub fn write_values(path: &Path, values: &[Value]) -> Result<()> {
    let mut out = BufWriter::new(create_file(path)?);
    for value in values {
        serde_json::to_writer(&mut out, value)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Create a file, making its parent directory first
pub fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}

/// Files directly inside `dir` with the given extension, sorted by name
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .map_err(|e| BatchError::file_not_found(format!("{}: {}", dir.display(), e)))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Concatenate every `*.jsonl` in `input_dir` into `output`, dropping
/// blank lines. Returns the number of lines written.
pub fn merge_jsonl_dir(input_dir: &Path, output: &Path) -> Result<usize> {
    let inputs = files_with_extension(input_dir, "jsonl")?;
    // The output may live in the input directory; never read it back
    let inputs: Vec<PathBuf> = inputs
        .into_iter()
        .filter(|p| !same_file(p, output))
        .collect();

    let mut out = BufWriter::new(create_file(output)?);
    let mut written = 0;

    for input in &inputs {
        let reader = BufReader::new(File::open(input)?);
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
            written += 1;
        }
        debug!("Merged {}", input.display());
    }

    out.flush()?;
    info!(
        "Merged {} lines from {} files into {}",
        written,
        inputs.len(),
        output.display()
    );
    Ok(written)
}

/// Collect the JSON documents found one level below `parent` into a single
/// array written to `output`. Returns the number of documents.
pub fn merge_json_subdirs(parent: &Path, output: &Path) -> Result<usize> {
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(parent)
        .map_err(|e| BatchError::file_not_found(format!("{}: {}", parent.display(), e)))?
    {
        let path = entry?.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();

    let mut merged = Vec::new();
    for dir in &subdirs {
        for json_path in files_with_extension(dir, "json")? {
            let text = fs::read_to_string(&json_path)?;
            let value: Value = serde_json::from_str(&text).map_err(|e| {
                BatchError::validation(format!("{}: {}", json_path.display(), e))
            })?;
            merged.push(value);
        }
    }

    let mut out = BufWriter::new(create_file(output)?);
    serde_json::to_writer_pretty(&mut out, &merged)?;
    out.write_all(b"\n")?;
    out.flush()?;

    info!("Merged {} JSON file(s) into {}", merged.len(), output.display());
    Ok(merged.len())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_jsonl_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"n\":2}\n\n{\"n\":3}\n").unwrap();
        fs::write(dir.path().join("a.jsonl"), "{\"n\":1}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "{\"n\":99}\n").unwrap();

        let output = dir.path().join("out").join("final.jsonl");
        let written = merge_jsonl_dir(dir.path(), &output).unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n"
        );
    }

    #[test]
    fn test_merge_jsonl_dir_ignores_its_own_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jsonl"), "{\"n\":1}\n").unwrap();
        let output = dir.path().join("z.jsonl");
        fs::write(&output, "stale\n").unwrap();

        let written = merge_jsonl_dir(dir.path(), &output).unwrap();
        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "{\"n\":1}\n");
    }

    #[test]
    fn test_merge_json_subdirs_one_level_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub1")).unwrap();
        fs::create_dir_all(root.join("sub2")).unwrap();
        fs::create_dir_all(root.join("deep/nest")).unwrap();
        fs::write(root.join("sub1/data.json"), r#"{"id": 1}"#).unwrap();
        fs::write(root.join("sub2/info.json"), "[2, 3]").unwrap();
        fs::write(root.join("deep/nest/ignore_me.json"), "4").unwrap();
        fs::write(root.join("top.json"), "5").unwrap();

        let output = root.join("merged.json");
        let count = merge_json_subdirs(root, &output).unwrap();

        assert_eq!(count, 2);
        let merged: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(merged, json!([{"id": 1}, [2, 3]]));
    }

    #[test]
    fn test_merge_json_subdirs_keeps_document_key_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/solvable.json"), r#"{"zeta": 1, "alpha": 2}"#).unwrap();

        let output = dir.path().join("merged.json");
        merge_json_subdirs(dir.path(), &output).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        let zeta = text.find("\"zeta\"").unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        assert!(zeta < alpha, "keys reordered: {}", text);
    }

    #[test]
    fn test_read_records_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"ok\":true}\nnot json\n").unwrap();

        let err = read_records::<Value>(&path).unwrap_err().to_string();
        assert!(err.contains("bad.jsonl:2"));
    }

    #[test]
    fn test_read_values_lenient_counts_skips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.jsonl");
        fs::write(&path, "{\"a\":1}\ngarbage\n\n{\"a\":2}\n").unwrap();

        let (values, skipped) = read_values_lenient(&path).unwrap();
        assert_eq!(values, vec![json!({"a": 1}), json!({"a": 2})]);
        assert_eq!(skipped, 1);
    }
}
