// file: src/dataset/selection.rs
// version: 1.0.0
// guid: 9fb0a932-79f0-43e9-a3dc-af25c0c4a124

//! Pick run results that are usable as tasks and export their metadata

use super::{csv, jsonl};
use crate::{error::BatchError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Metadata cell exported for each selected task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskMetadata {
    #[serde(rename = "Repository")]
    pub repository: Option<String>,
    #[serde(rename = "PR Number")]
    pub pr_number: Option<Value>,
    #[serde(rename = "PR Link")]
    pub pr_link: Option<String>,
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// A run result qualifies when it has no errors and at least one
/// fail-to-pass test
pub fn qualifies(record: &Value) -> bool {
    let no_errors = record.get("errors").map(is_empty).unwrap_or(true);
    let has_fail2pass = record
        .get("fail2pass")
        .and_then(Value::as_array)
        .map(|tests| !tests.is_empty())
        .unwrap_or(false);
    no_errors && has_fail2pass
}

fn first_present<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

/// Build metadata, accepting both raw run keys and exported column names
pub fn build_metadata(record: &Value) -> TaskMetadata {
    let repository = first_present(record, &["repo", "Repository"])
        .and_then(Value::as_str)
        .map(str::to_string);
    let pr_number = first_present(record, &["pr_number", "PR Number"]).cloned();
    let pr_link = first_present(record, &["pr_link", "PR Link"])
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| match (&repository, &pr_number) {
            (Some(repo), Some(pr)) => {
                let pr = match pr {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some(format!("https://github.com/{}/pull/{}", repo, pr))
            }
            _ => None,
        });

    TaskMetadata {
        repository,
        pr_number,
        pr_link,
    }
}

/// Files in `dir` named `<prefix>*.jsonl`, sorted
pub fn matching_inputs(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let inputs: Vec<PathBuf> = jsonl::files_with_extension(dir, "jsonl")?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(prefix))
                .unwrap_or(false)
        })
        .collect();

    if inputs.is_empty() {
        return Err(BatchError::file_not_found(format!(
            "no files matching {}*.jsonl in {}",
            prefix,
            dir.display()
        )));
    }
    Ok(inputs)
}

/// Select qualifying records from `inputs`, stopping after `limit`
pub fn select_tasks(inputs: &[PathBuf], limit: Option<usize>) -> Result<Vec<TaskMetadata>> {
    let mut selected = Vec::new();
    for input in inputs {
        let records: Vec<Value> = jsonl::read_records(input)?;
        let before = selected.len();
        for record in records.iter().filter(|r| qualifies(r)) {
            if limit.map(|max| selected.len() >= max).unwrap_or(false) {
                info!("Reached the limit of {} tasks", selected.len());
                return Ok(selected);
            }
            selected.push(build_metadata(record));
        }
        debug!("{}: {} qualifying", input.display(), selected.len() - before);
    }
    Ok(selected)
}

/// Write a one-column CSV with a JSON `metadata` cell per task
pub fn write_metadata_csv(path: &Path, tasks: &[TaskMetadata]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut out = BufWriter::new(fs::File::create(path)?);
    out.write_all(b"metadata\r\n")?;
    for task in tasks {
        let cell = serde_json::to_string(task)?;
        out.write_all(csv::quote(&cell).as_bytes())?;
        out.write_all(b"\r\n")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_qualifies() {
        assert!(qualifies(&json!({"fail2pass": ["A#b"]})));
        assert!(qualifies(&json!({"fail2pass": ["A#b"], "errors": {}})));
        assert!(qualifies(&json!({"fail2pass": ["A#b"], "errors": null})));
        assert!(!qualifies(&json!({"fail2pass": ["A#b"], "errors": {"head_tests": "boom"}})));
        assert!(!qualifies(&json!({"fail2pass": []})));
        assert!(!qualifies(&json!({"fail2pass": "A#b"})));
        assert!(!qualifies(&json!({})));
    }

    #[test]
    fn test_build_metadata_derives_link() {
        let meta = build_metadata(&json!({"repo": "apache/camel", "pr_number": 17682}));
        assert_eq!(meta.repository.as_deref(), Some("apache/camel"));
        assert_eq!(meta.pr_number, Some(json!(17682)));
        assert_eq!(
            meta.pr_link.as_deref(),
            Some("https://github.com/apache/camel/pull/17682")
        );
    }

    #[test]
    fn test_build_metadata_prefers_explicit_columns() {
        let meta = build_metadata(&json!({
            "Repository": "apache/jena",
            "PR Number": "12",
            "PR Link": "https://example.test/pr/12"
        }));
        assert_eq!(meta.repository.as_deref(), Some("apache/jena"));
        assert_eq!(meta.pr_link.as_deref(), Some("https://example.test/pr/12"));
    }

    #[test]
    fn test_select_and_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("final.part01.jsonl"),
            concat!(
                "{\"repo\":\"a/b\",\"pr_number\":1,\"fail2pass\":[\"T#x\"]}\n",
                "{\"repo\":\"a/b\",\"pr_number\":2,\"fail2pass\":[],\"errors\":{}}\n",
                "{\"repo\":\"a/b\",\"pr_number\":3,\"fail2pass\":[\"T#y\"]}\n",
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("final.part02.jsonl"),
            "{\"repo\":\"c/d\",\"pr_number\":4,\"fail2pass\":[\"T#z\"]}\n",
        )
        .unwrap();
        fs::write(dir.path().join("inputs.jsonl"), "{\"fail2pass\":[\"T#q\"]}\n").unwrap();

        let inputs = matching_inputs(dir.path(), "final").unwrap();
        assert_eq!(inputs.len(), 2);

        let all = select_tasks(&inputs, None).unwrap();
        assert_eq!(all.len(), 3);

        let capped = select_tasks(&inputs, Some(2)).unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[1].pr_number, Some(json!(3)));

        let csv = dir.path().join("tasks/batch7.csv");
        write_metadata_csv(&csv, &capped).unwrap();
        let text = fs::read_to_string(&csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "metadata");
        assert_eq!(
            lines[1],
            r#""{""Repository"":""a/b"",""PR Number"":1,""PR Link"":""https://github.com/a/b/pull/1""}""#
        );
    }

    #[test]
    fn test_no_matching_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let err = matching_inputs(dir.path(), "final").unwrap_err();
        assert!(err.to_string().contains("final*.jsonl"));
    }
}
