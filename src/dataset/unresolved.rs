// file: src/dataset/unresolved.rs
// version: 1.0.0
// guid: 9d2e57fc-f053-49ac-8c6e-e6b16bb054b2

//! Collect unresolved instances from evaluation reports and filter a
//! delivery JSONL down to them.

use super::jsonl;
use crate::{error::BatchError, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Report file names; the second is a typo that shows up in real log dumps
pub const REPORT_FILE_NAMES: [&str; 2] = ["report.json", "repot.json"];

pub const UNRESOLVED_TXT: &str = "unresolved_instance_ids.txt";
pub const UNRESOLVED_JSON: &str = "unresolved_instance_ids.json";
pub const SUMMARY_JSON: &str = "per_report_unresolved_summary.json";

/// Unresolved ids across every report under a root
#[derive(Debug, Default)]
pub struct UnresolvedScan {
    pub unresolved: BTreeSet<String>,
    /// report path -> unresolved ids in that report
    pub per_report: BTreeMap<String, Vec<String>>,
    pub skipped_reports: usize,
}

/// Ids whose `resolved` flag is missing or exactly `false`
pub fn unresolved_in_report(report: &Value) -> Vec<String> {
    let Some(map) = report.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(instance_id, details)| {
            let details = details.as_object()?;
            match details.get("resolved") {
                None | Some(Value::Bool(false)) => Some(instance_id.clone()),
                _ => None,
            }
        })
        .collect()
}

/// Every report file below `root`, sorted
pub fn find_reports(root: &Path) -> Vec<PathBuf> {
    let mut reports: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| REPORT_FILE_NAMES.contains(&name))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();
    reports.sort();
    reports
}

/// Scan `root` for reports and gather unresolved ids
pub fn collect_unresolved(root: &Path) -> Result<UnresolvedScan> {
    if !root.is_dir() {
        return Err(BatchError::file_not_found(format!(
            "reports root {}",
            root.display()
        )));
    }

    let mut scan = UnresolvedScan::default();
    for report_path in find_reports(root) {
        let parsed = fs::read_to_string(&report_path)
            .map_err(BatchError::from)
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(BatchError::from));

        match parsed {
            Ok(report) => {
                let ids = unresolved_in_report(&report);
                scan.unresolved.extend(ids.iter().cloned());
                scan.per_report
                    .insert(report_path.display().to_string(), ids);
            }
            Err(e) => {
                warn!("Skipping {}: {}", report_path.display(), e);
                scan.skipped_reports += 1;
            }
        }
    }

    info!(
        "Found {} unresolved instance id(s) in {} report(s)",
        scan.unresolved.len(),
        scan.per_report.len()
    );
    Ok(scan)
}

/// Keep only records whose `instance_id` is in `keep`. Returns the number
/// of records written.
pub fn filter_by_instance_ids(src: &Path, keep: &BTreeSet<String>, dst: &Path) -> Result<usize> {
    let (values, skipped) = jsonl::read_values_lenient(src)?;
    if skipped > 0 {
        warn!("Skipped {} non-JSON line(s) in {}", skipped, src.display());
    }

    let kept: Vec<Value> = values
        .into_iter()
        .filter(|record| {
            record
                .get("instance_id")
                .and_then(Value::as_str)
                .map(|id| keep.contains(id))
                .unwrap_or(false)
        })
        .collect();

    jsonl::write_values(dst, &kept)?;
    Ok(kept.len())
}

/// Write the id list, the id array and the per-report summary into `out_dir`
pub fn write_scan_outputs(scan: &UnresolvedScan, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let ids: Vec<&str> = scan.unresolved.iter().map(String::as_str).collect();
    fs::write(out_dir.join(UNRESOLVED_TXT), ids.join("\n"))?;
    fs::write(out_dir.join(UNRESOLVED_JSON), serde_json::to_string_pretty(&ids)?)?;
    fs::write(
        out_dir.join(SUMMARY_JSON),
        serde_json::to_string_pretty(&scan.per_report)?,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unresolved_in_report() {
        let report = json!({
            "apache__camel-1": {"resolved": true},
            "apache__camel-2": {"resolved": false},
            "apache__camel-3": {"tests_status": {}},
            "apache__camel-4": {"resolved": null},
            "apache__camel-5": "not an object"
        });

        let mut ids = unresolved_in_report(&report);
        ids.sort();
        assert_eq!(ids, vec!["apache__camel-2", "apache__camel-3"]);
    }

    #[test]
    fn test_non_object_report() {
        assert!(unresolved_in_report(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_collect_unresolved_walks_nested_reports() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("run-a/logs")).unwrap();
        fs::create_dir_all(root.join("run-b")).unwrap();
        fs::create_dir_all(root.join("run-c")).unwrap();
        fs::write(
            root.join("run-a/logs/report.json"),
            r#"{"x-1": {"resolved": false}, "x-2": {"resolved": true}}"#,
        )
        .unwrap();
        fs::write(root.join("run-b/repot.json"), r#"{"y-1": {}}"#).unwrap();
        fs::write(root.join("run-c/report.json"), "{broken").unwrap();
        fs::write(root.join("run-c/other.json"), r#"{"z-1": {}}"#).unwrap();

        let scan = collect_unresolved(root).unwrap();

        assert_eq!(
            scan.unresolved.iter().cloned().collect::<Vec<_>>(),
            vec!["x-1", "y-1"]
        );
        assert_eq!(scan.per_report.len(), 2);
        assert_eq!(scan.skipped_reports, 1);
    }

    #[test]
    fn test_missing_root() {
        let err = collect_unresolved(Path::new("/no/such/reports")).unwrap_err();
        assert!(matches!(err, BatchError::FileNotFound(_)));
    }

    #[test]
    fn test_filter_and_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("batch_5-final.jsonl");
        fs::write(
            &src,
            "{\"instance_id\":\"x-1\",\"n\":1}\n{\"instance_id\":\"x-2\"}\nnope\n{\"other\":1}\n",
        )
        .unwrap();

        let mut scan = UnresolvedScan::default();
        scan.unresolved.insert("x-1".to_string());
        scan.unresolved.insert("a-0".to_string());
        scan.per_report.insert("r/report.json".to_string(), vec!["x-1".to_string()]);

        let out_dir = dir.path().join("out");
        write_scan_outputs(&scan, &out_dir).unwrap();
        let kept = filter_by_instance_ids(&src, &scan.unresolved, &out_dir.join("filtered.jsonl")).unwrap();

        assert_eq!(kept, 1);
        assert_eq!(
            fs::read_to_string(out_dir.join("filtered.jsonl")).unwrap(),
            "{\"instance_id\":\"x-1\",\"n\":1}\n"
        );
        assert_eq!(fs::read_to_string(out_dir.join(UNRESOLVED_TXT)).unwrap(), "a-0\nx-1");
        let ids: Vec<String> =
            serde_json::from_str(&fs::read_to_string(out_dir.join(UNRESOLVED_JSON)).unwrap()).unwrap();
        assert_eq!(ids, vec!["a-0", "x-1"]);
        assert!(out_dir.join(SUMMARY_JSON).exists());
    }

    #[test]
    fn test_filter_keeps_record_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("batch_6-final.jsonl");
        fs::write(&src, "{\"repo\":\"a/b\",\"instance_id\":\"x-1\",\"base_commit\":\"c0\"}\n").unwrap();

        let keep = BTreeSet::from(["x-1".to_string()]);
        let dst = dir.path().join("filtered.jsonl");
        filter_by_instance_ids(&src, &keep, &dst).unwrap();

        assert_eq!(
            fs::read_to_string(&dst).unwrap(),
            "{\"repo\":\"a/b\",\"instance_id\":\"x-1\",\"base_commit\":\"c0\"}\n"
        );
    }
}
