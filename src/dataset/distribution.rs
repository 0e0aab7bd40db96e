// file: src/dataset/distribution.rs
// version: 1.0.0
// guid: 81049a8a-440b-4d4a-98dc-9f92f862edc8

//! Repository distribution across delivered batches

use super::{csv, jsonl};
use crate::{error::BatchError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoCount {
    pub repo: String,
    pub count: usize,
}

/// Short repository name: `apache/camel` -> `camel`
pub fn short_repo_name(repo: &str) -> &str {
    repo.rsplit('/').next().unwrap_or(repo)
}

/// Add one count per task line in `batch_*/<single>.jsonl` under `root`.
/// Batch folders without exactly one JSONL file are skipped.
pub fn count_delivered(root: &Path, counts: &mut HashMap<String, usize>) -> Result<()> {
    let mut batch_dirs = Vec::new();
    for entry in fs::read_dir(root)
        .map_err(|e| BatchError::file_not_found(format!("{}: {}", root.display(), e)))?
    {
        let path = entry?.path();
        let is_batch = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("batch_"))
            .unwrap_or(false);
        if is_batch && path.is_dir() {
            batch_dirs.push(path);
        }
    }
    batch_dirs.sort();

    for batch_dir in batch_dirs {
        let files = jsonl::files_with_extension(&batch_dir, "jsonl")?;
        if files.len() != 1 {
            warn!(
                "{} has {} .jsonl files; skipping",
                batch_dir.display(),
                files.len()
            );
            continue;
        }

        let reader = BufReader::new(File::open(&files[0])?);
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let repo = serde_json::from_str::<Value>(&line)
                .ok()
                .and_then(|v| v.get("repo").and_then(Value::as_str).map(str::to_string));
            match repo {
                Some(repo) => {
                    *counts.entry(short_repo_name(&repo).to_string()).or_default() += 1;
                }
                None => warn!("bad line in {}", files[0].display()),
            }
        }
    }
    Ok(())
}

/// Add one count per `metadata` row of the task sheets. Missing files,
/// sheets without a `metadata` column and bad rows are warned about and
/// skipped.
pub fn count_from_csv(sheets: &[PathBuf], counts: &mut HashMap<String, usize>) {
    for sheet in sheets {
        if !sheet.is_file() {
            warn!("{} not found; skipping", sheet.display());
            continue;
        }

        let table = match csv::read_table(sheet) {
            Ok(table) => table,
            Err(e) => {
                warn!("cannot read {}: {}; skipping", sheet.display(), e);
                continue;
            }
        };
        let Some(column) = table.column("metadata") else {
            warn!("{} lacks 'metadata' column; skipping", sheet.display());
            continue;
        };

        for row in &table.rows {
            let repo = row
                .get(column)
                .and_then(|cell| serde_json::from_str::<Value>(cell).ok())
                .and_then(|meta| meta.get("Repository").and_then(Value::as_str).map(str::to_string));
            match repo {
                Some(repo) => {
                    *counts.entry(short_repo_name(&repo).to_string()).or_default() += 1;
                }
                None => warn!("bad metadata row in {}", sheet.display()),
            }
        }
    }
}

/// Counts ordered by frequency (descending) then name, optionally truncated
pub fn ranked(counts: &HashMap<String, usize>, top: Option<usize>) -> Vec<RepoCount> {
    let mut ranked: Vec<RepoCount> = counts
        .iter()
        .map(|(repo, count)| RepoCount {
            repo: repo.clone(),
            count: *count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.repo.cmp(&b.repo)));
    if let Some(top) = top {
        ranked.truncate(top);
    }
    ranked
}

/// Parse `name=count` seed values
pub fn parse_seed(raw: &str) -> Result<(String, usize)> {
    let (name, count) = raw
        .split_once('=')
        .ok_or_else(|| BatchError::validation(format!("seed must be NAME=COUNT: {}", raw)))?;
    let count = count
        .trim()
        .parse::<usize>()
        .map_err(|e| BatchError::validation(format!("bad seed count in {}: {}", raw, e)))?;
    Ok((name.trim().to_string(), count))
}
