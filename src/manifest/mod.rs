// file: src/manifest/mod.rs
// version: 1.0.0
// guid: cc171899-3c8f-4fa1-b1f8-6ba21375645f

//! Instance manifest for `sweagent run-batch`.
//!
//! Each delivery task carries its own Dockerfile. The builder appends a
//! shared snippet (agent tooling), builds one image per task and writes the
//! `<batch>.yaml` instances file pointing sweagent at those images.

use crate::{
    dataset::jsonl,
    error::BatchError,
    executor::{run_checked, CommandRunner, CommandSpec},
    Result,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One task line from a delivery JSONL
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryTask {
    pub instance_id: String,
    pub repo: String,
    pub base_commit: String,
    pub problem_statement: String,
    /// Full Dockerfile text, not a path
    pub dockerfile: String,
}

/// One entry of the instances file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceEntry {
    pub image_name: String,
    pub instance_id: String,
    pub problem_statement: String,
}

/// Docker tag for an instance: `<instance_id>:latest`, lowercased
pub fn image_tag(instance_id: &str) -> String {
    format!("{}:latest", instance_id).to_lowercase()
}

/// Task Dockerfile followed by the shared snippet
pub fn patch_dockerfile(dockerfile: &str, snippet: &str) -> String {
    format!("{}\n\n{}", dockerfile, snippet)
}

/// Read up to `limit` tasks from a delivery JSONL
pub fn read_tasks(path: &Path, limit: Option<usize>) -> Result<Vec<DeliveryTask>> {
    let mut tasks: Vec<DeliveryTask> = jsonl::read_records(path)?;
    if let Some(limit) = limit {
        tasks.truncate(limit);
    }
    Ok(tasks)
}

/// Write the instances file
pub fn write_manifest(path: &Path, entries: &[InstanceEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_yaml::to_string(entries)?)?;
    Ok(())
}

/// Builds task images and collects manifest entries
pub struct ManifestBuilder<'a> {
    runner: &'a dyn CommandRunner,
    build_root: PathBuf,
    snippet: String,
    skip_build: bool,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(runner: &'a dyn CommandRunner, build_root: impl Into<PathBuf>, snippet: impl Into<String>) -> Self {
        Self {
            runner,
            build_root: build_root.into(),
            snippet: snippet.into(),
            skip_build: false,
        }
    }

    /// Only write the manifest; assume the images already exist
    pub fn skip_build(mut self, skip: bool) -> Self {
        self.skip_build = skip;
        self
    }

    /// Build every task image in order; the first failed build aborts
    pub async fn build(&self, tasks: &[DeliveryTask]) -> Result<Vec<InstanceEntry>> {
        if !self.skip_build {
            fs::create_dir_all(&self.build_root)?;
        }

        let pb = ProgressBar::new(tasks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| BatchError::config(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );

        let mut entries = Vec::with_capacity(tasks.len());
        for task in tasks {
            let tag = image_tag(&task.instance_id);
            pb.set_message(tag.clone());

            if self.skip_build {
                debug!("Skipping build of {}", tag);
            } else {
                info!("Building {}", tag);
                self.build_image(task, &tag).await?;
            }

            entries.push(InstanceEntry {
                image_name: tag,
                instance_id: task.instance_id.clone(),
                problem_statement: task.problem_statement.clone(),
            });
            pb.inc(1);
        }

        pb.finish_with_message("images ready");
        Ok(entries)
    }

    async fn build_image(&self, task: &DeliveryTask, tag: &str) -> Result<()> {
        // Fresh context per task; removed when `workdir` drops
        let workdir = tempfile::Builder::new()
            .prefix("build-")
            .tempdir_in(&self.build_root)?;
        fs::write(
            workdir.path().join("Dockerfile"),
            patch_dockerfile(&task.dockerfile, &self.snippet),
        )?;

        let command = CommandSpec::new("docker")
            .args(["build", "--build-arg"])
            .arg(format!("REPO={}", task.repo))
            .arg("--build-arg")
            .arg(format!("COMMIT={}", task.base_commit))
            .args(["-t", tag, "."])
            .current_dir(workdir.path());

        run_checked(self.runner, &command).await
    }
}
