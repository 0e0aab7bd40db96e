// file: src/cli/commands.rs
// version: 1.0.0
// guid: 5e0d7b52-1a0f-4c1e-9d5b-3f6a2c8e7b41

//! Command implementations for the CLI

use super::args::LaunchArgs;
use crate::{
    compare::{self, JsonDiffer},
    config::{ConfigLoader, LaunchConfig},
    dataset::{distribution, jsonl, selection, unresolved},
    error::BatchError,
    executor::SystemRunner,
    launch::{BatchLauncher, BatchLayout, LaunchOptions, RunBatchInvocation},
    logging::logger::in_operation_span,
    manifest::{self, ManifestBuilder},
    utils::SystemUtils,
    Result,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Settings file (if any) + environment/flags, expanded and validated
pub fn resolve_launch_config(args: &LaunchArgs) -> Result<LaunchConfig> {
    let base = match &args.settings {
        Some(path) => ConfigLoader::new().load_launch_config(path)?,
        None => LaunchConfig::default(),
    };

    let config = base.with_overrides(args.overrides()).expand_project_root()?;
    config.validate()?;
    Ok(config)
}

/// Launch `sweagent run-batch`; returns the child's exit code
pub async fn run_batch_command(args: &LaunchArgs, dry_run: bool, skip_checks: bool) -> Result<i32> {
    let config = resolve_launch_config(args)?;
    info!(
        "Running batch {} from {} ({} worker(s))",
        config.batch, config.project_root, config.num_workers
    );

    let invocation = RunBatchInvocation::from_config(&config);
    let launcher = BatchLauncher::new(SystemRunner::new());
    let options = LaunchOptions { dry_run, skip_checks };
    in_operation_span("run-batch", &config.batch, launcher.launch(&invocation, options)).await
}

/// Print the derived batch paths
pub async fn paths_command(args: &LaunchArgs, json_output: bool) -> Result<()> {
    let config = resolve_launch_config(args)?;
    let layout = BatchLayout::from_config(&config);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        println!("config:     {}", layout.config_file.display());
        println!("instances:  {}", layout.instances_file.display());
        println!("output_dir: {}", layout.output_dir.display());
    }
    Ok(())
}

/// Build task images and write the instances manifest
pub async fn build_manifest_command(
    args: &LaunchArgs,
    tasks_path: &Path,
    snippet_path: &Path,
    output: Option<PathBuf>,
    limit: Option<usize>,
    skip_build: bool,
) -> Result<()> {
    let config = resolve_launch_config(args)?;
    let layout = BatchLayout::from_config(&config);
    let output = output.unwrap_or_else(|| layout.instances_file.clone());

    let snippet = fs::read_to_string(snippet_path).map_err(|e| {
        BatchError::file_not_found(format!("snippet {}: {}", snippet_path.display(), e))
    })?;
    let tasks = manifest::read_tasks(tasks_path, limit)?;
    info!("Loaded {} task(s) from {}", tasks.len(), tasks_path.display());

    let runner = SystemRunner::new();
    let builder =
        ManifestBuilder::new(&runner, &layout.dockerfiles_dir, snippet).skip_build(skip_build);
    let entries = in_operation_span("build-manifest", &config.batch, builder.build(&tasks)).await?;

    manifest::write_manifest(&output, &entries)?;
    info!("Manifest with {} instance(s) written to {}", entries.len(), output.display());
    Ok(())
}

/// Merge every *.jsonl of a directory
pub async fn merge_jsonl_command(input_dir: &Path, output: &Path) -> Result<()> {
    let lines = jsonl::merge_jsonl_dir(input_dir, output)?;
    info!("Wrote {} line(s) to {}", lines, output.display());
    Ok(())
}

/// Merge JSON documents one level below a directory
pub async fn merge_json_command(parent_dir: &Path, output: &Path) -> Result<()> {
    jsonl::merge_json_subdirs(parent_dir, output)?;
    Ok(())
}

/// Collect unresolved instances and filter the delivery JSONL
pub async fn find_unresolved_command(reports_root: &Path, jsonl_path: &Path, out_dir: &Path) -> Result<()> {
    let scan = unresolved::collect_unresolved(reports_root)?;
    unresolved::write_scan_outputs(&scan, out_dir)?;

    let file_name = jsonl_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("delivery");
    let filtered = out_dir.join(format!("{}.filtered_unresolved.jsonl", file_name));
    let kept = unresolved::filter_by_instance_ids(jsonl_path, &scan.unresolved, &filtered)?;

    info!("Unresolved ids written to {}", out_dir.join(unresolved::UNRESOLVED_TXT).display());
    info!("Filtered JSONL written: {} (kept {} lines)", filtered.display(), kept);
    Ok(())
}

/// Export metadata of qualifying run results
pub async fn select_tasks_command(
    input_dir: &Path,
    prefix: &str,
    output: &Path,
    limit: Option<usize>,
) -> Result<()> {
    let inputs = selection::matching_inputs(input_dir, prefix)?;
    let tasks = selection::select_tasks(&inputs, limit)?;
    selection::write_metadata_csv(output, &tasks)?;
    info!(
        "Selected {} task(s) from {} file(s) into {}",
        tasks.len(),
        inputs.len(),
        output.display()
    );
    Ok(())
}

/// Count delivered tasks per repository
pub async fn distribution_command(
    root: &Path,
    seeds: &[String],
    csvs: &[PathBuf],
    top: Option<usize>,
    json_output: bool,
) -> Result<()> {
    let mut counts = HashMap::new();
    for seed in seeds {
        let (name, count) = distribution::parse_seed(seed)?;
        *counts.entry(name).or_default() += count;
    }

    distribution::count_delivered(root, &mut counts)?;
    distribution::count_from_csv(csvs, &mut counts);
    let ranked = distribution::ranked(&counts, top);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        warn!("No repositories found under {}", root.display());
        return Ok(());
    }

    println!("{:<32} {:>6}", "Repository", "Tasks");
    println!("{:-<39}", "");
    for entry in &ranked {
        println!("{:<32} {:>6}", entry.repo, entry.count);
    }
    Ok(())
}

/// Diff two JSON files; returns 1 when they differ
pub async fn compare_command(left: &Path, right: &Path) -> Result<i32> {
    let left_value = compare::load_json(left)?;
    let right_value = compare::load_json(right)?;

    let diffs = JsonDiffer::new()?.diff(&left_value, &right_value);
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string())
    };
    print!("{}", compare::render_report(&diffs, &name(left), &name(right)));

    Ok(if diffs.is_empty() { 0 } else { 1 })
}

/// Check that the external tools are on PATH; returns 1 when any is missing
pub async fn check_prerequisites_command(sweagent_bin: &str) -> Result<i32> {
    info!("Checking prerequisites for batch runs");

    let missing = SystemUtils::check_prerequisites(&[sweagent_bin, "docker"]);
    if missing.is_empty() {
        info!("✓ All required commands are available");
        return Ok(0);
    }

    error!("✗ Missing required commands: {}", missing.join(", "));
    for cmd in &missing {
        if cmd == "docker" {
            info!("  install Docker: https://docs.docker.com/engine/install/");
        } else {
            info!("  pip install sweagent (or set SWEAGENT_BIN)");
        }
    }
    Ok(1)
}
