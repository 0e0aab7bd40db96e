// file: src/cli/args.rs
// version: 1.0.0
// guid: c3c42825-41a4-4683-bc72-444204f262d8

//! Command line argument definitions

use crate::config::LaunchOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "swe-batch-agent")]
#[command(about = "Launch SWE-agent batch runs and prepare their datasets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Where a batch lives and how the external tool is called
#[derive(Args, Debug, Clone, Default)]
pub struct LaunchArgs {
    #[arg(long, env = "PROJECT_ROOT", help = "Directory holding config.yaml, <batch>.yaml and output/")]
    pub project_root: Option<String>,

    #[arg(short, long, env = "BATCH", help = "Batch identifier, e.g. batch_1")]
    pub batch: Option<String>,

    #[arg(short, long, help = "YAML settings file; flags and environment win over it")]
    pub settings: Option<PathBuf>,

    #[arg(long, env = "SWEAGENT_BIN", help = "Executable providing `run-batch`")]
    pub sweagent_bin: Option<String>,

    #[arg(long)]
    pub num_workers: Option<u32>,

    #[arg(long, allow_hyphen_values = true, help = "Forwarded container argument, e.g. --memory=10g")]
    pub docker_args: Option<String>,

    #[arg(long)]
    pub random_delay_multiplier: Option<f64>,
}

impl LaunchArgs {
    pub fn overrides(&self) -> LaunchOverrides {
        LaunchOverrides {
            project_root: self.project_root.clone(),
            batch: self.batch.clone(),
            sweagent_bin: self.sweagent_bin.clone(),
            num_workers: self.num_workers,
            docker_args: self.docker_args.clone(),
            random_delay_multiplier: self.random_delay_multiplier,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run `sweagent run-batch` for one batch
    RunBatch {
        #[command(flatten)]
        launch: LaunchArgs,

        #[arg(long, help = "Print the command instead of running it")]
        dry_run: bool,

        #[arg(long, help = "Do not check input files and executable before launching")]
        skip_checks: bool,
    },

    /// Print the paths derived for a batch
    Paths {
        #[command(flatten)]
        launch: LaunchArgs,

        #[arg(short, long)]
        json: bool,
    },

    /// Build task images and write the batch instances file
    BuildManifest {
        #[command(flatten)]
        launch: LaunchArgs,

        #[arg(short, long, help = "Delivery JSONL with one task per line")]
        tasks: PathBuf,

        #[arg(short = 'd', long, help = "Dockerfile snippet appended to every task Dockerfile")]
        snippet: PathBuf,

        #[arg(short, long, help = "Manifest path (defaults to <project_root>/<batch>.yaml)")]
        output: Option<PathBuf>,

        #[arg(short, long, help = "Only take the first N tasks")]
        limit: Option<usize>,

        #[arg(long, help = "Write the manifest without building images")]
        skip_build: bool,
    },

    /// Concatenate every *.jsonl in a directory
    MergeJsonl {
        #[arg(short, long)]
        input_dir: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Collect JSON files one level below a directory into an array
    MergeJson {
        #[arg(short, long)]
        parent_dir: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Gather unresolved instances from report.json files and filter a JSONL
    FindUnresolved {
        #[arg(short, long, help = "Directory searched recursively for report.json")]
        reports_root: PathBuf,

        #[arg(short, long, help = "Delivery JSONL to filter")]
        jsonl: PathBuf,

        #[arg(short, long)]
        out_dir: PathBuf,
    },

    /// Export metadata of run results that are usable as tasks
    SelectTasks {
        #[arg(short, long)]
        input_dir: PathBuf,

        #[arg(long, default_value = "final", help = "File name prefix of run results")]
        prefix: String,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Count delivered tasks per repository
    Distribution {
        #[arg(short, long, default_value = "files/delivery")]
        root: PathBuf,

        #[arg(long = "seed", value_name = "NAME=COUNT", help = "Starting count for a repository")]
        seeds: Vec<String>,

        #[arg(long = "csv", value_name = "FILE", help = "Task sheet with a metadata column")]
        csvs: Vec<PathBuf>,

        #[arg(long)]
        top: Option<usize>,

        #[arg(short, long)]
        json: bool,
    },

    /// Structural diff of two JSON files (exit 1 when they differ)
    Compare {
        left: PathBuf,

        right: PathBuf,
    },

    /// Check that sweagent and docker are available
    CheckPrereqs {
        #[arg(long, env = "SWEAGENT_BIN", default_value = "sweagent")]
        sweagent_bin: String,
    },
}
