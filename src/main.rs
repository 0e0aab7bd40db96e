// file: src/main.rs
// version: 1.0.0
// guid: 3d8b2f6e-9a41-4c7d-b5e2-1f0a6c9d4e82

//! SWE Batch Agent - Main entry point

use clap::Parser;
use std::io::Write;
use swe_batch_agent::{
    cli::{args::Cli, args::Commands, commands::*},
    logging::logger,
    Result,
};
use tokio::signal;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("{}", e);
    }

    let code = match cli.command {
        // The runner waits out Ctrl+C and reports the child's own status
        command @ Commands::RunBatch { .. } => exit_code_of(run(command).await),
        command => {
            let shutdown_signal = async {
                if signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            };

            tokio::select! {
                result = run(command) => exit_code_of(result),
                _ = shutdown_signal => {
                    warn!("Interrupted by user");
                    130 // Standard exit code for Ctrl+C
                }
            }
        }
    };

    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

fn exit_code_of(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

/// Dispatch a subcommand and return the process exit code
async fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::RunBatch {
            launch,
            dry_run,
            skip_checks,
        } => run_batch_command(&launch, dry_run, skip_checks).await,
        Commands::Paths { launch, json } => paths_command(&launch, json).await.map(|_| 0),
        Commands::BuildManifest {
            launch,
            tasks,
            snippet,
            output,
            limit,
            skip_build,
        } => build_manifest_command(&launch, &tasks, &snippet, output, limit, skip_build)
            .await
            .map(|_| 0),
        Commands::MergeJsonl { input_dir, output } => {
            merge_jsonl_command(&input_dir, &output).await.map(|_| 0)
        }
        Commands::MergeJson { parent_dir, output } => {
            merge_json_command(&parent_dir, &output).await.map(|_| 0)
        }
        Commands::FindUnresolved {
            reports_root,
            jsonl,
            out_dir,
        } => find_unresolved_command(&reports_root, &jsonl, &out_dir)
            .await
            .map(|_| 0),
        Commands::SelectTasks {
            input_dir,
            prefix,
            output,
            limit,
        } => select_tasks_command(&input_dir, &prefix, &output, limit)
            .await
            .map(|_| 0),
        Commands::Distribution {
            root,
            seeds,
            csvs,
            top,
            json,
        } => distribution_command(&root, &seeds, &csvs, top, json)
            .await
            .map(|_| 0),
        Commands::Compare { left, right } => compare_command(&left, &right).await,
        Commands::CheckPrereqs { sweagent_bin } => check_prerequisites_command(&sweagent_bin).await,
    }
}
