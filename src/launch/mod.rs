// file: src/launch/mod.rs
// version: 1.0.0
// guid: 9c3879f3-1480-469b-9c9f-5b34fbb1e3f4

//! Batch launch: derive the batch paths and hand them to `sweagent run-batch`.
//!
//! The external tool owns everything after the spawn. The launcher only
//! checks its inputs, inherits the child's output streams and reports the
//! child's exit code back to the caller.

pub mod invocation;
pub mod layout;

pub use invocation::RunBatchInvocation;
pub use layout::BatchLayout;

use crate::{error::BatchError, executor::CommandRunner, utils::SystemUtils, Result};
use tracing::{debug, info, warn};

/// Knobs for a single launch
#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchOptions {
    /// Print the command instead of running it
    pub dry_run: bool,
    /// Skip the input-file and executable checks
    pub skip_checks: bool,
}

/// Launches batch runs through a command runner
pub struct BatchLauncher<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> BatchLauncher<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run the batch and return the external tool's exit code
    pub async fn launch(&self, invocation: &RunBatchInvocation, options: LaunchOptions) -> Result<i32> {
        let command = invocation.to_command();

        if options.dry_run {
            info!("DRY RUN: Would execute: {}", command);
            println!("{}", command);
            return Ok(0);
        }

        if options.skip_checks {
            warn!("Skipping pre-launch checks");
        } else {
            preflight(invocation)?;
        }

        info!(
            "Launching batch run: instances={}, output={}",
            invocation.layout.instances_file.display(),
            invocation.layout.output_dir.display()
        );
        debug!("Command: {}", command);

        let code = self.runner.run(&command).await?;
        if code == 0 {
            info!("Batch run finished successfully");
        } else {
            warn!("Batch run exited with code {}", code);
        }
        Ok(code)
    }
}

/// Make sure the inputs and the executable exist before spawning
pub fn preflight(invocation: &RunBatchInvocation) -> Result<()> {
    let layout = &invocation.layout;

    if !layout.config_file.is_file() {
        return Err(BatchError::file_not_found(format!(
            "agent config {}",
            layout.config_file.display()
        )));
    }

    if !layout.instances_file.is_file() {
        return Err(BatchError::file_not_found(format!(
            "instances file {}",
            layout.instances_file.display()
        )));
    }

    if !SystemUtils::command_exists(&invocation.program) {
        return Err(BatchError::file_not_found(format!(
            "executable {} (not on PATH)",
            invocation.program
        )));
    }

    if layout.output_dir.exists() {
        warn!(
            "Output directory {} already exists; the run will reuse it",
            layout.output_dir.display()
        );
    }

    Ok(())
}
