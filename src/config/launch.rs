// file: src/config/launch.rs
// version: 1.0.0
// guid: 3f931355-d630-415b-afd2-34da4f251db3

//! Batch launch settings

use crate::{error::BatchError, Result};
use serde::{Deserialize, Serialize};

/// Default executable invoked for batch runs
pub const DEFAULT_SWEAGENT_BIN: &str = "sweagent";
/// Default project root holding config, instances and outputs
pub const DEFAULT_PROJECT_ROOT: &str = "files/swe-agent";
/// Default batch identifier
pub const DEFAULT_BATCH: &str = "batch_1";
/// Default container argument forwarded to every instance deployment
pub const DEFAULT_DOCKER_ARGS: &str = "--memory=10g";

/// Settings for one `run-batch` invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Directory holding `config.yaml`, `<batch>.yaml` and `output/`
    pub project_root: String,
    /// Batch identifier selecting the instances file
    pub batch: String,
    /// Executable providing the `run-batch` subcommand
    pub sweagent_bin: String,
    /// Worker count inside the external tool
    pub num_workers: u32,
    /// Forwarded as `--instances.deployment.docker_args`; empty omits the flag
    pub docker_args: String,
    pub random_delay_multiplier: f64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            project_root: DEFAULT_PROJECT_ROOT.to_string(),
            batch: DEFAULT_BATCH.to_string(),
            sweagent_bin: DEFAULT_SWEAGENT_BIN.to_string(),
            num_workers: 1,
            docker_args: DEFAULT_DOCKER_ARGS.to_string(),
            random_delay_multiplier: 1.0,
        }
    }
}

/// Values coming from the command line or environment; `None` keeps the
/// value from the settings file (or the default).
#[derive(Debug, Clone, Default)]
pub struct LaunchOverrides {
    pub project_root: Option<String>,
    pub batch: Option<String>,
    pub sweagent_bin: Option<String>,
    pub num_workers: Option<u32>,
    pub docker_args: Option<String>,
    pub random_delay_multiplier: Option<f64>,
}

impl LaunchConfig {
    /// Apply command line overrides on top of these settings
    pub fn with_overrides(mut self, overrides: LaunchOverrides) -> Self {
        if let Some(root) = overrides.project_root {
            self.project_root = root;
        }
        if let Some(batch) = overrides.batch {
            self.batch = batch;
        }
        if let Some(bin) = overrides.sweagent_bin {
            self.sweagent_bin = bin;
        }
        if let Some(workers) = overrides.num_workers {
            self.num_workers = workers;
        }
        if let Some(args) = overrides.docker_args {
            self.docker_args = args;
        }
        if let Some(multiplier) = overrides.random_delay_multiplier {
            self.random_delay_multiplier = multiplier;
        }
        self
    }

    /// Expand a leading `~` or `$VAR` in the project root
    pub fn expand_project_root(mut self) -> Result<Self> {
        let expanded = shellexpand::full(&self.project_root).map_err(|e| {
            BatchError::config(format!(
                "Failed to expand project root {}: {}",
                self.project_root, e
            ))
        })?;
        self.project_root = expanded.into_owned();
        Ok(self)
    }

    /// Validate the launch settings
    pub fn validate(&self) -> Result<()> {
        if self.project_root.trim().is_empty() {
            return Err(BatchError::validation("Project root cannot be empty"));
        }

        if self.batch.trim().is_empty() {
            return Err(BatchError::validation("Batch name cannot be empty"));
        }

        // The batch is spliced into file names, so it must stay a single segment
        if self.batch.contains('/') || self.batch.contains('\\') || self.batch.contains("..") {
            return Err(BatchError::validation(format!(
                "Batch name must be a single path segment: {}",
                self.batch
            )));
        }

        if self.sweagent_bin.trim().is_empty() {
            return Err(BatchError::validation("sweagent executable cannot be empty"));
        }

        if self.num_workers == 0 {
            return Err(BatchError::validation("num_workers must be at least 1"));
        }

        if !self.random_delay_multiplier.is_finite() || self.random_delay_multiplier < 0.0 {
            return Err(BatchError::validation(format!(
                "random_delay_multiplier must be a non-negative number, got {}",
                self.random_delay_multiplier
            )));
        }

        Ok(())
    }
}
