// file: src/launch/invocation.rs
// version: 1.0.0
// guid: fc76fc34-948e-4ade-813c-7781d11bec13

//! Argument vector for `sweagent run-batch`

use super::BatchLayout;
use crate::config::LaunchConfig;
use crate::executor::CommandSpec;

pub const RUN_BATCH_SUBCOMMAND: &str = "run-batch";

/// One fully resolved `run-batch` call
#[derive(Debug, Clone, PartialEq)]
pub struct RunBatchInvocation {
    pub program: String,
    pub layout: BatchLayout,
    pub num_workers: u32,
    pub docker_args: String,
    pub random_delay_multiplier: f64,
}

impl RunBatchInvocation {
    pub fn from_config(config: &LaunchConfig) -> Self {
        Self {
            program: config.sweagent_bin.clone(),
            layout: BatchLayout::from_config(config),
            num_workers: config.num_workers,
            docker_args: config.docker_args.clone(),
            random_delay_multiplier: config.random_delay_multiplier,
        }
    }

    /// Flags in the order the external tool receives them
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            RUN_BATCH_SUBCOMMAND.to_string(),
            "--num_workers".to_string(),
            self.num_workers.to_string(),
        ];

        // The value starts with `--`, so it has to travel glued to its flag
        if !self.docker_args.is_empty() {
            args.push(format!(
                "--instances.deployment.docker_args={}",
                self.docker_args
            ));
        }

        args.extend([
            "--config".to_string(),
            self.layout.config_file.display().to_string(),
            "--instances.path".to_string(),
            self.layout.instances_file.display().to_string(),
            "--output_dir".to_string(),
            self.layout.output_dir.display().to_string(),
            "--random_delay_multiplier".to_string(),
            format_multiplier(self.random_delay_multiplier),
        ]);

        args
    }

    pub fn to_command(&self) -> CommandSpec {
        CommandSpec::new(&self.program).args(self.args())
    }
}

/// Whole multipliers print without a fractional part (`1`, not `1.0`)
fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
