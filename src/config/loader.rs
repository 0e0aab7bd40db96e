// file: src/config/loader.rs
// version: 1.0.0
// guid: a4bd2a2b-96c7-41c3-8179-f64e9cc571de

//! Settings file loading and environment variable substitution

use super::LaunchConfig;
use crate::{error::BatchError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load launch settings from a YAML file
    pub fn load_launch_config<P: AsRef<Path>>(&self, path: P) -> Result<LaunchConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BatchError::config(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Loaded settings file {}", path.display());
        self.parse_launch_config(&content)
    }

    /// Parse launch settings from YAML text. Values are checked later,
    /// once CLI and environment overrides have been merged in.
    pub fn parse_launch_config(&self, content: &str) -> Result<LaunchConfig> {
        let expanded = self.expand_env_vars(content)?;
        Ok(serde_yaml::from_str(&expanded)?)
    }

    /// Expand `${VAR}` references in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| BatchError::config(format!("Invalid regex pattern: {}", e)))?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else if !missing_vars.iter().any(|v| v == var_name) {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(BatchError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env_vars.insert(key.into(), value.into());
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_var_expansion() {
        let mut loader = ConfigLoader::new();
        loader.set_env_var("SWE_TEST_ROOT", "/data/swe");

        let result = loader.expand_env_vars("project_root: ${SWE_TEST_ROOT}").unwrap();
        assert_eq!(result, "project_root: /data/swe");
    }

    #[test]
    fn test_missing_env_var_lists_each_name_once() {
        let loader = ConfigLoader::new();
        let content = "a: ${SWE_MISSING_ONE}\nb: ${SWE_MISSING_ONE}\nc: ${SWE_MISSING_TWO}";

        let err = loader.expand_env_vars(content).unwrap_err().to_string();
        assert!(err.contains("Missing environment variables"));
        assert!(err.contains("SWE_MISSING_ONE, SWE_MISSING_TWO"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let loader = ConfigLoader::new();
        let config = loader.parse_launch_config("batch: batch_3\nnum_workers: 2\n").unwrap();

        assert_eq!(config.batch, "batch_3");
        assert_eq!(config.num_workers, 2);
        assert_eq!(config.project_root, "files/swe-agent");
        assert_eq!(config.random_delay_multiplier, 1.0);
    }

    #[test]
    fn test_load_launch_config_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            r#"
project_root: ${{SWE_TEST_PROJECT}}
batch: batch_2
sweagent_bin: /opt/sweagent/bin/sweagent
num_workers: 3
docker_args: "--memory=16g"
random_delay_multiplier: 0.5
"#
        )?;

        let mut loader = ConfigLoader::new();
        loader.set_env_var("SWE_TEST_PROJECT", "work/swe");
        let config = loader.load_launch_config(file.path())?;

        assert_eq!(config.project_root, "work/swe");
        assert_eq!(config.batch, "batch_2");
        assert_eq!(config.sweagent_bin, "/opt/sweagent/bin/sweagent");
        assert_eq!(config.num_workers, 3);
        assert_eq!(config.docker_args, "--memory=16g");
        assert_eq!(config.random_delay_multiplier, 0.5);
        Ok(())
    }

    #[test]
    fn test_malformed_settings_are_rejected() {
        let loader = ConfigLoader::new();
        assert!(loader.parse_launch_config("batch: [not, a, string]\n").is_err());
        assert!(loader.parse_launch_config("num_workers: -1\n").is_err());
    }

    #[test]
    fn test_out_of_range_values_parse_until_merged() {
        let loader = ConfigLoader::new();
        let config = loader.parse_launch_config("num_workers: 0\n").unwrap();
        assert_eq!(config.num_workers, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let loader = ConfigLoader::new();
        let err = loader
            .load_launch_config("/definitely/not/here.yaml")
            .unwrap_err();
        assert!(matches!(err, BatchError::ConfigError(_)));
    }
}
