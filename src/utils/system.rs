// file: src/utils/system.rs
// version: 1.0.0
// guid: 64ca0cee-bcbe-45dd-b332-0e4e40b39a45

//! System utility functions

use std::path::PathBuf;
use tracing::debug;

/// System utility functions
pub struct SystemUtils;

impl SystemUtils {
    /// Resolve a command on PATH (or as a path)
    pub fn locate(command: &str) -> Option<PathBuf> {
        match which::which(command) {
            Ok(path) => {
                debug!("{} resolved to {}", command, path.display());
                Some(path)
            }
            Err(e) => {
                debug!("{} not found: {}", command, e);
                None
            }
        }
    }

    /// Check if a command exists
    pub fn command_exists(command: &str) -> bool {
        Self::locate(command).is_some()
    }

    /// Return the commands from `required` that cannot be found
    pub fn check_prerequisites(required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|cmd| !Self::command_exists(cmd))
            .map(|cmd| cmd.to_string())
            .collect()
    }
}
