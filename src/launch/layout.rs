// file: src/launch/layout.rs
// version: 1.0.0
// guid: 6b7e1714-ee43-4056-9a56-42ebb76fb83b

//! Paths derived from the project root and batch name

use crate::config::LaunchConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File layout of one batch under the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchLayout {
    /// `<root>/config.yaml`
    pub config_file: PathBuf,
    /// `<root>/<batch>.yaml`
    pub instances_file: PathBuf,
    /// `<root>/output/<batch>`
    pub output_dir: PathBuf,
    /// `<root>/dockerfiles`, scratch space for image builds
    pub dockerfiles_dir: PathBuf,
}

impl BatchLayout {
    pub fn new(project_root: impl AsRef<Path>, batch: &str) -> Self {
        let root = project_root.as_ref();
        Self {
            config_file: root.join("config.yaml"),
            instances_file: root.join(format!("{}.yaml", batch)),
            output_dir: root.join("output").join(batch),
            dockerfiles_dir: root.join("dockerfiles"),
        }
    }

    pub fn from_config(config: &LaunchConfig) -> Self {
        Self::new(&config.project_root, &config.batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_layout() {
        let layout = BatchLayout::new("files/swe-agent", "batch_1");

        assert_eq!(layout.config_file, Path::new("files/swe-agent/config.yaml"));
        assert_eq!(layout.instances_file, Path::new("files/swe-agent/batch_1.yaml"));
        assert_eq!(layout.output_dir, Path::new("files/swe-agent/output/batch_1"));
        assert_eq!(layout.dockerfiles_dir, Path::new("files/swe-agent/dockerfiles"));
    }

    #[test]
    fn test_trailing_slash_on_root() {
        let layout = BatchLayout::new("files/swe-agent/", "batch_9");
        assert_eq!(layout.instances_file, Path::new("files/swe-agent/batch_9.yaml"));
        assert_eq!(layout.output_dir, Path::new("files/swe-agent/output/batch_9"));
    }

    #[test]
    fn test_from_config_uses_defaults() {
        let layout = BatchLayout::from_config(&LaunchConfig::default());
        assert_eq!(layout, BatchLayout::new("files/swe-agent", "batch_1"));
    }
}
