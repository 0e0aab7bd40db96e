// file: src/lib.rs
// version: 1.0.0
// guid: 7c1e9a43-2f5d-4b86-a0e3-9d4b6f2c8a17

//! # SWE Batch Agent
//!
//! Launches `sweagent run-batch` for a batch laid out under a project root
//! (`config.yaml`, `<batch>.yaml`, `output/<batch>`), and carries the small
//! dataset tools used to prepare and audit those batches: building the
//! instance manifest, merging run outputs, selecting usable tasks, filtering
//! unresolved instances and diffing JSON deliveries.

pub mod cli;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod executor;
pub mod launch;
pub mod logging;
pub mod manifest;
pub mod utils;

pub use error::{BatchError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
