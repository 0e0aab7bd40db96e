// file: src/config/mod.rs
// version: 1.0.0
// guid: f04ca5bd-f4a8-4883-b361-661d7abfff3e

//! Configuration module for the SWE batch agent
//!
//! Handles loading and validation of batch launch settings.

pub mod launch;
pub mod loader;

pub use launch::{LaunchConfig, LaunchOverrides};
pub use loader::ConfigLoader;
