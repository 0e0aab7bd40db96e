// file: src/cli/mod.rs
// version: 1.0.0
// guid: 0b7f3c2e-6d84-4a5e-9c71-2e8d4f6a1b93

//! Command line interface for the SWE batch agent

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
