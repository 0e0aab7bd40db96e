// file: src/logging/mod.rs
// version: 1.0.0
// guid: 54f7a2b7-6186-4cda-b72a-8868ea799809

//! Logging system for the SWE batch agent

pub mod logger;

pub use logger::init_logger;
