// file: src/utils/mod.rs
// version: 1.0.0
// guid: 6cc4c37f-a321-4416-9402-49309cda8e16

//! Utility modules

pub mod system;

pub use system::SystemUtils;
