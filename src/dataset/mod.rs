// file: src/dataset/mod.rs
// version: 1.0.0
// guid: 6afb3c68-91c1-42d1-8a45-733490520dc7

//! Dataset utilities around batch runs: merging run outputs, selecting
//! usable tasks, filtering unresolved instances and counting repositories.

pub mod csv;
pub mod distribution;
pub mod jsonl;
pub mod selection;
pub mod unresolved;
