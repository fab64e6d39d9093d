//! CLI command implementations.

pub mod config;
pub mod grid;
pub mod merge;
pub mod run;
