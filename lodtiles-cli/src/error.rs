//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use lodtiles::config::ConfigFileError;
use lodtiles::grid::GridError;
use lodtiles::merge::MergeError;
use lodtiles::pipeline::PipelineError;
use lodtiles::store::StoreError;
use lodtiles::tiler::TilerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to create the async runtime
    Runtime(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to connect to the database
    DatabaseConnect(StoreError),
    /// Tiler backend could not be constructed
    TilerSetup(TilerError),
    /// Grid partitioning failed
    Grid(GridError),
    /// Merging tilesets failed
    Merge(MergeError),
    /// Pipeline run aborted
    Pipeline(PipelineError),
    /// Failed to read an input directory
    InputDir { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::DatabaseConnect(_) => {
                eprintln!();
                eprintln!("Make sure:");
                eprintln!("  1. PostgreSQL is running and reachable");
                eprintln!("  2. The database URL in the config is correct");
                eprintln!("  3. The PostGIS extension is installed");
            }
            CliError::TilerSetup(_) | CliError::Pipeline(PipelineError::Store(_)) => {
                eprintln!();
                eprintln!("Check the [tiler] and [database] sections of the config file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Runtime(msg) => write!(f, "Failed to create async runtime: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::DatabaseConnect(e) => write!(f, "Failed to connect to database: {}", e),
            CliError::TilerSetup(e) => write!(f, "Failed to set up tiler: {}", e),
            CliError::Grid(e) => write!(f, "Grid partitioning failed: {}", e),
            CliError::Merge(e) => write!(f, "Merging tilesets failed: {}", e),
            CliError::Pipeline(e) => write!(f, "Pipeline run aborted: {}", e),
            CliError::InputDir { path, error } => {
                write!(f, "Failed to read directory '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::DatabaseConnect(e) => Some(e),
            CliError::TilerSetup(e) => Some(e),
            CliError::Grid(e) => Some(e),
            CliError::Merge(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::InputDir { error, .. } => Some(error),
            CliError::LoggingInit(_) | CliError::Runtime(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        CliError::Grid(e)
    }
}

impl From<MergeError> for CliError {
    fn from(e: MergeError) -> Self {
        CliError::Merge(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
