//! Census Climate Library
//!
//! A Rust library for building daily climate datasets over Canadian census
//! geography from Environment Canada station observations.
//!
//! This library provides tools for:
//! - Assigning weather stations to the census subdivision that contains them,
//!   with a nearest-subdivision fallback inside a fixed search radius
//! - Averaging daily climate variables by census subdivision
//! - Rolling subdivision averages up to census divisions, weighted by
//!   subdivision population estimates
//! - Reading station observations, population weights, and subdivision
//!   boundary shapefiles, and writing the derived tables as CSV
//! - Comprehensive error handling with per-row source context

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregator;
        pub mod assigner;
        pub mod tables;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{AssignmentTable, Observation, RegionAttributes, Station};
pub use config::Config;

/// Result type alias for census climate processing
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for census climate processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Shapefile reading error
    #[error("Shapefile error in '{file}': {message}")]
    Shapefile { file: String, message: String },

    /// A row failed schema validation (missing key, malformed value)
    #[error("Invalid row {row} in '{file}': {message}")]
    InvalidRow {
        file: String,
        row: usize,
        message: String,
    },

    /// Required column is absent from an input table
    #[error("Missing required column '{column}' in '{file}'")]
    MissingColumn { file: String, column: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a shapefile error
    pub fn shapefile(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shapefile {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an invalid row error with source context
    pub fn invalid_row(file: impl Into<String>, row: usize, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            file: file.into(),
            row,
            message: message.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(file: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            file: file.into(),
            column: column.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}
