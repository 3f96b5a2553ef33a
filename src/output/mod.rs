//! Output module for persisting harvested datasets
//!
//! One CSV file per completed run, timestamped so runs never collide,
//! with a UTF-8 byte-order mark for spreadsheet compatibility.

mod csv_writer;

pub use csv_writer::{build_filename, write_dataset};

use thiserror::Error;

/// Errors that can occur while writing a dataset
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
