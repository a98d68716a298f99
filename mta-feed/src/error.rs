//! Module for the error management
use thiserror::Error;

/// An error that can occur when reading the agency feeds.
#[derive(Error, Debug)]
pub enum Error {
    /// A required input file is not present
    #[error("could not find file {0}")]
    MissingFile(String),
    /// Generic Input/Output error while reading a file
    #[error("impossible to read file")]
    Io(#[from] std::io::Error),
    /// Impossible to read the complexes CSV registry
    #[error("impossible to read csv registry")]
    Csv(#[from] csv::Error),
    /// The feed body is not the JSON shape we expect
    #[error("invalid json in feed")]
    Json(#[from] serde_json::Error),
}
