//! This module defines all the errors that can occur while executing kiabora.

use thiserror::Error;

/// Error that occur during execution of Kiabora's CLI app
#[derive(Error, Debug)]
pub enum CliError {
    /// Error if the input file could not be read
    #[error("could not open file {filename}: {error}")]
    InputFile {
        /// Name of the file that could not be read
        filename: String,
        /// The underlying error
        error: std::io::Error,
    },
    /// Error while writing the JSON report
    #[error("unable to serialize the analysis: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Error resulting from io operations
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Error originating from kiabora
    #[error(transparent)]
    KiaboraError(#[from] kiabora::error::Error),
}
