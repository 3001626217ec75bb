//! Error types for the generator crate.

use thiserror::Error;

/// Errors produced while configuring, writing or reading a dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenError {
    /// A configuration value makes one of the sampling ranges undefined.
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    /// A record in a labeled container has no label.
    #[error("record {index} of '{array}' has no label")]
    MissingLabel {
        /// Array being written.
        array: &'static str,
        /// Position of the record.
        index: usize,
    },

    /// `ndarray-npy` failed to encode a plain array.
    #[error("failed to encode npy array: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    /// An array in a dataset file does not have the expected layout.
    #[error("malformed array '{array}': {reason}")]
    Format {
        /// Array being read.
        array: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// Underlying filesystem or stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dataset generation and serialization.
pub type GenResult<T> = Result<T, GenError>;
