//! Error types for FlyBase remapping
//!
//! Defines all error types used throughout the library. Resolution outcomes
//! (gaps, scaffold changes) are not errors and live in `ConversionResult`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for remapping operations
#[derive(Debug, Error)]
pub enum RemapError {
    /// Mapping file errors
    #[error("Mapping file error: {0}")]
    MappingFile(#[from] MappingFileError),

    /// Coordinate query errors
    #[error("Coordinate error: {0}")]
    Coordinate(#[from] CoordinateError),

    /// ID or synonym table errors
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while reading an assembly mapping file
#[derive(Debug, Error)]
pub enum MappingFileError {
    /// Row has fewer than the required number of fields
    #[error("Too few fields at line {line}: expected at least {expected}, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Failed to parse a coordinate
    #[error("Invalid {field} value '{value}' at line {line}: expected a non-negative integer")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Coordinate too large to translate safely
    #[error("{field} value {value} at line {line} exceeds the maximum coordinate {max}")]
    CoordinateOutOfRange {
        line: usize,
        field: &'static str,
        value: i64,
        max: i64,
    },

    /// Row is not valid UTF-8
    #[error("Invalid UTF-8 at line {line}")]
    InvalidEncoding { line: usize },

    /// Strand must be '+' or '-'
    #[error("Strand must be '+' or '-', got '{strand}' at line {line}")]
    InvalidStrand { line: usize, strand: String },

    /// Mapping file not found or unreadable
    #[error("Mapping file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MappingFileError {
    /// Line number of a row-level error, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            MappingFileError::TooFewFields { line, .. }
            | MappingFileError::InvalidNumber { line, .. }
            | MappingFileError::CoordinateOutOfRange { line, .. }
            | MappingFileError::InvalidEncoding { line }
            | MappingFileError::InvalidStrand { line, .. } => Some(*line),
            MappingFileError::FileNotFound(_) | MappingFileError::Io(_) => None,
        }
    }
}

/// Errors that can occur while parsing a coordinate query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// Text matches neither `CHR:POS` nor `CHR:START..END`
    #[error("Invalid coordinate format: '{0}'")]
    InvalidFormat(String),
}

/// Errors that can occur while reading FlyBase ID and synonym tables
#[derive(Debug, Error)]
pub enum LookupError {
    /// Row has fewer columns than the table layout requires
    #[error("Malformed row at line {line}: expected at least {expected} columns, found {found}")]
    TooFewColumns {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Reference table not found
    #[error("Reference table not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for remapping operations
pub type Result<T> = std::result::Result<T, RemapError>;

/// Result type alias for mapping file operations
pub type MappingResult<T> = std::result::Result<T, MappingFileError>;

/// Result type alias for coordinate parsing
pub type CoordinateResult<T> = std::result::Result<T, CoordinateError>;

/// Result type alias for lookup table operations
pub type LookupResult<T> = std::result::Result<T, LookupError>;
