//! Error types for document parsing and configuration loading.
//!
//! Scoring never fails, so everything here belongs to the ingestion side:
//! a malformed annotation table or an unreadable configuration file.

use thiserror::Error;

/// A range token that could not be read as `start-end` or `start`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed range token {token:?} in column `{column}` of row {row}")]
pub struct MalformedRangeError {
    /// The offending token, trimmed.
    pub token: String,
    /// 1-based data row (the header row is not counted).
    pub row: usize,
    /// Column the token came from (`mitigation` or `desaccord`).
    pub column: String,
}

/// Errors that can occur while parsing a declaration and its annotation table.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The header row lacks a required column.
    #[error("annotation table is missing required column `{column}`")]
    MissingColumn { column: String },

    /// The CSV reader itself failed.
    #[error("failed to read annotation table: {message}")]
    Table { message: String },

    /// A mitigation or disagreement cell holds an unparsable token.
    #[error(transparent)]
    MalformedRange(#[from] MalformedRangeError),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        ParseError::Table {
            message: err.to_string(),
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while loading a [`DissentConfig`](crate::DissentConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    /// The file is not valid TOML for the config schema.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
