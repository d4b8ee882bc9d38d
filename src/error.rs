//! Error types shared across the viewer.

use thiserror::Error;

/// Malformed upload input. The upload is aborted and prior state kept.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("input contains no header row")]
    EmptyInput,

    #[error("header column {position} has an empty name")]
    EmptyColumnName { position: usize },

    #[error("duplicate column name {0:?} in header")]
    DuplicateColumn(String),

    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("input is not valid UTF-8")]
    Encoding,

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),
}

/// A save or load request that did not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),

    #[error("snapshot could not be encoded: {0}")]
    Encode(String),
}

/// Errors raised by viewer actions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error("parse failure: {0}")]
    Parse(#[from] ParseError),

    #[error("transport failure: {0}")]
    Gateway(#[from] GatewayError),

    #[error("unknown column {0:?}")]
    UnknownColumn(String),

    #[error("unsupported page size {0}")]
    PageSize(usize),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
