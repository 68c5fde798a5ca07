//! Error types for the shift ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the ledgers, stores and file formats can report.

use thiserror::Error;

/// The main error type for the shift ledger.
///
/// All fallible operations in the crate return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use shift_ledger::error::LedgerError;
///
/// let error = LedgerError::ConfigNotFound {
///     path: "/missing/pay_rules.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/pay_rules.yaml");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The backing key-value store failed to read or write a key.
    #[error("Storage error on key '{key}': {message}")]
    Storage {
        /// The storage key involved.
        key: String,
        /// A description of the failure.
        message: String,
    },

    /// A record field held a value the ledger cannot accept.
    #[error("Invalid record field '{field}': {message}")]
    InvalidRecord {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No record matched the given reference.
    #[error("Record not found: {reference}")]
    RecordNotFound {
        /// The id or identity that was looked up.
        reference: String,
    },

    /// More than one record matched a composite identity.
    #[error("Ambiguous record reference '{reference}': {matches} records match")]
    AmbiguousRecord {
        /// The identity that was looked up.
        reference: String,
        /// How many records matched.
        matches: usize,
    },

    /// An import file was rejected as a whole.
    #[error("Import rejected: {message}")]
    InvalidImport {
        /// Why the import was rejected.
        message: String,
    },

    /// Writing an export file failed.
    #[error("Export to '{path}' failed: {message}")]
    Export {
        /// The destination path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A remote document store call failed.
    #[error("Remote sync failed: {message}")]
    Sync {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
