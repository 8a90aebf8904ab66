//! Unified error type for the tuition and collections ledgers.
//!
//! Every failure that reaches the operator names the student id, month or field
//! that caused it. [`Error::kind`] groups variants into the categories the
//! operator surface reports on.

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or a mutation target that does not exist. Nothing was written.
    Validation,
    /// A status was requested for a month with no tuition obligation.
    NotApplicable,
    /// The storage layer failed; the in-flight transaction was rolled back.
    Persistence,
    /// Configuration or environment could not be loaded.
    Configuration,
    /// Anything else (formatting of operator output).
    Internal,
}

/// Error type shared by the whole crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or value problem
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable explanation
        message: String,
    },

    /// Storage failure surfaced by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A field failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Why the value was rejected
        message: String,
    },

    /// A currency amount is negative or not a finite number
    #[error("Invalid amount for {field}: {amount}")]
    InvalidAmount {
        /// Name of the offending field
        field: String,
        /// The rejected amount
        amount: f64,
    },

    /// A status label outside the three known states
    #[error("Unknown status '{value}' (expected Pendente, Em Negociação or Pago)")]
    InvalidStatus {
        /// The rejected label
        value: String,
    },

    /// A month that is neither a known code nor a known month name
    #[error("Unknown month '{value}'")]
    InvalidMonth {
        /// The rejected text
        value: String,
    },

    /// The tuition ledger has no student with this id
    #[error("Student {id} not found")]
    StudentNotFound {
        /// Requested id
        id: i64,
    },

    /// Adding a student whose id is already taken
    #[error("Student {id} already exists")]
    DuplicateStudent {
        /// Requested id
        id: i64,
    },

    /// The collections ledger has no record for this student-month
    #[error("No collections record for student {id} in {month}")]
    CollectionNotFound {
        /// Student id
        id: i64,
        /// Full month name
        month: String,
    },

    /// The tuition amount for the month is zero, so no status can be attached
    #[error("Status not applicable for student {id} in {month}: amount is {amount}")]
    NotApplicable {
        /// Student id
        id: i64,
        /// Full month name
        month: String,
        /// Formatted tuition amount
        amount: String,
        /// Whether a stale collections record was deleted
        removed_stale: bool,
    },

    /// Writing operator output failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl Error {
    /// Classifies the error for reporting.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidMonth { .. }
            | Self::StudentNotFound { .. }
            | Self::DuplicateStudent { .. }
            | Self::CollectionNotFound { .. } => ErrorKind::Validation,
            Self::NotApplicable { .. } => ErrorKind::NotApplicable,
            Self::Database(_) => ErrorKind::Persistence,
            Self::Config { .. } => ErrorKind::Configuration,
            Self::Fmt(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
