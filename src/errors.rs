//! Unified error types for `ChamaLedger`.
//!
//! Every engine operation is all-or-nothing: validation, not-found, and
//! authorization failures are recoverable, are reported to the caller, and
//! never leave partial mutation behind.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// Input rejected before any mutation was performed.
    #[error("Validation error: {message}")]
    Validation {
        /// Why the input was rejected
        message: String,
    },

    /// Amount was non-positive or not a finite number.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A disbursement request exceeded the fund balance.
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Current fund balance
        available: f64,
        /// Amount that was requested
        requested: f64,
    },

    /// A loan or disbursement was asked to move along an invalid edge of its
    /// state machine.
    #[error("{entity} cannot transition from '{from}' to '{to}'")]
    InvalidTransition {
        /// Which entity kind was being transitioned
        entity: &'static str,
        /// Stored status at the time of the attempt
        from: String,
        /// Requested target status
        to: String,
    },

    /// An id referenced an entity that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Which entity kind was looked up
        entity: &'static str,
        /// The id that missed
        id: String,
    },

    /// The calling session's role does not permit the operation.
    #[error("role '{role}' may not {action}")]
    Unauthorized {
        /// Role of the caller
        role: String,
        /// The action that was refused
        action: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
