//! Error types for the ATM simulator.
//!
//! The display string of each variant is the exact message shown to the
//! user at the prompt.

use thiserror::Error;

/// Result type alias for ATM operations
pub type Result<T> = std::result::Result<T, AtmError>;

/// Coarse classification of an [`AtmError`], for callers that need to branch
/// on the outcome without matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown account or PIN mismatch.
    Auth,
    /// No session when an authorized command was attempted.
    SessionRequired,
    /// Session existed but was idle for too long.
    SessionExpired,
    /// Command name not recognized.
    UnknownCommand,
    /// Malformed or out-of-policy amount.
    Validation,
    /// Overdrawn account or empty cash pool.
    PolicyRejection,
    /// Account or history absent.
    NotFound,
    /// Startup configuration could not be loaded.
    Config,
}

/// Errors that can occur while serving ATM commands or loading accounts.
#[derive(Error, Debug)]
pub enum AtmError {
    /// Unknown account id or wrong PIN. Deliberately does not say which.
    #[error("Authorization failed.")]
    AuthFailure,

    #[error("Authorization required.")]
    SessionRequired,

    #[error("Your login has timed out. Please reauthorize.")]
    SessionExpired,

    #[error("Command not recognized. Please try again.")]
    UnknownCommand(String),

    /// Amount argument missing or not a number
    #[error("Command failed: invalid amount {0:?}.")]
    InvalidAmount(String),

    #[error("Please enter a multiple of $20.")]
    NotMultipleOfTwenty,

    #[error("Please deposit an amount greater than zero.")]
    NonPositiveDeposit,

    /// Single deposit above the per-transaction limit, in dollars
    #[error("Deposits are limited to ${0} per transaction.")]
    DepositLimitExceeded(u32),

    #[error("Your account is overdrawn! You may not make withdrawals at this time.")]
    AccountOverdrawn,

    /// ATM cash pool is empty
    #[error("Unable to process your withdrawal at this time.")]
    CashUnavailable,

    #[error("Account not found.")]
    AccountNotFound,

    #[error("No history found.")]
    NoHistory,

    /// Failed to open or read the accounts file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error in the accounts file
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid account record in the accounts file
    #[error("Invalid account at row {row}: {message}")]
    InvalidAccountRecord { row: usize, message: String },

    /// Account id listed more than once in the accounts file
    #[error("Duplicate account {account_id} at row {row}")]
    DuplicateAccount { account_id: String, row: usize },
}

impl AtmError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AtmError::AuthFailure => ErrorKind::Auth,
            AtmError::SessionRequired => ErrorKind::SessionRequired,
            AtmError::SessionExpired => ErrorKind::SessionExpired,
            AtmError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            AtmError::InvalidAmount(_)
            | AtmError::NotMultipleOfTwenty
            | AtmError::NonPositiveDeposit
            | AtmError::DepositLimitExceeded(_) => ErrorKind::Validation,
            AtmError::AccountOverdrawn | AtmError::CashUnavailable => ErrorKind::PolicyRejection,
            AtmError::AccountNotFound | AtmError::NoHistory => ErrorKind::NotFound,
            AtmError::Io(_)
            | AtmError::Csv(_)
            | AtmError::InvalidAccountRecord { .. }
            | AtmError::DuplicateAccount { .. } => ErrorKind::Config,
        }
    }
}
