//! Domain error types

use thiserror::Error;

/// Errors raised by domain rules, independent of storage or HTTP.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("record is in terminal status {status} and can no longer change")]
    TerminalStatus { status: String },
}
