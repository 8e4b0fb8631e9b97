//! Claims domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::PortError;
use crate::status::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("Amount {field} must not be negative (got {amount})")]
    NegativeAmount { field: &'static str, amount: Decimal },

    #[error("Unknown claim status: {0}")]
    UnknownStatus(String),

    #[error("Status transition from {from} to {to} is not allowed")]
    TransitionNotAllowed { from: ClaimStatus, to: ClaimStatus },

    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Claim number already in use: {0}")]
    DuplicateClaimNumber(String),

    #[error(transparent)]
    Port(#[from] PortError),
}
