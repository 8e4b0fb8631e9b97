//! Commit-boundary validation
//!
//! Scoring and aggregation accept any claim shape. Validation only runs when
//! a claim is about to be saved.
//!
//! # Errors
//! - Claim number, patient name and payer name must not be blank
//! - Billed, allowed, paid and patient-responsibility amounts must not be negative
//! - A stored risk score must not exceed 100
//! - Service end date must not precede the service date
//!
//! # Warnings
//! - Denial details recorded while the claim is off the denial path
//! - The same procedure or diagnosis code listed twice

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::claim::{ensure_non_negative, Claim};
use crate::error::ClaimError;
use crate::risk::MAX_RISK_SCORE;

/// Result of claim validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Non-fatal issues
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Converts into `Err(ClaimError::Validation)` when any error was recorded
    pub fn into_result(self) -> Result<Vec<String>, ClaimError> {
        if self.is_valid {
            Ok(self.warnings)
        } else {
            Err(ClaimError::Validation { errors: self.errors })
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator applied before a claim is committed
pub struct ClaimValidator;

impl ClaimValidator {
    pub fn validate(claim: &Claim) -> ValidationResult {
        let mut result = ValidationResult::ok();

        Self::validate_identity(claim, &mut result);
        Self::validate_amounts(claim, &mut result);
        Self::validate_dates(claim, &mut result);
        Self::validate_risk(claim, &mut result);
        Self::validate_denial(claim, &mut result);
        Self::validate_codes(claim, &mut result);

        result
    }

    fn validate_identity(claim: &Claim, result: &mut ValidationResult) {
        if claim.claim_number.trim().is_empty() {
            result.add_error("Claim number is required");
        }
        if claim.patient.name.trim().is_empty() {
            result.add_error("Patient name is required");
        }
        if claim.payer.name.trim().is_empty() {
            result.add_error("Payer name is required");
        }
    }

    fn validate_amounts(claim: &Claim, result: &mut ValidationResult) {
        let amounts: [(&'static str, Option<Decimal>); 4] = [
            ("billed_amount", Some(claim.billed_amount)),
            ("allowed_amount", claim.allowed_amount),
            ("paid_amount", claim.paid_amount),
            ("patient_responsibility", claim.patient_responsibility),
        ];
        for (field, amount) in amounts {
            if let Err(error) = ensure_non_negative(field, amount) {
                result.add_error(error.to_string());
            }
        }
    }

    fn validate_dates(claim: &Claim, result: &mut ValidationResult) {
        if let (Some(start), Some(end)) = (claim.service_date, claim.service_end_date) {
            if end < start {
                result.add_error(format!(
                    "Service end date {} is before service date {}",
                    end, start
                ));
            }
        }
    }

    fn validate_risk(claim: &Claim, result: &mut ValidationResult) {
        if let Some(score) = claim.risk_score {
            if score > MAX_RISK_SCORE {
                result.add_error(format!("Risk score {} exceeds {}", score, MAX_RISK_SCORE));
            }
        }
    }

    fn validate_denial(claim: &Claim, result: &mut ValidationResult) {
        if !claim.status.is_denial_path() && !claim.denial.is_empty() {
            result.add_warning(format!(
                "Denial details are recorded but the claim is {}",
                claim.status.label()
            ));
        }
    }

    fn validate_codes(claim: &Claim, result: &mut ValidationResult) {
        for (kind, codes) in [
            ("procedure", &claim.procedure_codes),
            ("diagnosis", &claim.diagnosis_codes),
        ] {
            let mut seen = HashSet::new();
            for code in codes.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
                if !seen.insert(code) {
                    result.add_warning(format!("Duplicate {} code {}", kind, code));
                }
            }
        }
    }
}
