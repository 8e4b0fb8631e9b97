//! Pre-built Test Fixtures
//!
//! Ready-to-use claims and reference values. Fixtures are deterministic
//! apart from generated IDs and creation timestamps.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_claims::{Claim, DenialCategory, PlanType};

/// Fixed dates used across the suites
pub struct DateFixtures;

impl DateFixtures {
    /// A typical date of service
    pub fn service_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).expect("valid fixture date")
    }

    /// Fourteen days after the service date
    pub fn denial_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 28).expect("valid fixture date")
    }

    pub fn patient_birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1968, 7, 2).expect("valid fixture date")
    }
}

/// Reference strings and amounts
pub struct ValueFixtures;

impl ValueFixtures {
    pub fn procedure_code() -> &'static str {
        "99213"
    }

    pub fn diagnosis_code() -> &'static str {
        "E11.9"
    }

    /// A well-formed 10-digit NPI
    pub fn npi() -> &'static str {
        "1234567893"
    }

    pub fn routine_amount() -> Decimal {
        dec!(500.00)
    }

    /// Just over the high-billed-amount threshold
    pub fn high_amount() -> Decimal {
        dec!(12000.00)
    }
}

/// Complete claims in known states
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// Fully populated commercial claim that scores 0
    pub fn clean() -> Claim {
        let mut claim = Claim::new("CLM-FX-0001");
        claim.patient.name = "Morgan Ellis".to_string();
        claim.patient.identifier = Some("MRN-55120".to_string());
        claim.patient.date_of_birth = Some(DateFixtures::patient_birth_date());
        claim.payer.name = "Aetna".to_string();
        claim.payer.plan_type = Some(PlanType::Commercial);
        claim.provider.name = Some("Lakeside Family Medicine".to_string());
        claim.provider.npi = Some(ValueFixtures::npi().to_string());
        claim.service_date = Some(DateFixtures::service_date());
        claim.procedure_codes = vec![ValueFixtures::procedure_code().to_string()];
        claim.diagnosis_codes = vec![ValueFixtures::diagnosis_code().to_string()];
        claim.billed_amount = ValueFixtures::routine_amount();
        claim
    }

    /// Claim with nothing but a number
    pub fn blank() -> Claim {
        Claim::new("CLM-FX-0000")
    }

    /// Denied claim with a coding denial recorded
    pub fn coding_denial() -> Claim {
        let mut claim = Self::clean();
        claim.claim_number = "CLM-FX-0002".to_string();
        claim.status = domain_claims::ClaimStatus::Denied;
        claim.denial.denial_date = Some(DateFixtures::denial_date());
        claim.denial.codes = vec!["CO-16".to_string()];
        claim.denial.reasons = vec!["Claim lacks information needed for adjudication".to_string()];
        claim.denial.category = Some(DenialCategory::Coding);
        claim
    }
}
