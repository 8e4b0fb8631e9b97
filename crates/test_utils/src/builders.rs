//! Test Data Builders
//!
//! Builds claims with only the fields a test cares about. The starting point
//! is a clean claim that scores 0, so each `without_*`/`with_*` call maps to
//! one risk check.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use domain_claims::{Claim, ClaimDraft, ClaimStatus, DenialCategory, PlanType};

use crate::fixtures::ClaimFixtures;

/// Builder for constructing test claims
pub struct TestClaimBuilder {
    claim: Claim,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// Starts from [`ClaimFixtures::clean`]
    pub fn new() -> Self {
        Self {
            claim: ClaimFixtures::clean(),
        }
    }

    /// Starts from a blank claim
    pub fn blank() -> Self {
        Self {
            claim: ClaimFixtures::blank(),
        }
    }

    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim.claim_number = number.into();
        self
    }

    pub fn with_payer(mut self, name: impl Into<String>) -> Self {
        self.claim.payer.name = name.into();
        self
    }

    pub fn with_plan(mut self, plan: PlanType) -> Self {
        self.claim.payer.plan_type = Some(plan);
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.claim.status = status;
        self
    }

    pub fn with_billed(mut self, amount: Decimal) -> Self {
        self.claim.billed_amount = amount;
        self
    }

    pub fn with_paid(mut self, amount: Decimal) -> Self {
        self.claim.paid_amount = Some(amount);
        self
    }

    pub fn with_service_date(mut self, date: NaiveDate) -> Self {
        self.claim.service_date = Some(date);
        self
    }

    pub fn with_denial_category(mut self, category: DenialCategory) -> Self {
        self.claim.denial.category = Some(category);
        self
    }

    pub fn with_risk_score(mut self, score: u8) -> Self {
        self.claim.risk_score = Some(score);
        self
    }

    pub fn without_procedure_codes(mut self) -> Self {
        self.claim.procedure_codes.clear();
        self
    }

    pub fn without_diagnosis_codes(mut self) -> Self {
        self.claim.diagnosis_codes.clear();
        self
    }

    pub fn without_npi(mut self) -> Self {
        self.claim.provider.npi = None;
        self
    }

    pub fn without_service_date(mut self) -> Self {
        self.claim.service_date = None;
        self
    }

    pub fn build(self) -> Claim {
        self.claim
    }

    /// The claim as an import draft, for service-level tests
    pub fn build_draft(self) -> ClaimDraft {
        let claim = self.claim;
        ClaimDraft {
            organization_id: claim.organization_id,
            claim_number: Some(claim.claim_number),
            external_reference: claim.external_reference,
            patient: claim.patient,
            payer: claim.payer,
            provider: claim.provider,
            service_date: claim.service_date,
            service_end_date: claim.service_end_date,
            procedure_codes: claim.procedure_codes,
            diagnosis_codes: claim.diagnosis_codes,
            billed_amount: Some(claim.billed_amount),
            allowed_amount: claim.allowed_amount,
            paid_amount: claim.paid_amount,
            adjustment_amount: claim.adjustment_amount,
            patient_responsibility: claim.patient_responsibility,
            status: Some(claim.status),
            priority: Some(claim.priority),
            denial: claim.denial,
            source: Some(claim.source),
        }
    }
}
