//! Claim record model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, OrganizationId};
use crate::activity::{ActivityAction, ActivityEvent};
use crate::error::ClaimError;
use crate::risk::{RiskAssessment, RiskFactor, RiskLevel};
use crate::status::{ClaimStatus, TransitionTable, TransitionVerdict};

/// Payer plan type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Commercial,
    Medicare,
    Medicaid,
    Other,
}

impl PlanType {
    /// Medicare and Medicaid
    pub fn is_government(&self) -> bool {
        matches!(self, PlanType::Medicare | PlanType::Medicaid)
    }
}

/// Work-queue priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// How the claim entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimSource {
    #[default]
    Manual,
    Import,
    ExternalSystem,
    Api,
}

/// Classification of why a payer denied a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCategory {
    Coding,
    Eligibility,
    Authorization,
    MedicalNecessity,
    TimelyFiling,
    Duplicate,
    Documentation,
    Other,
}

impl DenialCategory {
    pub fn label(&self) -> &'static str {
        match self {
            DenialCategory::Coding => "Coding",
            DenialCategory::Eligibility => "Eligibility",
            DenialCategory::Authorization => "Prior Authorization",
            DenialCategory::MedicalNecessity => "Medical Necessity",
            DenialCategory::TimelyFiling => "Timely Filing",
            DenialCategory::Duplicate => "Duplicate Claim",
            DenialCategory::Documentation => "Documentation",
            DenialCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub identifier: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Payer {
    pub name: String,
    pub plan_type: Option<PlanType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Provider {
    pub name: Option<String>,
    /// National provider identifier
    pub npi: Option<String>,
}

/// Denial details
///
/// Stored leniently on any claim; only meaningful while the claim is on the
/// denial path (see [`Claim::denial_detail`]).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DenialDetail {
    pub denial_date: Option<NaiveDate>,
    pub codes: Vec<String>,
    pub reasons: Vec<String>,
    pub category: Option<DenialCategory>,
}

impl DenialDetail {
    pub fn is_empty(&self) -> bool {
        self.denial_date.is_none()
            && self.codes.is_empty()
            && self.reasons.is_empty()
            && self.category.is_none()
    }
}

/// A healthcare insurance claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub organization_id: Option<OrganizationId>,
    /// Unique within an organization
    pub claim_number: String,
    pub external_reference: Option<String>,
    pub patient: Patient,
    pub payer: Payer,
    pub provider: Provider,
    pub service_date: Option<NaiveDate>,
    pub service_end_date: Option<NaiveDate>,
    pub procedure_codes: Vec<String>,
    pub diagnosis_codes: Vec<String>,
    pub billed_amount: Decimal,
    pub allowed_amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub adjustment_amount: Option<Decimal>,
    pub patient_responsibility: Option<Decimal>,
    pub status: ClaimStatus,
    pub priority: ClaimPriority,
    /// 0-100, `None` until first scored
    pub risk_score: Option<u8>,
    pub risk_level: Option<RiskLevel>,
    pub risk_factors: Vec<RiskFactor>,
    pub denial: DenialDetail,
    pub source: ClaimSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a blank draft claim
    pub fn new(claim_number: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: ClaimId::new_v7(),
            organization_id: None,
            claim_number: claim_number.into(),
            external_reference: None,
            patient: Patient::default(),
            payer: Payer::default(),
            provider: Provider::default(),
            service_date: None,
            service_end_date: None,
            procedure_codes: Vec::new(),
            diagnosis_codes: Vec::new(),
            billed_amount: Decimal::ZERO,
            allowed_amount: None,
            paid_amount: None,
            adjustment_amount: None,
            patient_responsibility: None,
            status: ClaimStatus::Draft,
            priority: ClaimPriority::Normal,
            risk_score: None,
            risk_level: None,
            risk_factors: Vec::new(),
            denial: DenialDetail::default(),
            source: ClaimSource::Manual,
            created_at: now,
            updated_at: now,
        }
    }

    /// Date used to place the claim in a reporting window
    pub fn reference_date(&self) -> NaiveDate {
        self.service_date.unwrap_or_else(|| self.created_at.date_naive())
    }

    /// Denial details, if the claim is currently on the denial path
    pub fn denial_detail(&self) -> Option<&DenialDetail> {
        self.status.is_denial_path().then_some(&self.denial)
    }

    pub fn has_procedure_codes(&self) -> bool {
        has_any_code(&self.procedure_codes)
    }

    pub fn has_diagnosis_codes(&self) -> bool {
        has_any_code(&self.diagnosis_codes)
    }

    pub fn has_provider_npi(&self) -> bool {
        self.provider
            .npi
            .as_deref()
            .is_some_and(|npi| !npi.trim().is_empty())
    }

    pub fn is_government_plan(&self) -> bool {
        self.payer.plan_type.is_some_and(|plan| plan.is_government())
    }

    /// Paid amount with missing treated as zero
    pub fn paid_or_zero(&self) -> Decimal {
        self.paid_amount.unwrap_or(Decimal::ZERO)
    }

    /// Moves the claim to `target` if the table permits it
    ///
    /// Returns the activity event describing the change; the claim is left
    /// untouched when the transition is refused.
    pub fn change_status(
        &mut self,
        target: ClaimStatus,
        table: &TransitionTable,
    ) -> Result<ActivityEvent, ClaimError> {
        if let TransitionVerdict::Denied { from, to } = table.verdict(self.status, target) {
            return Err(ClaimError::TransitionNotAllowed { from, to });
        }

        let previous = self.status;
        self.status = target;
        self.updated_at = Utc::now();

        Ok(ActivityEvent::new(
            self.id,
            ActivityAction::StatusChanged,
            Some(previous.as_str().to_string()),
            Some(target.as_str().to_string()),
        ))
    }

    /// Replaces the risk fields with a freshly computed assessment
    pub fn apply_assessment(&mut self, assessment: &RiskAssessment) {
        self.risk_score = Some(assessment.score);
        self.risk_level = Some(assessment.level);
        self.risk_factors = assessment.factors.clone();
        self.updated_at = Utc::now();
    }
}

fn has_any_code(codes: &[String]) -> bool {
    codes.iter().any(|code| !code.trim().is_empty())
}

/// A partially-populated claim, as produced by imports or API callers
///
/// Anything left out falls back to the [`Claim::new`] defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimDraft {
    pub organization_id: Option<OrganizationId>,
    pub claim_number: Option<String>,
    pub external_reference: Option<String>,
    pub patient: Patient,
    pub payer: Payer,
    pub provider: Provider,
    pub service_date: Option<NaiveDate>,
    pub service_end_date: Option<NaiveDate>,
    pub procedure_codes: Vec<String>,
    pub diagnosis_codes: Vec<String>,
    pub billed_amount: Option<Decimal>,
    pub allowed_amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub adjustment_amount: Option<Decimal>,
    pub patient_responsibility: Option<Decimal>,
    pub status: Option<ClaimStatus>,
    pub priority: Option<ClaimPriority>,
    pub denial: DenialDetail,
    pub source: Option<ClaimSource>,
}

impl ClaimDraft {
    /// Materializes the draft, rejecting only negative amounts
    pub fn into_claim(self) -> Result<Claim, ClaimError> {
        let billed_amount = self.billed_amount.unwrap_or(Decimal::ZERO);
        ensure_non_negative("billed_amount", Some(billed_amount))?;
        ensure_non_negative("allowed_amount", self.allowed_amount)?;
        ensure_non_negative("paid_amount", self.paid_amount)?;
        ensure_non_negative("patient_responsibility", self.patient_responsibility)?;

        let mut claim = Claim::new(self.claim_number.unwrap_or_default());
        claim.organization_id = self.organization_id;
        claim.external_reference = self.external_reference;
        claim.patient = self.patient;
        claim.payer = self.payer;
        claim.provider = self.provider;
        claim.service_date = self.service_date;
        claim.service_end_date = self.service_end_date;
        claim.procedure_codes = self.procedure_codes;
        claim.diagnosis_codes = self.diagnosis_codes;
        claim.billed_amount = billed_amount;
        claim.allowed_amount = self.allowed_amount;
        claim.paid_amount = self.paid_amount;
        claim.adjustment_amount = self.adjustment_amount;
        claim.patient_responsibility = self.patient_responsibility;
        claim.status = self.status.unwrap_or_default();
        claim.priority = self.priority.unwrap_or_default();
        claim.denial = self.denial;
        claim.source = self.source.unwrap_or_default();
        Ok(claim)
    }
}

/// A partial edit to an existing claim; absent fields are left alone
///
/// Status and risk fields are not editable here. Status goes through
/// [`Claim::change_status`] and risk is always recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimUpdate {
    pub claim_number: Option<String>,
    pub external_reference: Option<String>,
    pub patient: Option<Patient>,
    pub payer: Option<Payer>,
    pub provider: Option<Provider>,
    pub service_date: Option<NaiveDate>,
    pub service_end_date: Option<NaiveDate>,
    pub procedure_codes: Option<Vec<String>>,
    pub diagnosis_codes: Option<Vec<String>>,
    pub billed_amount: Option<Decimal>,
    pub allowed_amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub adjustment_amount: Option<Decimal>,
    pub patient_responsibility: Option<Decimal>,
    pub priority: Option<ClaimPriority>,
    pub denial: Option<DenialDetail>,
}

impl ClaimUpdate {
    /// Applies the edit, returning the names of the fields that were set
    ///
    /// Nothing is written if any amount is negative.
    pub fn apply_to(self, claim: &mut Claim) -> Result<Vec<&'static str>, ClaimError> {
        ensure_non_negative("billed_amount", self.billed_amount)?;
        ensure_non_negative("allowed_amount", self.allowed_amount)?;
        ensure_non_negative("paid_amount", self.paid_amount)?;
        ensure_non_negative("patient_responsibility", self.patient_responsibility)?;

        let mut changed = Vec::new();
        if let Some(value) = self.claim_number {
            claim.claim_number = value;
            changed.push("claim_number");
        }
        if let Some(value) = self.external_reference {
            claim.external_reference = Some(value);
            changed.push("external_reference");
        }
        if let Some(value) = self.patient {
            claim.patient = value;
            changed.push("patient");
        }
        if let Some(value) = self.payer {
            claim.payer = value;
            changed.push("payer");
        }
        if let Some(value) = self.provider {
            claim.provider = value;
            changed.push("provider");
        }
        if let Some(value) = self.service_date {
            claim.service_date = Some(value);
            changed.push("service_date");
        }
        if let Some(value) = self.service_end_date {
            claim.service_end_date = Some(value);
            changed.push("service_end_date");
        }
        if let Some(value) = self.procedure_codes {
            claim.procedure_codes = value;
            changed.push("procedure_codes");
        }
        if let Some(value) = self.diagnosis_codes {
            claim.diagnosis_codes = value;
            changed.push("diagnosis_codes");
        }
        if let Some(value) = self.billed_amount {
            claim.billed_amount = value;
            changed.push("billed_amount");
        }
        if let Some(value) = self.allowed_amount {
            claim.allowed_amount = Some(value);
            changed.push("allowed_amount");
        }
        if let Some(value) = self.paid_amount {
            claim.paid_amount = Some(value);
            changed.push("paid_amount");
        }
        if let Some(value) = self.adjustment_amount {
            claim.adjustment_amount = Some(value);
            changed.push("adjustment_amount");
        }
        if let Some(value) = self.patient_responsibility {
            claim.patient_responsibility = Some(value);
            changed.push("patient_responsibility");
        }
        if let Some(value) = self.priority {
            claim.priority = value;
            changed.push("priority");
        }
        if let Some(value) = self.denial {
            claim.denial = value;
            changed.push("denial");
        }

        if !changed.is_empty() {
            claim.updated_at = Utc::now();
        }
        Ok(changed)
    }
}

/// Rejects a present, negative amount
///
/// Adjustments are exempt from this check; contractual write-downs may be
/// recorded either way.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    amount: Option<Decimal>,
) -> Result<(), ClaimError> {
    match amount {
        Some(amount) if amount < Decimal::ZERO => {
            Err(ClaimError::NegativeAmount { field, amount })
        }
        _ => Ok(()),
    }
}
