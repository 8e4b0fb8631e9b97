//! Claims DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{DateWindow, OrganizationId};
use domain_claims::{
    Claim, ClaimDraft, ClaimPath, ClaimPriority, ClaimQuery, ClaimSource, ClaimStatus, DenialDetail,
    Patient, Payer, PlanType, ProgressTrack, Provider, RiskLevel,
};

use crate::error::ApiError;

/// Largest page a list request may ask for
pub const MAX_PAGE_SIZE: u32 = 500;

/// Body of `POST /api/v1/claims`
///
/// Required identity fields are checked by the claim validator so that
/// imports and API callers get the same messages.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateClaimRequest {
    pub organization_id: Option<OrganizationId>,
    #[validate(length(max = 64))]
    pub claim_number: Option<String>,
    pub external_reference: Option<String>,
    pub patient_name: Option<String>,
    pub patient_identifier: Option<String>,
    pub patient_date_of_birth: Option<NaiveDate>,
    pub payer_name: Option<String>,
    pub plan_type: Option<PlanType>,
    pub provider_name: Option<String>,
    #[validate(length(equal = 10, message = "NPI must be 10 digits"))]
    pub provider_npi: Option<String>,
    pub service_date: Option<NaiveDate>,
    pub service_end_date: Option<NaiveDate>,
    #[validate(length(max = 50))]
    pub procedure_codes: Vec<String>,
    #[validate(length(max = 25))]
    pub diagnosis_codes: Vec<String>,
    pub billed_amount: Option<Decimal>,
    pub allowed_amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub adjustment_amount: Option<Decimal>,
    pub patient_responsibility: Option<Decimal>,
    pub status: Option<ClaimStatus>,
    pub priority: Option<ClaimPriority>,
    pub denial: DenialDetail,
}

impl CreateClaimRequest {
    pub fn into_draft(self) -> ClaimDraft {
        ClaimDraft {
            organization_id: self.organization_id,
            claim_number: self.claim_number,
            external_reference: self.external_reference,
            patient: Patient {
                name: self.patient_name.unwrap_or_default(),
                identifier: self.patient_identifier,
                date_of_birth: self.patient_date_of_birth,
            },
            payer: Payer {
                name: self.payer_name.unwrap_or_default(),
                plan_type: self.plan_type,
            },
            provider: Provider {
                name: self.provider_name,
                npi: self.provider_npi,
            },
            service_date: self.service_date,
            service_end_date: self.service_end_date,
            procedure_codes: self.procedure_codes,
            diagnosis_codes: self.diagnosis_codes,
            billed_amount: self.billed_amount,
            allowed_amount: self.allowed_amount,
            paid_amount: self.paid_amount,
            adjustment_amount: self.adjustment_amount,
            patient_responsibility: self.patient_responsibility,
            status: self.status,
            priority: self.priority,
            denial: self.denial,
            source: Some(ClaimSource::Api),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

/// Query string of `GET /api/v1/claims`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListClaimsParams {
    pub status: Option<String>,
    pub payer: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListClaimsParams {
    pub fn into_query(self) -> Result<ClaimQuery, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ClaimStatus>)
            .transpose()?;

        Ok(ClaimQuery {
            organization_id: None,
            status,
            payer: self.payer,
            risk_level: self.risk_level,
            window: DateWindow::new(self.from, self.to)?,
            limit: Some(self.limit.unwrap_or(100).min(MAX_PAGE_SIZE)),
            offset: self.offset,
        })
    }
}

/// A claim plus the display keys presentation layers need
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    #[serde(flatten)]
    pub claim: Claim,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub risk_color: Option<&'static str>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            status_label: claim.status.label(),
            status_color: claim.status.color_key(),
            risk_color: claim.risk_level.map(|level| level.color_key()),
            claim,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressStep {
    pub status: ClaimStatus,
    pub label: &'static str,
    pub color: &'static str,
    pub reached: bool,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub path: ClaimPath,
    pub current: Option<usize>,
    pub steps: Vec<ProgressStep>,
}

impl From<ProgressTrack> for ProgressResponse {
    fn from(track: ProgressTrack) -> Self {
        let steps = track
            .steps
            .iter()
            .enumerate()
            .map(|(index, status)| ProgressStep {
                status: *status,
                label: status.label(),
                color: status.color_key(),
                reached: track.current.is_some_and(|current| index <= current),
            })
            .collect();

        Self {
            path: track.path,
            current: track.current,
            steps,
        }
    }
}
