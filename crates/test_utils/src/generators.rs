//! Property-Based Test Generators
//!
//! Proptest strategies for claims. Generated claims are structurally valid
//! but deliberately incomplete, so every risk check gets exercised.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_claims::{Claim, ClaimStatus, DenialCategory, PlanType};

/// Any of the eleven statuses
pub fn status_strategy() -> impl Strategy<Value = ClaimStatus> {
    proptest::sample::select(ClaimStatus::ALL.to_vec())
}

pub fn plan_type_strategy() -> impl Strategy<Value = Option<PlanType>> {
    prop_oneof![
        Just(None),
        Just(Some(PlanType::Commercial)),
        Just(Some(PlanType::Medicare)),
        Just(Some(PlanType::Medicaid)),
        Just(Some(PlanType::Other)),
    ]
}

pub fn denial_category_strategy() -> impl Strategy<Value = Option<DenialCategory>> {
    prop_oneof![
        Just(None),
        Just(Some(DenialCategory::Coding)),
        Just(Some(DenialCategory::Eligibility)),
        Just(Some(DenialCategory::Authorization)),
        Just(Some(DenialCategory::MedicalNecessity)),
        Just(Some(DenialCategory::TimelyFiling)),
    ]
}

/// Non-negative amounts in cents, up to 50,000.00
pub fn billed_amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

pub fn payer_strategy() -> impl Strategy<Value = String> {
    proptest::sample::select(vec!["Aetna", "Cigna", "Humana", "Medicare Part B", "UnitedHealthcare"])
        .prop_map(str::to_string)
}

pub fn service_date_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    proptest::option::of((0u32..365u32).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|start| start.checked_add_days(chrono::Days::new(u64::from(offset))))
            .expect("offset stays within 2024")
    }))
}

fn codes_strategy(code: &'static str) -> impl Strategy<Value = Vec<String>> {
    prop_oneof![Just(Vec::new()), Just(vec![code.to_string()])]
}

/// A claim with every risk-relevant field independently present or absent
pub fn claim_strategy() -> impl Strategy<Value = Claim> {
    (
        (
            payer_strategy(),
            plan_type_strategy(),
            status_strategy(),
            billed_amount_strategy(),
        ),
        (
            codes_strategy("99213"),
            codes_strategy("E11.9"),
            any::<bool>(),
            service_date_strategy(),
            denial_category_strategy(),
            proptest::option::of(0u8..=100u8),
        ),
    )
        .prop_map(
            |(
                (payer, plan, status, billed),
                (procedures, diagnoses, has_npi, service_date, category, score),
            )| {
                let mut claim = Claim::new("CLM-GEN");
                claim.patient.name = "Generated Patient".to_string();
                claim.payer.name = payer;
                claim.payer.plan_type = plan;
                claim.status = status;
                claim.billed_amount = billed;
                claim.procedure_codes = procedures;
                claim.diagnosis_codes = diagnoses;
                claim.provider.npi = has_npi.then(|| "1234567893".to_string());
                claim.service_date = service_date;
                claim.denial.category = category;
                claim.risk_score = score;
                claim
            },
        )
}

/// A population of 0 to `max` claims
pub fn claims_strategy(max: usize) -> impl Strategy<Value = Vec<Claim>> {
    proptest::collection::vec(claim_strategy(), 0..=max)
}
