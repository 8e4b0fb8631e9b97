//! Denial risk scoring
//!
//! Scoring is a fixed, additive rule table. Each check that fires adds its
//! weight and one explanatory factor; the sum is capped at 100. The table
//! order is also the factor order, and both the weights and the order are
//! part of the stored-score contract: changing either changes the meaning of
//! every score already persisted.
//!
//! | Check                          | Weight | Impact |
//! |--------------------------------|--------|--------|
//! | no procedure codes             | 25     | high   |
//! | no diagnosis codes             | 25     | high   |
//! | billed amount > 10,000         | 15     | medium |
//! | Medicare or Medicaid plan      | 10     | medium |
//! | provider NPI missing           | 10     | low    |
//! | service date missing           | 15     | medium |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::claim::Claim;

/// Upper bound of a risk score
pub const MAX_RISK_SCORE: u8 = 100;

/// Billed amounts strictly above this are flagged
pub const HIGH_BILLED_AMOUNT: Decimal = dec!(10000);

/// Scores at or above this are high risk
pub const HIGH_RISK_THRESHOLD: u8 = 60;

/// Scores at or above this (and below high) are medium risk
pub const MEDIUM_RISK_THRESHOLD: u8 = 30;

/// Denial risk band derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Maps a score onto its band
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Colour key used by dashboards
    pub fn color_key(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "yellow",
            RiskLevel::High => "red",
        }
    }
}

/// How strongly a single factor contributes to denial risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTier {
    Low,
    Medium,
    High,
}

/// One explainable reason behind a score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub label: String,
    pub impact: ImpactTier,
    pub description: String,
}

/// Output of the scoring function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Labels of the contributing factors, in evaluation order
    pub fn factor_labels(&self) -> Vec<&str> {
        self.factors.iter().map(|f| f.label.as_str()).collect()
    }
}

struct RiskCheck {
    weight: u8,
    label: &'static str,
    impact: ImpactTier,
    description: &'static str,
    applies: fn(&Claim) -> bool,
}

impl RiskCheck {
    fn factor(&self) -> RiskFactor {
        RiskFactor {
            label: self.label.to_string(),
            impact: self.impact,
            description: self.description.to_string(),
        }
    }
}

fn missing_procedure_codes(claim: &Claim) -> bool {
    !claim.has_procedure_codes()
}

fn missing_diagnosis_codes(claim: &Claim) -> bool {
    !claim.has_diagnosis_codes()
}

fn high_billed_amount(claim: &Claim) -> bool {
    claim.billed_amount > HIGH_BILLED_AMOUNT
}

fn government_plan(claim: &Claim) -> bool {
    claim.is_government_plan()
}

fn missing_provider_npi(claim: &Claim) -> bool {
    !claim.has_provider_npi()
}

fn missing_service_date(claim: &Claim) -> bool {
    claim.service_date.is_none()
}

const RISK_CHECKS: [RiskCheck; 6] = [
    RiskCheck {
        weight: 25,
        label: "Missing procedure codes",
        impact: ImpactTier::High,
        description: "No CPT/HCPCS procedure codes are recorded; payers reject claims without billable services",
        applies: missing_procedure_codes,
    },
    RiskCheck {
        weight: 25,
        label: "Missing diagnosis codes",
        impact: ImpactTier::High,
        description: "No ICD-10 diagnosis codes are recorded to establish medical necessity",
        applies: missing_diagnosis_codes,
    },
    RiskCheck {
        weight: 15,
        label: "High billed amount",
        impact: ImpactTier::Medium,
        description: "Billed amount exceeds $10,000 and is likely to receive additional payer review",
        applies: high_billed_amount,
    },
    RiskCheck {
        weight: 10,
        label: "Government payer",
        impact: ImpactTier::Medium,
        description: "Medicare and Medicaid apply stricter documentation and coding requirements",
        applies: government_plan,
    },
    RiskCheck {
        weight: 10,
        label: "Missing provider NPI",
        impact: ImpactTier::Low,
        description: "The rendering provider's national provider identifier is not recorded",
        applies: missing_provider_npi,
    },
    RiskCheck {
        weight: 15,
        label: "Missing service date",
        impact: ImpactTier::Medium,
        description: "No date of service is recorded, so timely filing cannot be verified",
        applies: missing_service_date,
    },
];

/// Running score with the 100 cap applied on completion
#[derive(Debug, Default)]
pub(crate) struct RiskAccumulator {
    total: u32,
    factors: Vec<RiskFactor>,
}

impl RiskAccumulator {
    pub(crate) fn add(&mut self, weight: u8, factor: RiskFactor) {
        self.total += u32::from(weight);
        self.factors.push(factor);
    }

    pub(crate) fn finish(self) -> RiskAssessment {
        let score = self.total.min(u32::from(MAX_RISK_SCORE)) as u8;
        RiskAssessment {
            score,
            level: RiskLevel::from_score(score),
            factors: self.factors,
        }
    }
}

/// Scores a claim for denial risk
///
/// Pure and deterministic. Partially-populated claims are accepted; an
/// absent field simply triggers its check.
pub fn score_claim(claim: &Claim) -> RiskAssessment {
    let mut accumulator = RiskAccumulator::default();
    for check in RISK_CHECKS.iter().filter(|check| (check.applies)(claim)) {
        accumulator.add(check.weight, check.factor());
    }
    accumulator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::claim::PlanType;

    fn clean_claim() -> Claim {
        let mut claim = Claim::new("CLM-R1");
        claim.procedure_codes = vec!["99213".to_string()];
        claim.diagnosis_codes = vec!["E11.9".to_string()];
        claim.service_date = NaiveDate::from_ymd_opt(2024, 4, 2);
        claim.payer.plan_type = Some(PlanType::Commercial);
        claim.provider.npi = Some("1234567893".to_string());
        claim.billed_amount = dec!(10000);
        claim
    }

    #[test]
    fn test_clean_claim_scores_zero() {
        let assessment = score_claim(&clean_claim());
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn test_billed_threshold_is_strict() {
        let mut claim = clean_claim();
        claim.billed_amount = dec!(10000.01);
        let assessment = score_claim(&claim);
        assert_eq!(assessment.score, 15);
        assert_eq!(assessment.factors[0].impact, ImpactTier::Medium);
    }

    #[test]
    fn test_blank_claim_triggers_everything_but_amount_and_plan() {
        let assessment = score_claim(&Claim::new("CLM-R2"));
        assert_eq!(assessment.score, 25 + 25 + 10 + 15);
        assert_eq!(
            assessment.factor_labels(),
            vec![
                "Missing procedure codes",
                "Missing diagnosis codes",
                "Missing provider NPI",
                "Missing service date",
            ]
        );
    }

    #[test]
    fn test_weights_sum_to_cap() {
        let total: u32 = RISK_CHECKS.iter().map(|c| u32::from(c.weight)).sum();
        assert_eq!(total, u32::from(MAX_RISK_SCORE));
    }

    #[test]
    fn test_accumulator_clamps_above_cap() {
        let mut accumulator = RiskAccumulator::default();
        for check in RISK_CHECKS.iter() {
            accumulator.add(check.weight, check.factor());
        }
        accumulator.add(
            20,
            RiskFactor {
                label: "Hypothetical".to_string(),
                impact: ImpactTier::Low,
                description: "Extra weight beyond the table".to_string(),
            },
        );

        let assessment = accumulator.finish();
        assert_eq!(assessment.score, MAX_RISK_SCORE);
        assert_eq!(assessment.level, RiskLevel::High);
        assert_eq!(assessment.factors.len(), 7);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(59), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }
}
