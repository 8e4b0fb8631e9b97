//! Population statistics over a claim collection
//!
//! Aggregation is a single pass: every claim contributes exactly once to the
//! running counts and sums, and the means are taken at the end. Results are
//! recomputed on every call. Money sums saturate at `Decimal::MAX` rather
//! than overflow.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::DateWindow;
use crate::claim::{Claim, DenialCategory};
use crate::risk::RiskLevel;
use crate::status::ClaimStatus;

/// Per-payer slice of a population
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerBreakdown {
    pub count: usize,
    pub denied: usize,
    pub total_billed: Decimal,
}

impl PayerBreakdown {
    /// Fraction of this payer's claims that were denied
    pub fn denial_rate(&self) -> Decimal {
        ratio(self.denied, self.count)
    }
}

/// Aggregate view of a claim population
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStats {
    pub total: usize,
    pub by_status: BTreeMap<ClaimStatus, usize>,
    /// Only claims currently on the denial path with a category recorded
    pub by_denial_category: BTreeMap<DenialCategory, usize>,
    pub by_payer: BTreeMap<String, PayerBreakdown>,
    pub by_risk_level: BTreeMap<RiskLevel, usize>,
    /// Claims that have never been scored
    pub unscored: usize,
    pub avg_billed_amount: Decimal,
    pub avg_risk_score: Decimal,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    /// Fraction of claims that are `denied` or `partially_denied`
    pub denial_rate: Decimal,
}

impl ClaimStats {
    /// Aggregates a collection of claims
    pub fn from_claims<'a, I>(claims: I) -> Self
    where
        I: IntoIterator<Item = &'a Claim>,
    {
        let mut accumulator = StatsAccumulator::default();
        for claim in claims {
            accumulator.push(claim);
        }
        accumulator.finish()
    }

    /// Aggregates the claims whose reference date falls inside `window`
    pub fn for_window<'a, I>(claims: I, window: &DateWindow) -> Self
    where
        I: IntoIterator<Item = &'a Claim>,
    {
        Self::from_claims(
            claims
                .into_iter()
                .filter(|claim| window.contains(claim.reference_date())),
        )
    }

    /// Number of claims counted as denials
    pub fn denied_count(&self) -> usize {
        self.status_count(ClaimStatus::Denied) + self.status_count(ClaimStatus::PartiallyDenied)
    }

    pub fn status_count(&self, status: ClaimStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Denials that carry a category
    pub fn categorized_denials(&self) -> usize {
        self.by_denial_category.values().sum()
    }
}

/// Incremental builder behind [`ClaimStats::from_claims`]
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    stats: ClaimStats,
    risk_score_sum: u64,
    denied: usize,
}

impl StatsAccumulator {
    /// Folds one claim into the running totals
    pub fn push(&mut self, claim: &Claim) {
        let stats = &mut self.stats;
        stats.total += 1;
        *stats.by_status.entry(claim.status).or_insert(0) += 1;

        if let Some(category) = claim.denial_detail().and_then(|detail| detail.category) {
            *stats.by_denial_category.entry(category).or_insert(0) += 1;
        }

        let denied = claim.status.is_denied();
        if denied {
            self.denied += 1;
        }

        let payer = stats.by_payer.entry(payer_key(claim)).or_default();
        payer.count += 1;
        payer.total_billed = payer.total_billed.saturating_add(claim.billed_amount);
        if denied {
            payer.denied += 1;
        }

        match claim.risk_score {
            Some(score) => {
                self.risk_score_sum += u64::from(score);
                let level = claim.risk_level.unwrap_or_else(|| RiskLevel::from_score(score));
                *stats.by_risk_level.entry(level).or_insert(0) += 1;
            }
            None => stats.unscored += 1,
        }

        stats.total_billed = stats.total_billed.saturating_add(claim.billed_amount);
        stats.total_paid = stats.total_paid.saturating_add(claim.paid_or_zero());
    }

    /// Computes the means and rates
    pub fn finish(self) -> ClaimStats {
        let mut stats = self.stats;
        if stats.total > 0 {
            let total = Decimal::from(stats.total);
            stats.avg_billed_amount = stats.total_billed / total;
            stats.avg_risk_score = Decimal::from(self.risk_score_sum) / total;
        }
        stats.denial_rate = ratio(self.denied, stats.total);
        stats
    }
}

fn payer_key(claim: &Claim) -> String {
    let name = claim.payer.name.trim();
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name.to_string()
    }
}

fn ratio(numerator: usize, denominator: usize) -> Decimal {
    if denominator == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(numerator) / Decimal::from(denominator)
    }
}
