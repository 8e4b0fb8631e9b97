//! Custom Test Assertions
//!
//! Assertion helpers that print the whole assessment or stats on failure,
//! which is far easier to read than a bare `assert_eq!` on one field.

use rust_decimal::Decimal;

use domain_claims::{ClaimStats, Pattern, RiskAssessment, RiskLevel};

/// Asserts score and level together
pub fn assert_risk(assessment: &RiskAssessment, score: u8, level: RiskLevel) {
    assert!(
        assessment.score == score && assessment.level == level,
        "Expected score {} ({}), got {} ({}); factors: {:?}",
        score,
        level.as_str(),
        assessment.score,
        assessment.level.as_str(),
        assessment.factor_labels()
    );
}

/// Asserts the exact factor labels, in order
pub fn assert_factors(assessment: &RiskAssessment, expected: &[&str]) {
    assert_eq!(
        assessment.factor_labels(),
        expected,
        "Unexpected risk factors for score {}",
        assessment.score
    );
}

/// Asserts two decimals are equal within a tolerance
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts the count-level invariants every `ClaimStats` must satisfy
pub fn assert_stats_consistent(stats: &ClaimStats) {
    let by_status: usize = stats.by_status.values().sum();
    assert_eq!(by_status, stats.total, "status counts must sum to total: {:?}", stats);

    let by_payer: usize = stats.by_payer.values().map(|p| p.count).sum();
    assert_eq!(by_payer, stats.total, "payer counts must sum to total: {:?}", stats);

    let scored: usize = stats.by_risk_level.values().sum();
    assert_eq!(scored + stats.unscored, stats.total, "risk levels plus unscored must sum to total");

    assert!(
        stats.denial_rate >= Decimal::ZERO && stats.denial_rate <= Decimal::ONE,
        "denial rate out of range: {}",
        stats.denial_rate
    );
    assert!(
        stats.categorized_denials() <= stats.total,
        "more categorised denials than claims"
    );
}

/// Asserts findings are in non-increasing severity order
pub fn assert_sorted_by_severity(patterns: &[Pattern]) {
    for pair in patterns.windows(2) {
        assert!(
            pair[0].severity >= pair[1].severity,
            "Findings out of order: {:?} before {:?}",
            pair[0].severity,
            pair[1].severity
        );
    }
}
