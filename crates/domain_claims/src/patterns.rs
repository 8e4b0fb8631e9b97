//! Pattern detection over claim statistics
//!
//! Rules are evaluated in a fixed order and each may emit one or more
//! findings. The final list is stably sorted by descending severity, so
//! equally severe findings keep their evaluation order.
//!
//! Thresholds live in [`PatternConfig`]; every field has a default and can
//! be overridden from configuration.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::risk::RiskLevel;
use crate::stats::ClaimStats;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Which rule produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    DenialRate,
    PayerDenialRate,
    DenialCategoryConcentration,
    HighRiskConcentration,
    RecurringRiskFactor,
}

/// A qualitative finding about a claim population
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub recommended_action: String,
    /// Payer name, category or factor label the finding is about
    pub subject: Option<String>,
}

/// Tunable thresholds for the detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Population denial rate reported as medium severity (default 0.10)
    pub elevated_denial_rate: Decimal,
    /// Population denial rate reported as high severity (default 0.20)
    pub critical_denial_rate: Decimal,
    /// Payers with fewer claims are not compared (default 5)
    pub payer_min_claims: usize,
    /// Payer rate / population rate for a medium finding (default 1.5)
    pub payer_rate_multiplier: Decimal,
    /// Payer rate / population rate for a high finding (default 2.0)
    pub payer_critical_multiplier: Decimal,
    /// Categories with fewer denials are not reported (default 3)
    pub category_min_denials: usize,
    /// Share of categorised denials for a medium finding (default 0.40)
    pub category_share: Decimal,
    /// Share of categorised denials for a high finding (default 0.60)
    pub category_critical_share: Decimal,
    /// Share of high-risk claims for a medium finding (default 0.25)
    pub high_risk_share: Decimal,
    /// Share of claims carrying one factor for a low finding (default 0.30)
    pub recurring_factor_share: Decimal,
    /// Minimum claims carrying the factor (default 3)
    pub recurring_factor_min_claims: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            elevated_denial_rate: dec!(0.10),
            critical_denial_rate: dec!(0.20),
            payer_min_claims: 5,
            payer_rate_multiplier: dec!(1.5),
            payer_critical_multiplier: dec!(2.0),
            category_min_denials: 3,
            category_share: dec!(0.40),
            category_critical_share: dec!(0.60),
            high_risk_share: dec!(0.25),
            recurring_factor_share: dec!(0.30),
            recurring_factor_min_claims: 3,
        }
    }
}

/// Scans statistics for noteworthy findings
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: PatternConfig,
}

impl PatternDetector {
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Findings derived from aggregate statistics alone
    pub fn detect(&self, stats: &ClaimStats) -> Vec<Pattern> {
        self.detect_with_claims(stats, &[])
    }

    /// Findings from statistics plus a drill-down over the claims themselves
    pub fn detect_with_claims(&self, stats: &ClaimStats, claims: &[Claim]) -> Vec<Pattern> {
        let mut findings = Vec::new();
        if stats.total == 0 {
            return findings;
        }

        self.denial_rate(stats, &mut findings);
        self.payer_denial_rates(stats, &mut findings);
        self.category_concentration(stats, &mut findings);
        self.high_risk_concentration(stats, &mut findings);
        self.recurring_factor(claims, &mut findings);

        findings.sort_by(|a, b| b.severity.cmp(&a.severity));
        findings
    }

    fn denial_rate(&self, stats: &ClaimStats, findings: &mut Vec<Pattern>) {
        let rate = stats.denial_rate;
        let severity = if rate >= self.config.critical_denial_rate {
            Severity::High
        } else if rate >= self.config.elevated_denial_rate {
            Severity::Medium
        } else {
            return;
        };

        findings.push(Pattern {
            kind: PatternKind::DenialRate,
            severity,
            title: "Elevated denial rate".to_string(),
            description: format!(
                "{} of {} claims ({}) are denied or partially denied",
                stats.denied_count(),
                stats.total,
                percent(rate)
            ),
            recommended_action: "Review recent denials for common root causes before further submissions".to_string(),
            subject: None,
        });
    }

    fn payer_denial_rates(&self, stats: &ClaimStats, findings: &mut Vec<Pattern>) {
        let population = stats.denial_rate;
        if population.is_zero() {
            return;
        }

        for (payer, breakdown) in &stats.by_payer {
            if breakdown.count < self.config.payer_min_claims || breakdown.denied == 0 {
                continue;
            }
            let rate = breakdown.denial_rate();
            let severity = if rate >= population * self.config.payer_critical_multiplier {
                Severity::High
            } else if rate >= population * self.config.payer_rate_multiplier {
                Severity::Medium
            } else {
                continue;
            };

            findings.push(Pattern {
                kind: PatternKind::PayerDenialRate,
                severity,
                title: format!("Elevated denial rate for {}", payer),
                description: format!(
                    "{} denies {} of claims versus {} across all payers",
                    payer,
                    percent(rate),
                    percent(population)
                ),
                recommended_action: format!(
                    "Audit {}'s payer-specific billing and authorization requirements",
                    payer
                ),
                subject: Some(payer.clone()),
            });
        }
    }

    fn category_concentration(&self, stats: &ClaimStats, findings: &mut Vec<Pattern>) {
        let categorized = stats.categorized_denials();
        if categorized == 0 {
            return;
        }

        for (category, count) in &stats.by_denial_category {
            if *count < self.config.category_min_denials {
                continue;
            }
            let share = Decimal::from(*count) / Decimal::from(categorized);
            let severity = if share >= self.config.category_critical_share {
                Severity::High
            } else if share >= self.config.category_share {
                Severity::Medium
            } else {
                continue;
            };

            findings.push(Pattern {
                kind: PatternKind::DenialCategoryConcentration,
                severity,
                title: format!("{} denials dominate", category.label()),
                description: format!(
                    "{} of {} categorised denials ({}) are {}",
                    count,
                    categorized,
                    percent(share),
                    category.label().to_lowercase()
                ),
                recommended_action: format!(
                    "Target {} checks in pre-submission review",
                    category.label().to_lowercase()
                ),
                subject: Some(category.label().to_string()),
            });
        }
    }

    fn high_risk_concentration(&self, stats: &ClaimStats, findings: &mut Vec<Pattern>) {
        let high = stats.by_risk_level.get(&RiskLevel::High).copied().unwrap_or(0);
        if high == 0 {
            return;
        }
        let share = Decimal::from(high) / Decimal::from(stats.total);
        if share < self.config.high_risk_share {
            return;
        }

        findings.push(Pattern {
            kind: PatternKind::HighRiskConcentration,
            severity: Severity::Medium,
            title: "Many high-risk claims".to_string(),
            description: format!(
                "{} of {} claims ({}) score as high denial risk",
                high,
                stats.total,
                percent(share)
            ),
            recommended_action: "Resolve missing codes and identifiers on high-risk claims before submission".to_string(),
            subject: None,
        });
    }

    fn recurring_factor(&self, claims: &[Claim], findings: &mut Vec<Pattern>) {
        if claims.is_empty() {
            return;
        }

        // First-seen order breaks ties between equally common factors.
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for claim in claims {
            for factor in &claim.risk_factors {
                let count = counts.entry(factor.label.as_str()).or_insert(0);
                if *count == 0 {
                    order.push(factor.label.as_str());
                }
                *count += 1;
            }
        }

        let mut top: Option<(&str, usize)> = None;
        for label in order {
            let count = counts[label];
            if top.map_or(true, |(_, best)| count > best) {
                top = Some((label, count));
            }
        }

        let Some((label, count)) = top else {
            return;
        };
        let share = Decimal::from(count) / Decimal::from(claims.len());
        if count < self.config.recurring_factor_min_claims || share < self.config.recurring_factor_share {
            return;
        }

        findings.push(Pattern {
            kind: PatternKind::RecurringRiskFactor,
            severity: Severity::Low,
            title: format!("Recurring risk factor: {}", label),
            description: format!(
                "{} of {} claims ({}) carry the \"{}\" risk factor",
                count,
                claims.len(),
                percent(share),
                label
            ),
            recommended_action: "Fix the upstream intake step that leaves this field incomplete".to_string(),
            subject: Some(label.to_string()),
        });
    }
}

fn percent(fraction: Decimal) -> String {
    format!("{}%", (fraction * dec!(100)).round_dp(1).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::DenialCategory;
    use crate::status::ClaimStatus;

    fn claim(payer: &str, status: ClaimStatus) -> Claim {
        let mut claim = Claim::new("CLM-P");
        claim.payer.name = payer.to_string();
        claim.status = status;
        claim
    }

    #[test]
    fn test_empty_population_has_no_findings() {
        let detector = PatternDetector::default();
        assert!(detector.detect(&ClaimStats::default()).is_empty());
    }

    #[test]
    fn test_healthy_population_has_no_findings() {
        let claims: Vec<Claim> = (0..20).map(|_| claim("Aetna", ClaimStatus::Paid)).collect();
        let stats = ClaimStats::from_claims(&claims);
        assert!(PatternDetector::default().detect(&stats).is_empty());
    }

    #[test]
    fn test_denial_rate_severity_tiers() {
        let mut claims: Vec<Claim> = (0..9).map(|_| claim("A", ClaimStatus::Paid)).collect();
        claims.push(claim("A", ClaimStatus::Denied));
        let detector = PatternDetector::default();

        let findings = detector.detect(&ClaimStats::from_claims(&claims));
        assert_eq!(findings[0].kind, PatternKind::DenialRate);
        assert_eq!(findings[0].severity, Severity::Medium);

        claims.push(claim("A", ClaimStatus::Denied));
        claims.push(claim("A", ClaimStatus::PartiallyDenied));
        let findings = detector.detect(&ClaimStats::from_claims(&claims));
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_payer_outlier() {
        let mut claims = Vec::new();
        for _ in 0..15 {
            claims.push(claim("Aetna", ClaimStatus::Paid));
        }
        for _ in 0..3 {
            claims.push(claim("Humana", ClaimStatus::Denied));
        }
        for _ in 0..2 {
            claims.push(claim("Humana", ClaimStatus::Paid));
        }
        let findings = PatternDetector::default().detect(&ClaimStats::from_claims(&claims));

        let payer = findings
            .iter()
            .find(|f| f.kind == PatternKind::PayerDenialRate)
            .expect("payer finding");
        assert_eq!(payer.subject.as_deref(), Some("Humana"));
        assert_eq!(payer.severity, Severity::High);
    }

    #[test]
    fn test_small_payers_are_ignored() {
        let config = PatternConfig {
            payer_min_claims: 10,
            ..Default::default()
        };
        let mut claims: Vec<Claim> = (0..15).map(|_| claim("Aetna", ClaimStatus::Paid)).collect();
        claims.extend((0..3).map(|_| claim("Humana", ClaimStatus::Denied)));

        let findings = PatternDetector::new(config).detect(&ClaimStats::from_claims(&claims));
        assert!(findings.iter().all(|f| f.kind != PatternKind::PayerDenialRate));
    }

    #[test]
    fn test_category_concentration() {
        let mut claims = Vec::new();
        for category in [
            DenialCategory::Coding,
            DenialCategory::Coding,
            DenialCategory::Coding,
            DenialCategory::Eligibility,
        ] {
            let mut denied = claim("A", ClaimStatus::Denied);
            denied.denial.category = Some(category);
            claims.push(denied);
        }
        let findings = PatternDetector::default().detect(&ClaimStats::from_claims(&claims));

        let concentration = findings
            .iter()
            .find(|f| f.kind == PatternKind::DenialCategoryConcentration)
            .expect("category finding");
        assert_eq!(concentration.severity, Severity::High);
        assert_eq!(concentration.subject.as_deref(), Some("Coding"));
    }

    #[test]
    fn test_findings_sorted_by_severity_with_stable_ties() {
        let mut claims = Vec::new();
        for _ in 0..4 {
            let mut c = claim("A", ClaimStatus::Draft);
            c.risk_score = Some(75);
            c.risk_factors = crate::risk::score_claim(&c).factors;
            claims.push(c);
        }
        let stats = ClaimStats::from_claims(&claims);
        let findings = PatternDetector::default().detect_with_claims(&stats, &claims);

        let kinds: Vec<_> = findings.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![PatternKind::HighRiskConcentration, PatternKind::RecurringRiskFactor]
        );
        assert_eq!(findings[1].subject.as_deref(), Some("Missing procedure codes"));
        assert!(findings.windows(2).all(|w| w[0].severity >= w[1].severity));
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(dec!(0.25)), "25%");
        assert_eq!(percent(Decimal::ONE / Decimal::from(3)), "33.3%");
    }

    #[test]
    fn test_config_partial_override() {
        let config: PatternConfig =
            serde_json::from_str(r#"{ "payer_min_claims": 12 }"#).unwrap();
        assert_eq!(config.payer_min_claims, 12);
        assert_eq!(config.critical_denial_rate, dec!(0.20));
    }
}
