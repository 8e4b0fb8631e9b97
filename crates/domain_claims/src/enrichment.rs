//! Advisory enrichment of risk assessments
//!
//! An external advisor may add free-text insights on top of the deterministic
//! score. The base assessment is produced first and never changes; the
//! advisor's output is attached alongside it. When the advisor is missing or
//! fails, the caller still gets the base assessment plus a notice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{DomainPort, PortError};
use crate::claim::Claim;
use crate::risk::RiskAssessment;

/// Free-text guidance from an advisory model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryInsights {
    pub summary: String,
    pub recommendations: Vec<String>,
    /// Name of the advisor that produced the insights
    pub source: String,
}

/// External advisory collaborator
#[async_trait]
pub trait RiskAdvisor: DomainPort {
    /// Produces insights for a claim and its base assessment
    async fn advise(
        &self,
        claim: &Claim,
        assessment: &RiskAssessment,
    ) -> Result<AdvisoryInsights, PortError>;
}

/// Base assessment with optional advisory output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedAssessment {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub insights: Option<AdvisoryInsights>,
    /// Set when enrichment was requested but could not be provided
    pub notice: Option<String>,
}

impl EnrichedAssessment {
    /// Wraps a base assessment with no enrichment
    pub fn base(assessment: RiskAssessment) -> Self {
        Self {
            assessment,
            insights: None,
            notice: None,
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.insights.is_some()
    }
}

/// Asks the advisor, if any, to enrich `assessment`
///
/// Never fails: advisor errors become a notice on the result.
pub async fn enrich_assessment(
    claim: &Claim,
    assessment: RiskAssessment,
    advisor: Option<&dyn RiskAdvisor>,
) -> EnrichedAssessment {
    let Some(advisor) = advisor else {
        return EnrichedAssessment {
            notice: Some("Advisory insights are disabled; showing the rule-based assessment".to_string()),
            ..EnrichedAssessment::base(assessment)
        };
    };

    match advisor.advise(claim, &assessment).await {
        Ok(insights) => EnrichedAssessment {
            insights: Some(insights),
            ..EnrichedAssessment::base(assessment)
        },
        Err(error) => {
            warn!(
                claim_id = %claim.id,
                error = %error,
                transient = error.is_transient(),
                "Risk advisor failed, falling back to rule-based assessment"
            );
            EnrichedAssessment {
                notice: Some("Advisory insights are temporarily unavailable; showing the rule-based assessment".to_string()),
                ..EnrichedAssessment::base(assessment)
            }
        }
    }
}
