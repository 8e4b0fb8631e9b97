//! Claims application service
//!
//! `ClaimService` wires the pure core (scoring, aggregation, pattern
//! detection, transition checks) to the storage and audit collaborators.
//! Every commit follows the same order:
//!
//! 1. Apply the change to an in-memory copy
//! 2. Re-score and validate the copy
//! 3. Save it
//! 4. Emit the activity event(s)
//!
//! A failure before step 3 leaves the stored claim untouched. A failure in
//! step 4 is logged and does not fail the operation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use core_kernel::{ClaimId, OperationMetadata, PortError};

use crate::activity::{ActivityAction, ActivityEvent};
use crate::claim::{Claim, ClaimDraft, ClaimUpdate};
use crate::enrichment::{enrich_assessment, EnrichedAssessment, RiskAdvisor};
use crate::error::ClaimError;
use crate::patterns::{Pattern, PatternConfig, PatternDetector};
use crate::ports::{ActivityLog, ClaimQuery, ClaimRepository};
use crate::risk::score_claim;
use crate::stats::ClaimStats;
use crate::status::{ClaimStatus, ProgressTrack, TransitionTable};
use crate::validation::ClaimValidator;

/// Statistics together with the findings derived from them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternReport {
    pub stats: ClaimStats,
    pub patterns: Vec<Pattern>,
}

/// Orchestrates claim operations over the collaborator ports
pub struct ClaimService {
    repository: Arc<dyn ClaimRepository>,
    activity_log: Arc<dyn ActivityLog>,
    advisor: Option<Arc<dyn RiskAdvisor>>,
    transitions: TransitionTable,
    detector: PatternDetector,
}

impl ClaimService {
    /// Creates a service with the permissive transition table and default
    /// pattern thresholds
    pub fn new(repository: Arc<dyn ClaimRepository>, activity_log: Arc<dyn ActivityLog>) -> Self {
        Self {
            repository,
            activity_log,
            advisor: None,
            transitions: TransitionTable::default(),
            detector: PatternDetector::default(),
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn RiskAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_transitions(mut self, transitions: TransitionTable) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn with_pattern_config(mut self, config: PatternConfig) -> Self {
        self.detector = PatternDetector::new(config);
        self
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn get_claim(&self, id: ClaimId) -> Result<Claim, ClaimError> {
        self.load(id, None).await
    }

    pub async fn list_claims(&self, query: ClaimQuery) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.repository.find_claims(query, None).await?)
    }

    /// Progress steps for the claim's current status
    pub async fn progress(&self, id: ClaimId) -> Result<ProgressTrack, ClaimError> {
        let claim = self.load(id, None).await?;
        Ok(ProgressTrack::for_status(claim.status))
    }

    /// Audit trail of a claim, oldest first
    pub async fn activity(&self, id: ClaimId) -> Result<Vec<ActivityEvent>, ClaimError> {
        self.load(id, None).await?;
        Ok(self.activity_log.history(id).await?)
    }

    /// Aggregates the claims selected by `query`
    ///
    /// Pagination on the query is ignored; statistics always cover the
    /// whole filtered population.
    pub async fn claim_stats(&self, query: ClaimQuery) -> Result<ClaimStats, ClaimError> {
        let claims = self.population(query).await?;
        Ok(ClaimStats::from_claims(&claims))
    }

    /// Aggregates and scans the claims selected by `query`
    pub async fn detect_patterns(&self, query: ClaimQuery) -> Result<PatternReport, ClaimError> {
        let claims = self.population(query).await?;
        let stats = ClaimStats::from_claims(&claims);
        let patterns = self.detector.detect_with_claims(&stats, &claims);
        debug!(total = stats.total, findings = patterns.len(), "Pattern scan complete");

        Ok(PatternReport { stats, patterns })
    }

    /// Scores a stored claim without changing it, with advisory insights
    /// when an advisor is configured
    pub async fn assess_risk(&self, id: ClaimId) -> Result<EnrichedAssessment, ClaimError> {
        let claim = self.load(id, None).await?;
        let assessment = score_claim(&claim);
        Ok(enrich_assessment(&claim, assessment, self.advisor.as_deref()).await)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Materializes, scores, validates and stores a new claim
    pub async fn create_claim(
        &self,
        draft: ClaimDraft,
        metadata: OperationMetadata,
    ) -> Result<Claim, ClaimError> {
        let mut claim = draft.into_claim()?;
        claim.apply_assessment(&score_claim(&claim));
        self.validate(&claim)?;
        self.ensure_unique_number(&claim, &metadata).await?;

        let claim = self.repository.save_claim(claim, Some(metadata.clone())).await?;
        info!(
            claim_id = %claim.id,
            claim_number = %claim.claim_number,
            score = ?claim.risk_score,
            "Claim created"
        );

        let event = ActivityEvent::new(
            claim.id,
            ActivityAction::Created,
            None,
            Some(claim.status.as_str().to_string()),
        )
        .by(metadata.actor());
        self.emit(event).await;

        Ok(claim)
    }

    /// Applies a partial edit; the claim is re-scored before saving
    pub async fn update_claim(
        &self,
        id: ClaimId,
        update: ClaimUpdate,
        metadata: OperationMetadata,
    ) -> Result<Claim, ClaimError> {
        let mut claim = self.load(id, Some(&metadata)).await?;
        let previous_number = claim.claim_number.clone();

        let changed = update.apply_to(&mut claim)?;
        if changed.is_empty() {
            return Ok(claim);
        }
        claim.apply_assessment(&score_claim(&claim));
        self.validate(&claim)?;
        if claim.claim_number != previous_number {
            self.ensure_unique_number(&claim, &metadata).await?;
        }

        let claim = self.repository.save_claim(claim, Some(metadata.clone())).await?;
        info!(claim_id = %claim.id, fields = ?changed, "Claim updated");

        let event = ActivityEvent::new(
            claim.id,
            ActivityAction::Updated,
            None,
            Some(changed.join(",")),
        )
        .by(metadata.actor());
        self.emit(event).await;

        Ok(claim)
    }

    /// Moves a claim to `target` if the transition table allows it
    pub async fn change_status(
        &self,
        id: ClaimId,
        target: ClaimStatus,
        metadata: OperationMetadata,
    ) -> Result<Claim, ClaimError> {
        let mut claim = self.load(id, Some(&metadata)).await?;
        let from = claim.status;

        let event = claim
            .change_status(target, &self.transitions)?
            .by(metadata.actor());
        self.validate(&claim)?;

        let claim = self.repository.save_claim(claim, Some(metadata)).await?;
        info!(claim_id = %claim.id, from = %from, to = %target, "Claim status changed");
        self.emit(event).await;

        Ok(claim)
    }

    /// Re-scores a claim and stores the fresh assessment
    pub async fn recompute_risk(
        &self,
        id: ClaimId,
        metadata: OperationMetadata,
    ) -> Result<Claim, ClaimError> {
        let mut claim = self.load(id, Some(&metadata)).await?;
        let previous = claim.risk_score;

        let assessment = score_claim(&claim);
        claim.apply_assessment(&assessment);

        let claim = self.repository.save_claim(claim, Some(metadata.clone())).await?;
        info!(
            claim_id = %claim.id,
            score = assessment.score,
            level = assessment.level.as_str(),
            "Risk recomputed"
        );

        let event = ActivityEvent::new(
            claim.id,
            ActivityAction::RiskRecomputed,
            previous.map(|score| score.to_string()),
            Some(assessment.score.to_string()),
        )
        .by(metadata.actor());
        self.emit(event).await;

        Ok(claim)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn load(
        &self,
        id: ClaimId,
        metadata: Option<&OperationMetadata>,
    ) -> Result<Claim, ClaimError> {
        self.repository
            .get_claim(id, metadata.cloned())
            .await
            .map_err(|error| not_found_as_claim_error(error, id))
    }

    async fn population(&self, mut query: ClaimQuery) -> Result<Vec<Claim>, ClaimError> {
        query.limit = None;
        query.offset = None;
        Ok(self.repository.find_claims(query, None).await?)
    }

    fn validate(&self, claim: &Claim) -> Result<(), ClaimError> {
        let warnings = ClaimValidator::validate(claim).into_result()?;
        for warning in warnings {
            warn!(claim_id = %claim.id, "{}", warning);
        }
        Ok(())
    }

    async fn ensure_unique_number(
        &self,
        claim: &Claim,
        metadata: &OperationMetadata,
    ) -> Result<(), ClaimError> {
        let existing = self
            .repository
            .find_by_claim_number(claim.organization_id, &claim.claim_number, Some(metadata.clone()))
            .await?;
        match existing {
            Some(other) if other.id != claim.id => {
                Err(ClaimError::DuplicateClaimNumber(claim.claim_number.clone()))
            }
            _ => Ok(()),
        }
    }

    async fn emit(&self, event: ActivityEvent) {
        let claim_id = event.claim_id;
        let action = event.action;
        if let Err(error) = self.activity_log.record(event).await {
            warn!(
                claim_id = %claim_id,
                action = ?action,
                error = %error,
                "Failed to record activity event"
            );
        }
    }
}

fn not_found_as_claim_error(error: PortError, id: ClaimId) -> ClaimError {
    if error.is_not_found() {
        ClaimError::ClaimNotFound(id.to_string())
    } else {
        ClaimError::Port(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::memory::{InMemoryActivityLog, InMemoryClaimRepository};
    use async_trait::async_trait;
    use core_kernel::DomainPort;

    fn draft(number: &str) -> ClaimDraft {
        let mut draft = ClaimDraft {
            claim_number: Some(number.to_string()),
            ..Default::default()
        };
        draft.patient.name = "Avery Quinn".to_string();
        draft.payer.name = "Blue Shield".to_string();
        draft
    }

    fn service() -> (ClaimService, InMemoryActivityLog) {
        let log = InMemoryActivityLog::new();
        let service = ClaimService::new(
            Arc::new(InMemoryClaimRepository::new()),
            Arc::new(log.clone()),
        );
        (service, log)
    }

    struct BrokenLog;

    impl DomainPort for BrokenLog {}

    #[async_trait]
    impl ActivityLog for BrokenLog {
        async fn record(&self, _event: ActivityEvent) -> Result<(), PortError> {
            Err(PortError::unavailable("audit-store"))
        }

        async fn history(&self, _claim_id: ClaimId) -> Result<Vec<ActivityEvent>, PortError> {
            Err(PortError::unavailable("audit-store"))
        }
    }

    #[tokio::test]
    async fn test_create_scores_and_logs() {
        let (service, log) = service();
        let claim = service
            .create_claim(draft("CLM-S1"), OperationMetadata::initiated_by("biller"))
            .await
            .unwrap();

        assert_eq!(claim.risk_score, Some(75));
        let history = service.activity(claim.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, ActivityAction::Created);
        assert_eq!(history[0].actor.as_deref(), Some("biller"));
        assert_eq!(log.total_events().await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_identity() {
        let (service, log) = service();
        let err = service
            .create_claim(ClaimDraft::default(), OperationMetadata::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ClaimError::Validation { .. }));
        assert_eq!(log.total_events().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_claim_number() {
        let (service, _) = service();
        service
            .create_claim(draft("CLM-S2"), OperationMetadata::default())
            .await
            .unwrap();
        let err = service
            .create_claim(draft("CLM-S2"), OperationMetadata::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::DuplicateClaimNumber(_)));
    }

    #[tokio::test]
    async fn test_status_change_emits_one_event() {
        let (service, _) = service();
        let claim = service
            .create_claim(draft("CLM-S3"), OperationMetadata::default())
            .await
            .unwrap();

        let updated = service
            .change_status(claim.id, ClaimStatus::Denied, OperationMetadata::initiated_by("u1"))
            .await
            .unwrap();
        assert_eq!(updated.status, ClaimStatus::Denied);

        let history = service.activity(claim.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].previous_value.as_deref(), Some("draft"));
        assert_eq!(history[1].new_value.as_deref(), Some("denied"));
    }

    #[tokio::test]
    async fn test_strict_table_refuses_and_keeps_stored_claim() {
        let (service, _) = service();
        let service = service.with_transitions(TransitionTable::standard_workflow());
        let claim = service
            .create_claim(draft("CLM-S4"), OperationMetadata::default())
            .await
            .unwrap();

        let err = service
            .change_status(claim.id, ClaimStatus::Paid, OperationMetadata::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::TransitionNotAllowed { .. }));
        assert_eq!(service.get_claim(claim.id).await.unwrap().status, ClaimStatus::Draft);
    }

    #[tokio::test]
    async fn test_update_rescores() {
        let (service, _) = service();
        let claim = service
            .create_claim(draft("CLM-S5"), OperationMetadata::default())
            .await
            .unwrap();

        let update = ClaimUpdate {
            procedure_codes: Some(vec!["99214".to_string()]),
            diagnosis_codes: Some(vec!["I10".to_string()]),
            ..Default::default()
        };
        let updated = service
            .update_claim(claim.id, update, OperationMetadata::default())
            .await
            .unwrap();
        assert_eq!(updated.risk_score, Some(25));
        assert_eq!(updated.risk_factors.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_claim_is_not_found() {
        let (service, _) = service();
        let err = service.get_claim(ClaimId::new_v7()).await.unwrap_err();
        assert!(matches!(err, ClaimError::ClaimNotFound(_)));
    }

    #[tokio::test]
    async fn test_activity_log_failure_is_not_fatal() {
        let service = ClaimService::new(Arc::new(InMemoryClaimRepository::new()), Arc::new(BrokenLog));
        let claim = service
            .create_claim(draft("CLM-S6"), OperationMetadata::default())
            .await
            .unwrap();

        let moved = service
            .change_status(claim.id, ClaimStatus::Submitted, OperationMetadata::default())
            .await
            .unwrap();
        assert_eq!(moved.status, ClaimStatus::Submitted);
    }

    #[tokio::test]
    async fn test_recompute_risk_records_previous_score() {
        let (service, _) = service();
        let claim = service
            .create_claim(draft("CLM-S7"), OperationMetadata::default())
            .await
            .unwrap();

        service
            .recompute_risk(claim.id, OperationMetadata::default())
            .await
            .unwrap();
        let history = service.activity(claim.id).await.unwrap();
        let last = history.last().unwrap();
        assert_eq!(last.action, ActivityAction::RiskRecomputed);
        assert_eq!(last.previous_value.as_deref(), Some("75"));
        assert_eq!(last.new_value.as_deref(), Some("75"));
    }

    #[tokio::test]
    async fn test_stats_ignore_pagination() {
        let (service, _) = service();
        for number in ["CLM-A", "CLM-B", "CLM-C"] {
            service
                .create_claim(draft(number), OperationMetadata::default())
                .await
                .unwrap();
        }
        let stats = service
            .claim_stats(ClaimQuery::all().paginate(1, 0))
            .await
            .unwrap();
        assert_eq!(stats.total, 3);
    }
}
