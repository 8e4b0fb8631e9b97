//! Claims Domain Ports
//!
//! The claims core reads and writes claims through [`ClaimRepository`] and
//! hands every activity event to an [`ActivityLog`]. Both are async traits so
//! adapters can sit on a database, an external billing system, or memory.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_claims::ports::memory::{InMemoryActivityLog, InMemoryClaimRepository};
//! use domain_claims::service::ClaimService;
//!
//! let service = ClaimService::new(
//!     Arc::new(InMemoryClaimRepository::new()),
//!     Arc::new(InMemoryActivityLog::new()),
//! );
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DateWindow, DomainPort, OperationMetadata, OrganizationId, PortError};

use crate::activity::ActivityEvent;
use crate::claim::Claim;
use crate::risk::RiskLevel;
use crate::status::ClaimStatus;

/// Filter for listing claims
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
    pub organization_id: Option<OrganizationId>,
    pub status: Option<ClaimStatus>,
    /// Case-insensitive exact match on payer name
    pub payer: Option<String>,
    pub risk_level: Option<RiskLevel>,
    /// Applied to each claim's reference date
    pub window: DateWindow,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ClaimQuery {
    /// Every claim
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_status(status: ClaimStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn in_window(window: DateWindow) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    /// Adds pagination to the query
    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Returns true if `claim` passes every filter (pagination aside)
    pub fn matches(&self, claim: &Claim) -> bool {
        if self.organization_id.is_some() && claim.organization_id != self.organization_id {
            return false;
        }
        if let Some(status) = self.status {
            if claim.status != status {
                return false;
            }
        }
        if let Some(ref payer) = self.payer {
            if !claim.payer.name.trim().eq_ignore_ascii_case(payer.trim()) {
                return false;
            }
        }
        if let Some(level) = self.risk_level {
            if claim.risk_level != Some(level) {
                return false;
            }
        }
        self.window.contains(claim.reference_date())
    }
}

/// Claim storage
#[async_trait]
pub trait ClaimRepository: DomainPort {
    /// Retrieves a claim by ID, or `PortError::NotFound`
    async fn get_claim(
        &self,
        id: ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Claim, PortError>;

    /// Claims matching the query, oldest first
    async fn find_claims(
        &self,
        query: ClaimQuery,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Claim>, PortError>;

    /// Looks up a claim by its number within an organization
    async fn find_by_claim_number(
        &self,
        organization_id: Option<OrganizationId>,
        claim_number: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<Option<Claim>, PortError>;

    /// Inserts or replaces a claim
    async fn save_claim(
        &self,
        claim: Claim,
        metadata: Option<OperationMetadata>,
    ) -> Result<Claim, PortError>;

    /// Retrieves a claim by ID, mapping absence to `None`
    async fn try_get_claim(
        &self,
        id: ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Option<Claim>, PortError> {
        match self.get_claim(id, metadata).await {
            Ok(claim) => Ok(Some(claim)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }
}

/// Audit trail sink
#[async_trait]
pub trait ActivityLog: DomainPort {
    /// Persists one event
    async fn record(&self, event: ActivityEvent) -> Result<(), PortError>;

    /// Events for a claim, oldest first
    async fn history(&self, claim_id: ClaimId) -> Result<Vec<ActivityEvent>, PortError>;
}

/// In-memory adapters for tests and single-process deployments
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Claim repository backed by a `HashMap`
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimRepository {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
    }

    impl InMemoryClaimRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the repository
        pub async fn with_claims(claims: Vec<Claim>) -> Self {
            let repository = Self::new();
            {
                let mut stored = repository.claims.write().await;
                for claim in claims {
                    stored.insert(claim.id, claim);
                }
            }
            repository
        }

        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }
    }

    impl DomainPort for InMemoryClaimRepository {}

    #[async_trait]
    impl ClaimRepository for InMemoryClaimRepository {
        async fn get_claim(
            &self,
            id: ClaimId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn find_claims(
            &self,
            query: ClaimQuery,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Claim>, PortError> {
            let claims = self.claims.read().await;
            let mut results: Vec<Claim> = claims
                .values()
                .filter(|claim| query.matches(claim))
                .cloned()
                .collect();
            results.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

            let offset = query.offset.unwrap_or(0) as usize;
            let limit = query.limit.map_or(usize::MAX, |limit| limit as usize);
            Ok(results.into_iter().skip(offset).take(limit).collect())
        }

        async fn find_by_claim_number(
            &self,
            organization_id: Option<OrganizationId>,
            claim_number: &str,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Option<Claim>, PortError> {
            let claims = self.claims.read().await;
            Ok(claims
                .values()
                .find(|claim| {
                    claim.organization_id == organization_id && claim.claim_number == claim_number
                })
                .cloned())
        }

        async fn save_claim(
            &self,
            claim: Claim,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Claim, PortError> {
            let mut claims = self.claims.write().await;
            let number = claim.claim_number.trim();
            if !number.is_empty() {
                let taken = claims.values().any(|other| {
                    other.id != claim.id
                        && other.organization_id == claim.organization_id
                        && other.claim_number.trim() == number
                });
                if taken {
                    return Err(PortError::conflict(format!(
                        "claim number {} is already stored",
                        number
                    )));
                }
            }
            claims.insert(claim.id, claim.clone());
            Ok(claim)
        }
    }

    /// Activity log that keeps events per claim in arrival order
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryActivityLog {
        events: Arc<RwLock<HashMap<ClaimId, Vec<ActivityEvent>>>>,
    }

    impl InMemoryActivityLog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of events recorded across all claims
        pub async fn total_events(&self) -> usize {
            self.events.read().await.values().map(Vec::len).sum()
        }
    }

    impl DomainPort for InMemoryActivityLog {}

    #[async_trait]
    impl ActivityLog for InMemoryActivityLog {
        async fn record(&self, event: ActivityEvent) -> Result<(), PortError> {
            self.events
                .write()
                .await
                .entry(event.claim_id)
                .or_default()
                .push(event);
            Ok(())
        }

        async fn history(&self, claim_id: ClaimId) -> Result<Vec<ActivityEvent>, PortError> {
            Ok(self
                .events
                .read()
                .await
                .get(&claim_id)
                .cloned()
                .unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::*;
    use super::*;
    use crate::activity::ActivityAction;

    fn claim(number: &str, payer: &str, status: ClaimStatus) -> Claim {
        let mut claim = Claim::new(number);
        claim.payer.name = payer.to_string();
        claim.status = status;
        claim
    }

    #[tokio::test]
    async fn test_get_missing_claim() {
        let repository = InMemoryClaimRepository::new();
        let id = ClaimId::new_v7();

        let err = repository.get_claim(id, None).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(repository.try_get_claim(id, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_second_claim_with_same_number() {
        let repository = InMemoryClaimRepository::new();
        let first = repository
            .save_claim(claim("CLM-9", "Aetna", ClaimStatus::Draft), None)
            .await
            .unwrap();

        let err = repository
            .save_claim(claim("CLM-9", "Cigna", ClaimStatus::Draft), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));

        let mut resaved = first.clone();
        resaved.status = ClaimStatus::Submitted;
        assert!(repository.save_claim(resaved, None).await.is_ok());
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_filters_and_paginates() {
        let repository = InMemoryClaimRepository::with_claims(vec![
            claim("CLM-1", "Aetna", ClaimStatus::Denied),
            claim("CLM-2", "aetna", ClaimStatus::Paid),
            claim("CLM-3", "Cigna", ClaimStatus::Denied),
        ])
        .await;

        let denied = repository
            .find_claims(ClaimQuery::by_status(ClaimStatus::Denied), None)
            .await
            .unwrap();
        assert_eq!(denied.len(), 2);

        let aetna = ClaimQuery {
            payer: Some("AETNA".to_string()),
            ..Default::default()
        };
        assert_eq!(repository.find_claims(aetna, None).await.unwrap().len(), 2);

        let page = repository
            .find_claims(ClaimQuery::all().paginate(1, 2), None)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_claim_number_scoped_by_organization() {
        let org = OrganizationId::new_v7();
        let mut scoped = claim("CLM-9", "Aetna", ClaimStatus::Draft);
        scoped.organization_id = Some(org);
        let repository = InMemoryClaimRepository::with_claims(vec![scoped]).await;

        assert!(repository
            .find_by_claim_number(Some(org), "CLM-9", None)
            .await
            .unwrap()
            .is_some());
        assert!(repository
            .find_by_claim_number(None, "CLM-9", None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_activity_history_in_order() {
        let log = InMemoryActivityLog::new();
        let id = ClaimId::new_v7();
        log.record(ActivityEvent::new(id, ActivityAction::Created, None, Some("draft".into())))
            .await
            .unwrap();
        log.record(ActivityEvent::new(
            id,
            ActivityAction::StatusChanged,
            Some("draft".into()),
            Some("submitted".into()),
        ))
        .await
        .unwrap();

        let history = log.history(id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, ActivityAction::Created);
        assert_eq!(history[1].new_value.as_deref(), Some("submitted"));
        assert_eq!(log.total_events().await, 2);
    }
}
