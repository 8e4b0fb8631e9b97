//! Activity events for the audit trail
//!
//! Every claim mutation produces an event that the activity-log collaborator
//! persists. The core only builds the event; durability is the log's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ActivityId, ClaimId};

/// What happened to the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    StatusChanged,
    RiskRecomputed,
}

/// A single audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: ActivityId,
    pub claim_id: ClaimId,
    pub action: ActivityAction,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub actor: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Creates an event stamped with the current time
    pub fn new(
        claim_id: ClaimId,
        action: ActivityAction,
        previous_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            id: ActivityId::new_v7(),
            claim_id,
            action,
            previous_value,
            new_value,
            actor: None,
            timestamp: Utc::now(),
        }
    }

    /// Attributes the event to an actor
    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}
