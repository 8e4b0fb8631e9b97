//! Claims Lifecycle and Denial Risk Domain
//!
//! This crate holds the healthcare claims core: the claim record, its status
//! state machine, rule-based denial risk scoring, population statistics and
//! pattern detection. The core functions are pure; [`service::ClaimService`]
//! connects them to storage and the audit trail through the port traits in
//! [`ports`].
//!
//! # Claim Lifecycle
//!
//! ```text
//! draft -> pending_review -> submitted -> in_process -> paid
//!                                            |
//!                            denied / partially_denied -> appealed -> appeal_won / appeal_lost
//! ```
//!
//! # Risk Bands
//!
//! ```text
//! 0 ........ 29 | 30 ........ 59 | 60 ........ 100
//!      low      |     medium     |      high
//! ```

pub mod activity;
pub mod claim;
pub mod enrichment;
pub mod error;
pub mod patterns;
pub mod ports;
pub mod risk;
pub mod service;
pub mod stats;
pub mod status;
pub mod validation;

pub use activity::{ActivityAction, ActivityEvent};
pub use claim::{
    Claim, ClaimDraft, ClaimPriority, ClaimSource, ClaimUpdate, DenialCategory, DenialDetail,
    Patient, Payer, PlanType, Provider,
};
pub use enrichment::{enrich_assessment, AdvisoryInsights, EnrichedAssessment, RiskAdvisor};
pub use error::ClaimError;
pub use patterns::{Pattern, PatternConfig, PatternDetector, PatternKind, Severity};
pub use ports::{ActivityLog, ClaimQuery, ClaimRepository};
pub use risk::{score_claim, ImpactTier, RiskAssessment, RiskFactor, RiskLevel};
pub use service::{ClaimService, PatternReport};
pub use stats::{ClaimStats, PayerBreakdown};
pub use status::{ClaimPath, ClaimStatus, ProgressTrack, TransitionTable, TransitionVerdict};
pub use validation::{ClaimValidator, ValidationResult};
