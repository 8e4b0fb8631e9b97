//! Claim status state machine
//!
//! A claim moves along one of two paths:
//!
//! ```text
//! standard: draft -> pending_review -> submitted -> in_process -> paid
//! denial:   ... -> denied | partially_denied -> appealed -> appeal_won | appeal_lost
//! ```
//!
//! The default [`TransitionTable`] allows every status to move to every
//! other status. Reopened claims and manual corrections are routine, and the
//! activity log records each change, so the table only guarantees that the
//! target is a known status. Stricter tables are opt-in.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// Lifecycle status of a claim
///
/// The snake_case string forms are a stable contract with presentation
/// layers that key label and colour tables off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Draft,
    PendingReview,
    Submitted,
    InProcess,
    Denied,
    PartiallyDenied,
    Paid,
    Appealed,
    AppealWon,
    AppealLost,
    Closed,
}

/// Which workflow path a status belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPath {
    Standard,
    Denial,
}

impl ClaimStatus {
    /// Every status, in declaration order
    pub const ALL: [ClaimStatus; 11] = [
        ClaimStatus::Draft,
        ClaimStatus::PendingReview,
        ClaimStatus::Submitted,
        ClaimStatus::InProcess,
        ClaimStatus::Denied,
        ClaimStatus::PartiallyDenied,
        ClaimStatus::Paid,
        ClaimStatus::Appealed,
        ClaimStatus::AppealWon,
        ClaimStatus::AppealLost,
        ClaimStatus::Closed,
    ];

    /// The stable wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "draft",
            ClaimStatus::PendingReview => "pending_review",
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::InProcess => "in_process",
            ClaimStatus::Denied => "denied",
            ClaimStatus::PartiallyDenied => "partially_denied",
            ClaimStatus::Paid => "paid",
            ClaimStatus::Appealed => "appealed",
            ClaimStatus::AppealWon => "appeal_won",
            ClaimStatus::AppealLost => "appeal_lost",
            ClaimStatus::Closed => "closed",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "Draft",
            ClaimStatus::PendingReview => "Pending Review",
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::InProcess => "In Process",
            ClaimStatus::Denied => "Denied",
            ClaimStatus::PartiallyDenied => "Partially Denied",
            ClaimStatus::Paid => "Paid",
            ClaimStatus::Appealed => "Appealed",
            ClaimStatus::AppealWon => "Appeal Won",
            ClaimStatus::AppealLost => "Appeal Lost",
            ClaimStatus::Closed => "Closed",
        }
    }

    /// Colour key used by dashboards
    pub fn color_key(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "gray",
            ClaimStatus::PendingReview => "yellow",
            ClaimStatus::Submitted => "blue",
            ClaimStatus::InProcess => "indigo",
            ClaimStatus::Denied => "red",
            ClaimStatus::PartiallyDenied => "orange",
            ClaimStatus::Paid => "green",
            ClaimStatus::Appealed => "purple",
            ClaimStatus::AppealWon => "emerald",
            ClaimStatus::AppealLost => "rose",
            ClaimStatus::Closed => "slate",
        }
    }

    /// Classifies the status into its workflow path
    pub fn path(&self) -> ClaimPath {
        if self.is_denial_path() {
            ClaimPath::Denial
        } else {
            ClaimPath::Standard
        }
    }

    /// Returns true for statuses reached after a payer rejection
    pub fn is_denial_path(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Denied
                | ClaimStatus::PartiallyDenied
                | ClaimStatus::Appealed
                | ClaimStatus::AppealWon
                | ClaimStatus::AppealLost
        )
    }

    /// Returns true for the statuses counted as denials in statistics
    pub fn is_denied(&self) -> bool {
        matches!(self, ClaimStatus::Denied | ClaimStatus::PartiallyDenied)
    }

    /// Returns true once no further business transitions are expected
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Closed | ClaimStatus::AppealWon | ClaimStatus::AppealLost
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ClaimError::UnknownStatus(s.to_string()))
    }
}

/// Ordered steps for rendering a claim's progress along its path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressTrack {
    pub path: ClaimPath,
    pub steps: Vec<ClaimStatus>,
    /// Index of the current status within `steps`, if it appears there
    pub current: Option<usize>,
}

impl ProgressTrack {
    /// Builds the display sequence appropriate to the status's path
    ///
    /// Denial-path tracks show whichever denial and appeal outcome the claim
    /// actually reached, defaulting to `denied` and `appeal_won`.
    pub fn for_status(status: ClaimStatus) -> Self {
        let path = status.path();
        let steps = match path {
            ClaimPath::Standard => {
                let mut steps = vec![
                    ClaimStatus::Draft,
                    ClaimStatus::PendingReview,
                    ClaimStatus::Submitted,
                    ClaimStatus::InProcess,
                    ClaimStatus::Paid,
                ];
                if status == ClaimStatus::Closed {
                    steps.push(ClaimStatus::Closed);
                }
                steps
            }
            ClaimPath::Denial => {
                let denial = if status == ClaimStatus::PartiallyDenied {
                    ClaimStatus::PartiallyDenied
                } else {
                    ClaimStatus::Denied
                };
                let outcome = if status == ClaimStatus::AppealLost {
                    ClaimStatus::AppealLost
                } else {
                    ClaimStatus::AppealWon
                };
                vec![
                    ClaimStatus::Draft,
                    ClaimStatus::Submitted,
                    ClaimStatus::InProcess,
                    denial,
                    ClaimStatus::Appealed,
                    outcome,
                ]
            }
        };
        let current = steps.iter().position(|step| *step == status);

        Self { path, steps, current }
    }
}

/// Outcome of checking a transition against a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionVerdict {
    Allowed,
    Denied { from: ClaimStatus, to: ClaimStatus },
}

impl TransitionVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, TransitionVerdict::Allowed)
    }
}

/// Inspectable table of permitted status transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    allowed: BTreeMap<ClaimStatus, BTreeSet<ClaimStatus>>,
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::permissive()
    }
}

impl TransitionTable {
    /// A table with no permitted transitions
    pub fn empty() -> Self {
        Self {
            allowed: BTreeMap::new(),
        }
    }

    /// Every status may move to every status
    pub fn permissive() -> Self {
        let all: BTreeSet<ClaimStatus> = ClaimStatus::ALL.into_iter().collect();
        Self {
            allowed: ClaimStatus::ALL
                .into_iter()
                .map(|status| (status, all.clone()))
                .collect(),
        }
    }

    /// The two canonical paths plus closing and reopening
    pub fn standard_workflow() -> Self {
        use ClaimStatus::*;

        let mut table = Self::empty()
            .allow(Draft, PendingReview)
            .allow(PendingReview, Draft)
            .allow(PendingReview, Submitted)
            .allow(Submitted, InProcess)
            .allow(InProcess, Paid)
            .allow(InProcess, Denied)
            .allow(InProcess, PartiallyDenied)
            .allow(Denied, Appealed)
            .allow(PartiallyDenied, Appealed)
            .allow(PartiallyDenied, Paid)
            .allow(Appealed, AppealWon)
            .allow(Appealed, AppealLost)
            .allow(Closed, PendingReview);
        for status in ClaimStatus::ALL {
            if status != Closed {
                table = table.allow(status, Closed);
            }
        }
        table
    }

    /// Adds a permitted transition
    pub fn allow(mut self, from: ClaimStatus, to: ClaimStatus) -> Self {
        self.allowed.entry(from).or_default().insert(to);
        self
    }

    /// Removes a permitted transition
    pub fn forbid(mut self, from: ClaimStatus, to: ClaimStatus) -> Self {
        if let Some(targets) = self.allowed.get_mut(&from) {
            targets.remove(&to);
        }
        self
    }

    /// Checks whether `from -> to` is permitted
    pub fn verdict(&self, from: ClaimStatus, to: ClaimStatus) -> TransitionVerdict {
        let permitted = self
            .allowed
            .get(&from)
            .is_some_and(|targets| targets.contains(&to));
        if permitted {
            TransitionVerdict::Allowed
        } else {
            TransitionVerdict::Denied { from, to }
        }
    }

    /// Targets reachable from a status, in declaration order
    pub fn targets(&self, from: ClaimStatus) -> Vec<ClaimStatus> {
        self.allowed
            .get(&from)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }
}
