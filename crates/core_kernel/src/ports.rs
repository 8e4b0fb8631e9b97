//! Ports and adapters infrastructure
//!
//! The claims core never talks to storage, the audit log, or the advisory
//! model directly. Each of those collaborators sits behind a port trait
//! defined in the domain crate; the types here are shared by every port.
//!
//! ```text
//!        ClaimService (domain_claims)
//!                 │
//!    ┌────────────┼──────────────┐
//!    ▼            ▼              ▼
//! ClaimRepository ActivityLog  RiskAdvisor
//!    │            │              │
//! in-memory /  in-memory /   external model
//! database     audit store   (optional)
//! ```

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// All adapters report failures through this type so the domain can tell
/// a missing record from an unreachable collaborator.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Authentication or authorization failed
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// The collaborator is unavailable or disabled
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a ServiceUnavailable error
    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Timeout { .. } | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared across request handlers, so implementations must be
/// thread-safe.
pub trait DomainPort: Send + Sync + 'static {}

/// Metadata about a port operation for auditing and tracing
#[derive(Debug, Clone, Default)]
pub struct OperationMetadata {
    /// Correlation ID for tracing across systems
    pub correlation_id: Option<String>,
    /// User or system that initiated the operation
    pub initiated_by: Option<String>,
    /// Additional context as key-value pairs
    pub context: HashMap<String, String>,
}

impl OperationMetadata {
    /// Creates metadata attributed to an actor
    pub fn initiated_by(actor: impl Into<String>) -> Self {
        Self {
            initiated_by: Some(actor.into()),
            ..Default::default()
        }
    }

    /// Sets the correlation ID
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Adds context to the metadata
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// The actor name, or `system` when none was supplied
    pub fn actor(&self) -> &str {
        self.initiated_by.as_deref().unwrap_or("system")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Claim", "123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Claim"));
        assert!(error.to_string().contains("123"));
    }

    #[test]
    fn test_port_error_transient() {
        assert!(PortError::unavailable("advisor").is_transient());
        assert!(PortError::Timeout {
            operation: "advise".to_string(),
            duration_ms: 5000,
        }
        .is_transient());
        assert!(!PortError::validation("bad").is_transient());
    }

    #[test]
    fn test_operation_metadata() {
        let metadata = OperationMetadata::initiated_by("biller-7")
            .with_correlation_id("req-123")
            .with_context("organization", "org-1");

        assert_eq!(metadata.actor(), "biller-7");
        assert_eq!(metadata.correlation_id.as_deref(), Some("req-123"));
        assert_eq!(metadata.context.get("organization").map(String::as_str), Some("org-1"));
        assert_eq!(OperationMetadata::default().actor(), "system");
    }
}
