//! Core Kernel - Foundational types shared by the claims workspace
//!
//! This crate provides the building blocks used across the other crates:
//! - Strongly-typed identifiers
//! - Date windows for population filtering
//! - Port error and metadata types for collaborator seams

pub mod identifiers;
pub mod temporal;
pub mod ports;
pub mod error;

pub use identifiers::{ClaimId, OrganizationId, ActivityId};
pub use temporal::{DateWindow, TemporalError};
pub use ports::{PortError, DomainPort, OperationMetadata};
pub use error::CoreError;
