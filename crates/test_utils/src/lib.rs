//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims workspace test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claims and reference values
//! - `builders`: Builder for constructing claims with only the relevant fields set
//! - `assertions`: Assertion helpers for assessments and statistics
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
