//! Tests for core_kernel error types

use chrono::NaiveDate;
use core_kernel::error::CoreError;
use core_kernel::temporal::{DateWindow, TemporalError};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_not_found() {
    let error = CoreError::not_found("Claim not found");

    match error {
        CoreError::NotFound(msg) => assert_eq!(msg, "Claim not found"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_core_error_from_temporal_error() {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let temporal_error = DateWindow::between(start, end).unwrap_err();
    let core_error: CoreError = temporal_error.into();

    assert!(matches!(core_error, CoreError::Temporal(TemporalError::InvalidWindow { .. })));
    assert!(core_error.to_string().contains("2024-05-01"));
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("Missing config");

    match error {
        CoreError::Configuration(msg) => assert_eq!(msg, "Missing config"),
        _ => panic!("Expected Configuration error"),
    }
}
