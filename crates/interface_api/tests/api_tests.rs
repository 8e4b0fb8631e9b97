//! HTTP tests for interface_api, driving the router through an in-process test server

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_claims::ports::memory::{InMemoryActivityLog, InMemoryClaimRepository};
use domain_claims::{ClaimService, TransitionTable};
use interface_api::{config::ApiConfig, create_router};

fn app() -> TestServer {
    app_with(TransitionTable::permissive())
}

fn app_with(transitions: TransitionTable) -> TestServer {
    let service = ClaimService::new(
        Arc::new(InMemoryClaimRepository::new()),
        Arc::new(InMemoryActivityLog::new()),
    )
    .with_transitions(transitions);
    TestServer::new(create_router(Arc::new(service), ApiConfig::default())).unwrap()
}

async fn send(server: &TestServer, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    let mut request = server.method(method, uri).add_header(
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_static("biller-1"),
    );
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.await;
    let text = response.text();
    let value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (response.status_code(), value)
}

fn claim_body(number: &str) -> Value {
    json!({
        "claim_number": number,
        "patient_name": "Riley Park",
        "payer_name": "Aetna",
        "plan_type": "commercial",
        "provider_npi": "1234567893",
        "service_date": "2024-03-14",
        "procedure_codes": ["99213"],
        "diagnosis_codes": ["E11.9"],
        "billed_amount": "500.00"
    })
}

// ============================================================================
// Health
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = app()
            .get("/health")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("req-7"),
            )
            .await;
        assert_eq!(response.header("x-request-id"), "req-7");
    }
}

// ============================================================================
// Claims
// ============================================================================

mod claims_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_fetch_claim() {
        let app = app();
        let (status, created) = send(&app, "POST", "/api/v1/claims", Some(claim_body("CLM-100"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["risk_score"], 0);
        assert_eq!(created["risk_level"], "low");
        assert_eq!(created["status"], "draft");
        assert_eq!(created["status_label"], "Draft");
        assert_eq!(created["source"], "api");

        let id = created["id"].as_str().unwrap();
        let (status, fetched) = send(&app, "GET", &format!("/api/v1/claims/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["claim_number"], "CLM-100");
    }

    #[tokio::test]
    async fn test_missing_identity_is_unprocessable() {
        let (status, body) = send(&app(), "POST", "/api/v1/claims", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let mut body = claim_body("CLM-101");
        body["billed_amount"] = json!("-10");
        let (status, _) = send(&app(), "POST", "/api/v1/claims", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_duplicate_number_conflicts() {
        let app = app();
        send(&app, "POST", "/api/v1/claims", Some(claim_body("CLM-102"))).await;
        let (status, _) = send(&app, "POST", "/api/v1/claims", Some(claim_body("CLM-102"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_status_change_and_activity() {
        let app = app();
        let (_, created) = send(&app, "POST", "/api/v1/claims", Some(claim_body("CLM-103"))).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/v1/claims/{}/status", id),
            Some(json!({ "status": "denied" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "denied");

        let (_, activity) = send(&app, "GET", &format!("/api/v1/claims/{}/activity", id), None).await;
        let events = activity.as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["previous_value"], "draft");
        assert_eq!(events[1]["new_value"], "denied");
        assert_eq!(events[1]["actor"], "biller-1");

        let (_, progress) = send(&app, "GET", &format!("/api/v1/claims/{}/progress", id), None).await;
        assert_eq!(progress["path"], "denial");
    }

    #[tokio::test]
    async fn test_unknown_status_is_bad_request() {
        let app = app();
        let (_, created) = send(&app, "POST", "/api/v1/claims", Some(claim_body("CLM-104"))).await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/v1/claims/{}/status", id),
            Some(json!({ "status": "approved" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_strict_workflow_conflict() {
        let app = app_with(TransitionTable::standard_workflow());
        let (_, created) = send(&app, "POST", "/api/v1/claims", Some(claim_body("CLM-105"))).await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/v1/claims/{}/status", id),
            Some(json!({ "status": "paid" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_then_recompute_risk() {
        let app = app();
        let (_, created) = send(&app, "POST", "/api/v1/claims", Some(claim_body("CLM-106"))).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/v1/claims/{}", id),
            Some(json!({ "diagnosis_codes": [], "billed_amount": "12000" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["risk_score"], 40);

        let (status, assessment) =
            send(&app, "POST", &format!("/api/v1/claims/{}/risk", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(assessment["score"], 40);
        assert_eq!(assessment["level"], "medium");
        assert!(assessment["insights"].is_null());
        assert!(assessment["notice"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let uri = format!("/api/v1/claims/{}", core_kernel::ClaimId::new_v7());
        let (status, body) = send(&app(), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        let (status, _) = send(&app(), "GET", "/api/v1/claims/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let app = app();
        for number in ["CLM-107", "CLM-108"] {
            send(&app, "POST", "/api/v1/claims", Some(claim_body(number))).await;
        }
        let mut denied = claim_body("CLM-109");
        denied["status"] = json!("denied");
        send(&app, "POST", "/api/v1/claims", Some(denied)).await;

        let (_, all) = send(&app, "GET", "/api/v1/claims", None).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let (_, filtered) = send(&app, "GET", "/api/v1/claims?status=denied", None).await;
        assert_eq!(filtered.as_array().unwrap().len(), 1);
    }
}

// ============================================================================
// Analytics
// ============================================================================

mod analytics_tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_and_patterns() {
        let app = app();
        let mut paid = claim_body("CLM-200");
        paid["status"] = json!("paid");
        paid["paid_amount"] = json!("450.00");
        send(&app, "POST", "/api/v1/claims", Some(paid)).await;

        let mut denied = claim_body("CLM-201");
        denied["status"] = json!("denied");
        denied["denial"] = json!({ "category": "coding", "codes": ["CO-16"] });
        send(&app, "POST", "/api/v1/claims", Some(denied)).await;

        let (status, stats) = send(&app, "GET", "/api/v1/analytics/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total"], 2);
        assert_eq!(stats["denialRate"], "0.5");
        assert_eq!(stats["byDenialCategory"]["coding"], 1);

        let (status, report) = send(&app, "GET", "/api/v1/analytics/patterns", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["patterns"][0]["kind"], "denial_rate");
        assert_eq!(report["patterns"][0]["severity"], "high");
    }

    #[tokio::test]
    async fn test_inverted_window_is_bad_request() {
        let (status, _) = send(
            &app(),
            "GET",
            "/api/v1/analytics/stats?from=2024-05-01&to=2024-04-01",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_day_window_is_bad_request() {
        let uri = format!("/api/v1/analytics/stats?days={}", u32::MAX);
        let (status, body) = send(&app(), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_window_filters_population() {
        let app = app();
        send(&app, "POST", "/api/v1/claims", Some(claim_body("CLM-300"))).await;

        let (_, stats) = send(
            &app,
            "GET",
            "/api/v1/analytics/stats?from=2024-04-01&to=2024-04-30",
            None,
        )
        .await;
        assert_eq!(stats["total"], 0);
        assert_eq!(stats["denialRate"], "0");
    }
}
