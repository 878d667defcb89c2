//! API integration tests
//!
//! Full request/response round trips over the in-memory backend.

use axum::http::StatusCode;
use serde_json::json;
use tower::util::ServiceExt;

mod common;

use common::{app, body_bytes, body_json, get, json_request};

// =========================================================================
// Liveness
// =========================================================================

#[tokio::test]
async fn test_auth_test_endpoint() {
    let app = app();
    let response = app.oneshot(get("/api/auth/test")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body_bytes(response).await;
    assert_eq!(&bytes[..], b"Star Finance API is running!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =========================================================================
// Authentication
// =========================================================================

#[tokio::test]
async fn test_register_forces_bank_employee_then_login() {
    let app = app();

    // Submitted type CUSTOMER is ignored by registration.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/bank/register",
            json!({
                "name": "Asha Rao",
                "email": "a@b.com",
                "password": "pw",
                "type": "CUSTOMER"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Bank employee registered successfully");
    assert_eq!(body["user"]["type"], "BANK_EMPLOYEE");
    assert!(body["user"]["employeeId"]
        .as_str()
        .unwrap()
        .starts_with("EMP"));
    // The password hash never leaves the server.
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password").is_none());

    // The same credentials now authenticate as a bank employee.
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/bank/login",
            json!({"email": "a@b.com", "password": "pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "a@b.com");
    assert_eq!(body["user"]["name"], "Asha Rao");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = app();

    let payload = json!({"name": "First", "email": "dup@b.com", "password": "pw"});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/bank/register", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request("POST", "/api/auth/bank/register", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already exists");
    assert_eq!(body["error_code"], "email_exists");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = app();
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/bank/register",
            json!({"name": "Asha", "email": "a@b.com", "password": "pw"}),
        ))
        .await
        .unwrap();

    // Wrong password and unknown email produce the same 400 body.
    for payload in [
        json!({"email": "a@b.com", "password": "wrong"}),
        json!({"email": "ghost@b.com", "password": "pw"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/bank/login", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

// =========================================================================
// KYC
// =========================================================================

#[tokio::test]
async fn test_kyc_submit_status_and_review() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/kyc/submit",
            json!({
                "userId": "user-1",
                "aadhaarNumber": "1234 5678 9012",
                "panNumber": "ABCDE1234F"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "PENDING");
    let kyc_number = body["data"]["kycNumber"].as_str().unwrap().to_string();
    assert!(kyc_number.starts_with("KYC"));

    // Status lookup by user.
    let response = app
        .clone()
        .oneshot(get("/api/kyc/status/user-1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["kycNumber"], kyc_number.as_str());

    // It shows up in the bank's pending queue.
    let response = app
        .clone()
        .oneshot(get("/api/bank/kyc/pending"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Verify it.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/bank/kyc/{}/status", kyc_number),
            json!({"status": "VERIFIED", "notes": "documents legible"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "VERIFIED");
    assert_eq!(body["data"]["verificationNotes"], "documents legible");

    // The queue drains and a second review is refused.
    let response = app
        .clone()
        .oneshot(get("/api/bank/kyc/pending"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/bank/kyc/{}/status", kyc_number),
            json!({"status": "REJECTED"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_kyc_status_without_record_is_null_data() {
    let app = app();
    let response = app.oneshot(get("/api/kyc/status/nobody")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_kyc_duplicate_submission() {
    let app = app();
    let payload = json!({"userId": "user-1", "panNumber": "ABCDE1234F"});

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/kyc/submit", payload.clone()))
        .await
        .unwrap();
    let first_body = body_json(first).await;
    let existing_number = first_body["data"]["kycNumber"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request("POST", "/api/kyc/submit", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error_code"], "kyc_exists");
    assert_eq!(body["message"], "KYC already exists for this user");
    // The rejection names the record that already exists.
    assert_eq!(body["kycNumber"], existing_number);
}

// =========================================================================
// Loan applications
// =========================================================================

fn loan_payload(user_id: &str) -> serde_json::Value {
    json!({
        "userId": user_id,
        "kycNumber": "KYC1700000000000abcd",
        "assetDetails": {
            "type": "GOLD",
            "weight": "24.5",
            "purity": "22K",
            "description": "two bangles"
        },
        "bankDetails": {
            "accountNumber": "001234567890",
            "ifscCode": "HDFC0000123",
            "bankName": "HDFC Bank",
            "branchName": "MG Road",
            "accountHolderName": "Meera Iyer"
        },
        "requestedAmount": "50000"
    })
}

#[tokio::test]
async fn test_loan_submit_and_lookups() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/loan/submit", loan_payload("user-1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "SUBMITTED");
    let request_id = body["data"]["requestId"].as_str().unwrap().to_string();
    assert!(request_id.starts_with("RID"));

    // Single-application lookup.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/loan/{}", request_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["requestId"], request_id.as_str());
    assert_eq!(body["data"]["assetDetails"]["type"], "GOLD");

    // Per-user list and the bank's pending queue.
    let response = app
        .clone()
        .oneshot(get("/api/loan/user/user-1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .oneshot(get("/api/bank/applications/pending"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_loan_review_lifecycle_over_http() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/loan/submit", loan_payload("user-1")))
        .await
        .unwrap();
    let body = body_json(response).await;
    let request_id = body["data"]["requestId"].as_str().unwrap().to_string();
    let status_uri = format!("/api/bank/applications/{}/status", request_id);

    // Stage skipping is refused.
    let response = app
        .clone()
        .oneshot(json_request("PUT", &status_uri, json!({"status": "DISBURSED"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "invalid_status_transition");

    // Walk the review path, carrying evaluation data along the way.
    for step in [
        json!({"status": "UNDER_REVIEW"}),
        json!({"status": "DOCUMENT_VERIFICATION"}),
        json!({"status": "PHYSICAL_VERIFICATION"}),
        json!({"status": "GOLD_EVALUATION", "goldQualityIndex": "0.91", "notes": "hallmark present"}),
        json!({"status": "OFFER_MADE", "approvedAmount": "42000"}),
        json!({"status": "APPROVED"}),
        json!({"status": "DISBURSED"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("PUT", &status_uri, step))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/api/loan/{}", request_id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "DISBURSED");
    assert_eq!(body["data"]["approvedAmount"], "42000");
    assert_eq!(body["data"]["goldQualityIndex"], "0.91");

    // DISBURSED is terminal.
    let response = app
        .oneshot(json_request("PUT", &status_uri, json!({"status": "UNDER_REVIEW"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "terminal_status");
}

#[tokio::test]
async fn test_loan_unknown_request_id_is_404() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get("/api/loan/RID0000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/bank/applications/RID0000/status",
            json!({"status": "UNDER_REVIEW"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "not_found");
}

#[tokio::test]
async fn test_loan_submit_validation() {
    let app = app();

    let mut payload = loan_payload("user-1");
    payload["requestedAmount"] = json!("0");
    let response = app
        .oneshot(json_request("POST", "/api/loan/submit", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error_code"], "validation_error");
    assert_eq!(body["field"], "requestedAmount");
}
