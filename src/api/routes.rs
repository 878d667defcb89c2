//! API Routes
//!
//! HTTP endpoint definitions. Success envelopes keep the legacy
//! `{success, ..., message}` shape the web frontend expects; errors go
//! through `AppError::into_response`.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    ApplicationStatus, AssetDetails, BankDetails, KycDocuments, KycRecord, KycStatus,
    LoanApplication, User, UserType,
};
use crate::error::AppError;
use crate::handlers::{
    AuthHandler, KycHandler, LoanHandler, LoginCommand, RegisterCommand, ReviewKycCommand,
    ReviewLoanCommand, SubmitKycCommand, SubmitLoanCommand,
};
use crate::store::Stores;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Accepted for compatibility with the old payload but ignored:
    /// registration always stores BANK_EMPLOYEE.
    #[serde(rename = "type", default)]
    pub submitted_type: Option<String>,
}

/// Public projection of a user record; the password hash never leaves
/// the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub kyc_number: Option<String>,
    pub employee_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            user_type: user.user_type,
            kyc_number: user.kyc_number,
            employee_id: user.employee_id,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserView,
    pub message: String,
}

/// Generic `{success, data, message}` envelope used by the KYC and
/// loan endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn ok_with_message(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitKycRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub documents: KycDocuments,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycSubmitData {
    pub kyc_number: String,
    pub status: KycStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycStatusData {
    pub kyc_number: String,
    pub status: KycStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLoanRequest {
    pub user_id: String,
    pub kyc_number: String,
    pub asset_details: AssetDetails,
    pub bank_details: BankDetails,
    pub requested_amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSubmitData {
    pub request_id: String,
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub approved_amount: Option<Decimal>,
    #[serde(default)]
    pub gold_quality_index: Option<Decimal>,
    #[serde(default)]
    pub suspicious_flags: Option<Vec<String>>,
}

/// Legacy shape of the application-review response: the updated record
/// rides under `application`, not `data`.
#[derive(Debug, Serialize)]
pub struct ApplicationUpdateResponse {
    pub success: bool,
    pub application: LoanApplication,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateKycStatusRequest {
    pub status: KycStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<Stores> {
    Router::new()
        // Liveness
        .route("/health", get(health_check))
        .route("/api/auth/test", get(auth_test))
        // Bank employee authentication
        .route("/api/auth/bank/login", post(bank_login))
        .route("/api/auth/bank/register", post(bank_register))
        // Customer-facing KYC
        .route("/api/kyc/submit", post(submit_kyc))
        .route("/api/kyc/status/:user_id", get(kyc_status))
        // Customer-facing loans
        .route("/api/loan/submit", post(submit_loan))
        .route("/api/loan/user/:user_id", get(loans_for_user))
        .route("/api/loan/:request_id", get(get_loan))
        // Bank review
        .route("/api/bank/applications/pending", get(pending_applications))
        .route(
            "/api/bank/applications/:request_id/status",
            put(update_application_status),
        )
        .route("/api/bank/kyc/pending", get(pending_kyc))
        .route("/api/bank/kyc/:kyc_number", get(get_kyc))
        .route("/api/bank/kyc/:kyc_number/status", put(update_kyc_status))
}

async fn health_check() -> &'static str {
    "OK"
}

/// Fixed liveness string for the frontend's connectivity probe.
async fn auth_test() -> &'static str {
    "Star Finance API is running!"
}

// =========================================================================
// POST /api/auth/bank/login
// =========================================================================

async fn bank_login(
    State(stores): State<Stores>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let handler = AuthHandler::new(stores);
    let user = handler
        .login(LoginCommand::new(request.email, request.password))
        .await?;

    Ok(Json(AuthResponse {
        success: true,
        user: user.into(),
        message: "Login successful".to_string(),
    }))
}

// =========================================================================
// POST /api/auth/bank/register
// =========================================================================

async fn bank_register(
    State(stores): State<Stores>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let handler = AuthHandler::new(stores);
    let user = handler
        .register(RegisterCommand::new(
            request.name,
            request.email,
            request.password,
        ))
        .await?;

    Ok(Json(AuthResponse {
        success: true,
        user: user.into(),
        message: "Bank employee registered successfully".to_string(),
    }))
}

// =========================================================================
// POST /api/kyc/submit
// =========================================================================

async fn submit_kyc(
    State(stores): State<Stores>,
    Json(request): Json<SubmitKycRequest>,
) -> Result<Json<DataResponse<KycSubmitData>>, AppError> {
    let handler = KycHandler::new(stores);
    let record = handler
        .submit(SubmitKycCommand::new(request.user_id, request.documents))
        .await?;

    Ok(Json(DataResponse::ok_with_message(
        Some(KycSubmitData {
            kyc_number: record.kyc_number,
            status: record.status,
        }),
        "KYC submitted successfully",
    )))
}

// =========================================================================
// GET /api/kyc/status/:user_id
// =========================================================================

/// A user without a KYC record gets `data: null`, not an error.
async fn kyc_status(
    State(stores): State<Stores>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<KycStatusData>>, AppError> {
    let handler = KycHandler::new(stores);

    let response = match handler.status_for_user(&user_id).await? {
        Some(record) => DataResponse::ok(KycStatusData {
            kyc_number: record.kyc_number,
            status: record.status,
            created_at: record.created_at,
        }),
        None => DataResponse::ok_with_message(None, "No KYC record found for this user."),
    };
    Ok(Json(response))
}

// =========================================================================
// POST /api/loan/submit
// =========================================================================

async fn submit_loan(
    State(stores): State<Stores>,
    Json(request): Json<SubmitLoanRequest>,
) -> Result<Json<DataResponse<LoanSubmitData>>, AppError> {
    let handler = LoanHandler::new(stores);
    let app = handler
        .submit(SubmitLoanCommand {
            user_id: request.user_id,
            kyc_number: request.kyc_number,
            asset_details: request.asset_details,
            bank_details: request.bank_details,
            requested_amount: request.requested_amount,
        })
        .await?;

    Ok(Json(DataResponse::ok_with_message(
        Some(LoanSubmitData {
            request_id: app.request_id,
            status: app.status,
        }),
        "Loan application submitted successfully",
    )))
}

// =========================================================================
// GET /api/loan/:request_id
// =========================================================================

async fn get_loan(
    State(stores): State<Stores>,
    Path(request_id): Path<String>,
) -> Result<Json<DataResponse<LoanApplication>>, AppError> {
    let handler = LoanHandler::new(stores);
    let app = handler.get(&request_id).await?;
    Ok(Json(DataResponse::ok(app)))
}

// =========================================================================
// GET /api/loan/user/:user_id
// =========================================================================

async fn loans_for_user(
    State(stores): State<Stores>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<Vec<LoanApplication>>>, AppError> {
    let handler = LoanHandler::new(stores);
    let apps = handler.for_user(&user_id).await?;
    Ok(Json(DataResponse::ok(apps)))
}

// =========================================================================
// GET /api/bank/applications/pending
// =========================================================================

async fn pending_applications(
    State(stores): State<Stores>,
) -> Result<Json<DataResponse<Vec<LoanApplication>>>, AppError> {
    let handler = LoanHandler::new(stores);
    let apps = handler.pending().await?;
    Ok(Json(DataResponse::ok(apps)))
}

// =========================================================================
// PUT /api/bank/applications/:request_id/status
// =========================================================================

async fn update_application_status(
    State(stores): State<Stores>,
    Path(request_id): Path<String>,
    Json(request): Json<UpdateApplicationStatusRequest>,
) -> Result<Json<ApplicationUpdateResponse>, AppError> {
    let handler = LoanHandler::new(stores);
    let app = handler
        .review(ReviewLoanCommand {
            request_id,
            status: request.status,
            notes: request.notes,
            approved_amount: request.approved_amount,
            gold_quality_index: request.gold_quality_index,
            suspicious_flags: request.suspicious_flags,
        })
        .await?;

    Ok(Json(ApplicationUpdateResponse {
        success: true,
        application: app,
        message: "Status updated successfully".to_string(),
    }))
}

// =========================================================================
// GET /api/bank/kyc/pending
// =========================================================================

async fn pending_kyc(
    State(stores): State<Stores>,
) -> Result<Json<DataResponse<Vec<KycRecord>>>, AppError> {
    let handler = KycHandler::new(stores);
    let records = handler.pending().await?;
    Ok(Json(DataResponse::ok(records)))
}

// =========================================================================
// GET /api/bank/kyc/:kyc_number
// =========================================================================

async fn get_kyc(
    State(stores): State<Stores>,
    Path(kyc_number): Path<String>,
) -> Result<Json<DataResponse<KycRecord>>, AppError> {
    let handler = KycHandler::new(stores);
    let record = handler.get(&kyc_number).await?;
    Ok(Json(DataResponse::ok(record)))
}

// =========================================================================
// PUT /api/bank/kyc/:kyc_number/status
// =========================================================================

async fn update_kyc_status(
    State(stores): State<Stores>,
    Path(kyc_number): Path<String>,
    Json(request): Json<UpdateKycStatusRequest>,
) -> Result<Json<DataResponse<KycRecord>>, AppError> {
    let handler = KycHandler::new(stores);
    let record = handler
        .review(ReviewKycCommand {
            kyc_number,
            status: request.status,
            notes: request.notes,
        })
        .await?;

    Ok(Json(DataResponse::ok_with_message(
        Some(record),
        "KYC status updated.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_legacy_type_field() {
        let json = r#"{
            "name": "Asha",
            "email": "a@b.com",
            "password": "pw",
            "type": "CUSTOMER"
        }"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.submitted_type.as_deref(), Some("CUSTOMER"));
    }

    #[test]
    fn test_submit_kyc_request_flattens_documents() {
        let json = r#"{
            "userId": "u1",
            "aadhaarNumber": "1234 5678 9012",
            "panNumber": "ABCDE1234F"
        }"#;
        let request: SubmitKycRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.user_id, "u1");
        assert_eq!(request.documents.pan_number.as_deref(), Some("ABCDE1234F"));
        assert!(request.documents.passport.is_none());
    }

    #[test]
    fn test_submit_loan_request_deserialize() {
        let json = r#"{
            "userId": "u1",
            "kycNumber": "KYC1700000000000abcd",
            "assetDetails": {
                "type": "GOLD",
                "weight": "15.5",
                "purity": "22K",
                "description": "chain"
            },
            "bankDetails": {
                "accountNumber": "123",
                "ifscCode": "HDFC0000123",
                "bankName": "HDFC",
                "accountHolderName": "Meera"
            },
            "requestedAmount": "50000"
        }"#;
        let request: SubmitLoanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.asset_details.asset_type, "GOLD");
        assert!(request.asset_details.image_urls.is_empty());
        assert!(request.bank_details.branch_name.is_none());
    }

    #[test]
    fn test_update_status_request_defaults() {
        let json = r#"{"status": "UNDER_REVIEW"}"#;
        let request: UpdateApplicationStatusRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, ApplicationStatus::UnderReview);
        assert!(request.notes.is_none());
        assert!(request.approved_amount.is_none());
    }

    #[test]
    fn test_user_view_omits_password_hash() {
        let user = User::bank_employee(
            "Asha".to_string(),
            "a@b.com".to_string(),
            "salt$digest".to_string(),
        );
        let view: UserView = user.into();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["type"], "BANK_EMPLOYEE");
    }
}
