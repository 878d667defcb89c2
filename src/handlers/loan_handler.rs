//! Loan application handler
//!
//! Submission, lookup and transition-validated review of loan
//! applications.

use rust_decimal::Decimal;

use crate::domain::{LoanApplication, ReviewUpdate};
use crate::error::AppError;
use crate::store::Stores;

use super::{ReviewLoanCommand, SubmitLoanCommand};

pub struct LoanHandler {
    stores: Stores,
}

impl LoanHandler {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Create a SUBMITTED application with a generated request ID.
    pub async fn submit(&self, command: SubmitLoanCommand) -> Result<LoanApplication, AppError> {
        if command.user_id.is_empty() {
            return Err(AppError::validation("userId", "userId is required"));
        }
        if command.kyc_number.is_empty() {
            return Err(AppError::validation("kycNumber", "kycNumber is required"));
        }
        if command.requested_amount <= Decimal::ZERO {
            return Err(AppError::validation(
                "requestedAmount",
                "requested amount must be positive",
            ));
        }
        if command.asset_details.weight <= Decimal::ZERO {
            return Err(AppError::validation(
                "assetDetails.weight",
                "asset weight must be positive",
            ));
        }

        let app = LoanApplication::new(
            command.user_id,
            command.kyc_number,
            command.asset_details,
            command.bank_details,
            command.requested_amount,
        );
        let app = self.stores.loans.insert(app).await?;
        tracing::info!(request_id = %app.request_id, "loan application submitted");
        Ok(app)
    }

    pub async fn get(&self, request_id: &str) -> Result<LoanApplication, AppError> {
        self.stores
            .loans
            .find_by_request_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("application", request_id))
    }

    /// A user's applications, newest first.
    pub async fn for_user(&self, user_id: &str) -> Result<Vec<LoanApplication>, AppError> {
        Ok(self.stores.loans.list_by_user(user_id).await?)
    }

    /// Applications waiting in the bank's review queue, newest first.
    pub async fn pending(&self) -> Result<Vec<LoanApplication>, AppError> {
        Ok(self.stores.loans.list_pending().await?)
    }

    /// Apply a review step. The transition table rejects stage
    /// skipping and any change to a REJECTED or DISBURSED application.
    pub async fn review(&self, command: ReviewLoanCommand) -> Result<LoanApplication, AppError> {
        let mut app = self.get(&command.request_id).await?;

        app.apply_review(ReviewUpdate {
            status: command.status,
            notes: command.notes,
            approved_amount: command.approved_amount,
            gold_quality_index: command.gold_quality_index,
            suspicious_flags: command.suspicious_flags,
        })?;

        self.stores.loans.update(&app).await?;
        tracing::info!(
            request_id = %app.request_id,
            status = app.status.as_str(),
            "application reviewed"
        );
        Ok(app)
    }
}
