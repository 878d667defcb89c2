//! KYC handler
//!
//! Submission and bank review of identity-verification records.

use crate::domain::{KycRecord, KycStatus};
use crate::error::AppError;
use crate::store::Stores;

use super::{ReviewKycCommand, SubmitKycCommand};

pub struct KycHandler {
    stores: Stores,
}

impl KycHandler {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Create a PENDING record for a user. A user gets at most one
    /// KYC record; a second submission reports the existing number.
    pub async fn submit(&self, command: SubmitKycCommand) -> Result<KycRecord, AppError> {
        if command.user_id.is_empty() {
            return Err(AppError::validation("userId", "userId is required"));
        }

        if let Some(existing) = self.stores.kyc.find_by_user(&command.user_id).await? {
            return Err(AppError::KycAlreadySubmitted {
                kyc_number: existing.kyc_number,
            });
        }

        let record = KycRecord::new(command.user_id, command.documents);
        let record = self.stores.kyc.insert(record).await?;
        tracing::info!(kyc_number = %record.kyc_number, "KYC submitted");
        Ok(record)
    }

    /// A user's KYC record, if any. Absence is not an error.
    pub async fn status_for_user(&self, user_id: &str) -> Result<Option<KycRecord>, AppError> {
        Ok(self.stores.kyc.find_by_user(user_id).await?)
    }

    pub async fn get(&self, kyc_number: &str) -> Result<KycRecord, AppError> {
        self.stores
            .kyc
            .find_by_kyc_number(kyc_number)
            .await?
            .ok_or_else(|| AppError::not_found("kyc", kyc_number))
    }

    /// Pending submissions for the bank's review queue, newest first.
    pub async fn pending(&self) -> Result<Vec<KycRecord>, AppError> {
        Ok(self.stores.kyc.list_by_status(KycStatus::Pending).await?)
    }

    /// Apply a review outcome. Only VERIFIED and REJECTED are valid
    /// targets, and only from PENDING; the domain rule enforces both.
    pub async fn review(&self, command: ReviewKycCommand) -> Result<KycRecord, AppError> {
        let mut record = self.get(&command.kyc_number).await?;
        record.review(command.status, command.notes)?;
        self.stores.kyc.update(&record).await?;
        tracing::info!(
            kyc_number = %record.kyc_number,
            status = record.status.as_str(),
            "KYC reviewed"
        );
        Ok(record)
    }
}
