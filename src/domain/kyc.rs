//! KYC record
//!
//! Know-Your-Customer identity-verification record. Created once per
//! user at submission time; its status is moved out of PENDING exactly
//! once by a bank review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ids, DomainError};

/// KYC verification status. The only permitted movement is
/// PENDING -> VERIFIED or PENDING -> REJECTED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    Pending,
    Verified,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn can_transition_to(&self, next: KycStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Verified) | (Self::Pending, Self::Rejected)
        )
    }
}

impl std::str::FromStr for KycStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "VERIFIED" => Ok(Self::Verified),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(format!("unknown KYC status: {}", other)),
        }
    }
}

/// Document numbers and image references captured at submission.
/// Aadhaar and PAN are the mandatory pair; the rest are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycDocuments {
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
    pub driving_license: Option<String>,
    pub passport: Option<String>,
    pub aadhaar_image_url: Option<String>,
    pub pan_image_url: Option<String>,
    pub driving_license_image_url: Option<String>,
    pub passport_image_url: Option<String>,
}

/// Identity-verification record. `kyc_number` is the unique
/// operator-facing code; `user_id` is an untyped reference because
/// customers may authenticate through an external identity provider
/// and never appear in the users collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycRecord {
    pub id: Uuid,
    pub kyc_number: String,
    pub user_id: String,
    pub status: KycStatus,
    #[serde(flatten)]
    pub documents: KycDocuments,
    pub verification_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KycRecord {
    /// Create a new PENDING record with a generated KYC number.
    pub fn new(user_id: String, documents: KycDocuments) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kyc_number: ids::kyc_number(),
            user_id,
            status: KycStatus::Pending,
            documents,
            verification_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a bank review outcome. Fails unless the record is still
    /// PENDING and the target status is a review outcome.
    pub fn review(
        &mut self,
        status: KycStatus,
        notes: Option<String>,
    ) -> Result<(), DomainError> {
        if !self.status.can_transition_to(status) {
            return Err(DomainError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }
        self.status = status;
        self.verification_notes = notes;
        self.updated_at = Utc::now();
        Ok(())
    }
}
