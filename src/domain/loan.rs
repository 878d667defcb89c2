//! Loan application record
//!
//! A loan request moves through a nine-state review lifecycle. The
//! legacy system stored the status as an open field; here the lifecycle
//! is an explicit transition table enforced whenever a review update is
//! applied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ids, DomainError};

/// Loan application review lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    DocumentVerification,
    PhysicalVerification,
    GoldEvaluation,
    OfferMade,
    Approved,
    Rejected,
    Disbursed,
}

impl ApplicationStatus {
    /// Statuses shown in the bank's pending-review queue.
    pub const REVIEW_QUEUE: [ApplicationStatus; 3] = [
        Self::Submitted,
        Self::UnderReview,
        Self::DocumentVerification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::DocumentVerification => "DOCUMENT_VERIFICATION",
            Self::PhysicalVerification => "PHYSICAL_VERIFICATION",
            Self::GoldEvaluation => "GOLD_EVALUATION",
            Self::OfferMade => "OFFER_MADE",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Disbursed => "DISBURSED",
        }
    }

    /// REJECTED and DISBURSED applications never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Disbursed)
    }

    /// The review transition table. Every in-flight status may be
    /// rejected; the happy path advances one stage at a time.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        match self {
            Submitted => matches!(next, UnderReview | Rejected),
            UnderReview => matches!(next, DocumentVerification | Rejected),
            DocumentVerification => matches!(next, PhysicalVerification | Rejected),
            PhysicalVerification => matches!(next, GoldEvaluation | Rejected),
            GoldEvaluation => matches!(next, OfferMade | Rejected),
            OfferMade => matches!(next, Approved | Rejected),
            Approved => matches!(next, Disbursed),
            Rejected | Disbursed => false,
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMITTED" => Ok(Self::Submitted),
            "UNDER_REVIEW" => Ok(Self::UnderReview),
            "DOCUMENT_VERIFICATION" => Ok(Self::DocumentVerification),
            "PHYSICAL_VERIFICATION" => Ok(Self::PhysicalVerification),
            "GOLD_EVALUATION" => Ok(Self::GoldEvaluation),
            "OFFER_MADE" => Ok(Self::OfferMade),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            "DISBURSED" => Ok(Self::Disbursed),
            other => Err(format!("unknown application status: {}", other)),
        }
    }
}

/// Pledged asset description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetails {
    /// GOLD, SILVER or PLATINUM.
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Weight in grams.
    pub weight: Decimal,
    /// e.g. "22K", "24K".
    pub purity: String,
    pub description: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Disbursement account details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub branch_name: Option<String>,
    pub account_holder_name: String,
}

/// A review decision to apply to an application. Amounts and the gold
/// quality index arrive from the physical-evaluation steps.
#[derive(Debug, Clone)]
pub struct ReviewUpdate {
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub approved_amount: Option<Decimal>,
    pub gold_quality_index: Option<Decimal>,
    pub suspicious_flags: Option<Vec<String>>,
}

/// Loan request record. `request_id` is the unique operator-facing
/// code; `user_id` and `kyc_number` are untyped references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub id: Uuid,
    pub request_id: String,
    pub user_id: String,
    pub kyc_number: String,
    pub status: ApplicationStatus,
    pub asset_details: AssetDetails,
    pub bank_details: BankDetails,
    pub requested_amount: Decimal,
    pub approved_amount: Option<Decimal>,
    pub gold_quality_index: Option<Decimal>,
    pub evaluation_notes: Option<String>,
    #[serde(default)]
    pub suspicious_flags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoanApplication {
    /// Create a new SUBMITTED application with a generated request ID.
    pub fn new(
        user_id: String,
        kyc_number: String,
        asset_details: AssetDetails,
        bank_details: BankDetails,
        requested_amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            request_id: ids::request_id(),
            user_id,
            kyc_number,
            status: ApplicationStatus::Submitted,
            asset_details,
            bank_details,
            requested_amount,
            approved_amount: None,
            gold_quality_index: None,
            evaluation_notes: None,
            suspicious_flags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a review decision, enforcing the transition table. A
    /// terminal application reports its status rather than a generic
    /// transition failure.
    pub fn apply_review(&mut self, update: ReviewUpdate) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::TerminalStatus {
                status: self.status.as_str().to_string(),
            });
        }
        if !self.status.can_transition_to(update.status) {
            return Err(DomainError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: update.status.as_str().to_string(),
            });
        }

        self.status = update.status;
        if update.notes.is_some() {
            self.evaluation_notes = update.notes;
        }
        if update.approved_amount.is_some() {
            self.approved_amount = update.approved_amount;
        }
        if update.gold_quality_index.is_some() {
            self.gold_quality_index = update.gold_quality_index;
        }
        if let Some(flags) = update.suspicious_flags {
            self.suspicious_flags = flags;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
