//! Command types
//!
//! Plain inputs for the handlers, decoupled from the HTTP request
//! types in the API layer.

use rust_decimal::Decimal;

use crate::domain::{
    ApplicationStatus, AssetDetails, BankDetails, KycDocuments, KycStatus,
};

/// Bank employee login.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

/// Bank employee registration. Whatever user type the caller submitted
/// is dropped here; registration always produces a BANK_EMPLOYEE.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// KYC submission.
#[derive(Debug, Clone)]
pub struct SubmitKycCommand {
    pub user_id: String,
    pub documents: KycDocuments,
}

impl SubmitKycCommand {
    pub fn new(user_id: String, documents: KycDocuments) -> Self {
        Self { user_id, documents }
    }
}

/// Bank review of a KYC submission.
#[derive(Debug, Clone)]
pub struct ReviewKycCommand {
    pub kyc_number: String,
    pub status: KycStatus,
    pub notes: Option<String>,
}

/// Loan application submission.
#[derive(Debug, Clone)]
pub struct SubmitLoanCommand {
    pub user_id: String,
    pub kyc_number: String,
    pub asset_details: AssetDetails,
    pub bank_details: BankDetails,
    pub requested_amount: Decimal,
}

/// Bank review step for a loan application.
#[derive(Debug, Clone)]
pub struct ReviewLoanCommand {
    pub request_id: String,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub approved_amount: Option<Decimal>,
    pub gold_quality_index: Option<Decimal>,
    pub suspicious_flags: Option<Vec<String>>,
}
