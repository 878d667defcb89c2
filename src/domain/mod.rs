//! Domain module
//!
//! Core record types for the gold-loan workflow and the rules that
//! govern their status fields.

mod error;
pub mod ids;
mod kyc;
mod loan;
mod user;

pub use error::DomainError;
pub use kyc::{KycDocuments, KycRecord, KycStatus};
pub use loan::{ApplicationStatus, AssetDetails, BankDetails, LoanApplication, ReviewUpdate};
pub use user::{User, UserType};
