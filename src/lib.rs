//! Star Finance Library
//!
//! Gold & silver loan platform backend: bank-employee authentication,
//! KYC record storage and loan-application tracking.
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod store;

pub use config::Config;
pub use domain::{
    ApplicationStatus, AssetDetails, BankDetails, DomainError, KycDocuments, KycRecord,
    KycStatus, LoanApplication, User, UserType,
};
pub use error::{AppError, AppResult};
pub use store::{MemoryStore, PgStore, StoreError, Stores};
