//! Persistence contracts
//!
//! One keyed-lookup store per entity. All operations are single-record
//! equality lookups; absence is an empty result, never an error.
//! Inserts are atomic with respect to their unique secondary index
//! (email, kycNumber, requestId), which is what closes the
//! check-then-insert registration race.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    ApplicationStatus, KycRecord, KycStatus, LoanApplication, User,
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert collided with an existing unique value; the payload
    /// names the offending field.
    #[error("duplicate value for unique field {0}")]
    Duplicate(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User lookups, keyed by the unique email plus the two semi-unique
/// reference fields.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Duplicate("email")` if the email
    /// is already taken; no record is written in that case.
    async fn insert(&self, user: User) -> StoreResult<User>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_kyc_number(&self, kyc_number: &str) -> StoreResult<Option<User>>;

    async fn find_by_employee_id(&self, employee_id: &str) -> StoreResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool>;
}

/// KYC record lookups, keyed by the unique kycNumber.
#[async_trait]
pub trait KycStore: Send + Sync {
    async fn insert(&self, record: KycRecord) -> StoreResult<KycRecord>;

    async fn find_by_kyc_number(&self, kyc_number: &str) -> StoreResult<Option<KycRecord>>;

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<KycRecord>>;

    /// Records in the given status, newest first.
    async fn list_by_status(&self, status: KycStatus) -> StoreResult<Vec<KycRecord>>;

    async fn exists_by_kyc_number(&self, kyc_number: &str) -> StoreResult<bool>;

    /// Replace the stored record matching `record.kyc_number`.
    async fn update(&self, record: &KycRecord) -> StoreResult<()>;
}

/// Loan application lookups, keyed by the unique requestId.
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn insert(&self, app: LoanApplication) -> StoreResult<LoanApplication>;

    async fn find_by_request_id(&self, request_id: &str)
        -> StoreResult<Option<LoanApplication>>;

    /// A user's applications, newest first.
    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<LoanApplication>>;

    /// Applications in the given status, newest first.
    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<LoanApplication>>;

    async fn list_by_kyc_number(&self, kyc_number: &str)
        -> StoreResult<Vec<LoanApplication>>;

    async fn exists_by_request_id(&self, request_id: &str) -> StoreResult<bool>;

    /// Applications waiting for the bank's review queue
    /// (SUBMITTED, UNDER_REVIEW, DOCUMENT_VERIFICATION), newest first.
    async fn list_pending(&self) -> StoreResult<Vec<LoanApplication>>;

    /// Replace the stored record matching `app.request_id`.
    async fn update(&self, app: &LoanApplication) -> StoreResult<()>;
}

/// Shared application state: one store handle per entity.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub kyc: Arc<dyn KycStore>,
    pub loans: Arc<dyn LoanStore>,
}

impl Stores {
    /// In-process backend, used by tests and when no database is
    /// configured.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            kyc: store.clone(),
            loans: store,
        }
    }

    /// Postgres backend over a shared connection pool.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            kyc: store.clone(),
            loans: store,
        }
    }
}
