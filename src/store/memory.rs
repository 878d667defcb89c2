//! In-memory storage backend
//!
//! Vec-backed collections behind `tokio::sync::RwLock`. Each insert
//! takes the write lock, checks its unique index and appends in one
//! critical section, so two concurrent registrations with the same
//! email cannot both succeed.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ApplicationStatus, KycRecord, KycStatus, LoanApplication, User};

use super::{KycStore, LoanStore, StoreError, StoreResult, UserStore};

/// In-process store implementing all three persistence contracts.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    kyc: RwLock<Vec<KycRecord>>,
    loans: RwLock<Vec<LoanApplication>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut records: Vec<T>, created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    records.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    records
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_kyc_number(&self, kyc_number: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.kyc_number.as_deref() == Some(kyc_number))
            .cloned())
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.employee_id.as_deref() == Some(employee_id))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email == email))
    }
}

#[async_trait]
impl KycStore for MemoryStore {
    async fn insert(&self, record: KycRecord) -> StoreResult<KycRecord> {
        let mut kyc = self.kyc.write().await;
        if kyc.iter().any(|r| r.kyc_number == record.kyc_number) {
            return Err(StoreError::Duplicate("kycNumber"));
        }
        kyc.push(record.clone());
        Ok(record)
    }

    async fn find_by_kyc_number(&self, kyc_number: &str) -> StoreResult<Option<KycRecord>> {
        let kyc = self.kyc.read().await;
        Ok(kyc.iter().find(|r| r.kyc_number == kyc_number).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<KycRecord>> {
        let kyc = self.kyc.read().await;
        Ok(kyc.iter().find(|r| r.user_id == user_id).cloned())
    }

    async fn list_by_status(&self, status: KycStatus) -> StoreResult<Vec<KycRecord>> {
        let kyc = self.kyc.read().await;
        let matches: Vec<KycRecord> =
            kyc.iter().filter(|r| r.status == status).cloned().collect();
        Ok(newest_first(matches, |r| r.created_at))
    }

    async fn exists_by_kyc_number(&self, kyc_number: &str) -> StoreResult<bool> {
        let kyc = self.kyc.read().await;
        Ok(kyc.iter().any(|r| r.kyc_number == kyc_number))
    }

    async fn update(&self, record: &KycRecord) -> StoreResult<()> {
        let mut kyc = self.kyc.write().await;
        if let Some(existing) = kyc.iter_mut().find(|r| r.kyc_number == record.kyc_number) {
            *existing = record.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl LoanStore for MemoryStore {
    async fn insert(&self, app: LoanApplication) -> StoreResult<LoanApplication> {
        let mut loans = self.loans.write().await;
        if loans.iter().any(|a| a.request_id == app.request_id) {
            return Err(StoreError::Duplicate("requestId"));
        }
        loans.push(app.clone());
        Ok(app)
    }

    async fn find_by_request_id(
        &self,
        request_id: &str,
    ) -> StoreResult<Option<LoanApplication>> {
        let loans = self.loans.read().await;
        Ok(loans.iter().find(|a| a.request_id == request_id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<LoanApplication>> {
        let loans = self.loans.read().await;
        let matches: Vec<LoanApplication> = loans
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(matches, |a| a.created_at))
    }

    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<LoanApplication>> {
        let loans = self.loans.read().await;
        let matches: Vec<LoanApplication> = loans
            .iter()
            .filter(|a| a.status == status)
            .cloned()
            .collect();
        Ok(newest_first(matches, |a| a.created_at))
    }

    async fn list_by_kyc_number(
        &self,
        kyc_number: &str,
    ) -> StoreResult<Vec<LoanApplication>> {
        let loans = self.loans.read().await;
        let matches: Vec<LoanApplication> = loans
            .iter()
            .filter(|a| a.kyc_number == kyc_number)
            .cloned()
            .collect();
        Ok(newest_first(matches, |a| a.created_at))
    }

    async fn exists_by_request_id(&self, request_id: &str) -> StoreResult<bool> {
        let loans = self.loans.read().await;
        Ok(loans.iter().any(|a| a.request_id == request_id))
    }

    async fn list_pending(&self) -> StoreResult<Vec<LoanApplication>> {
        let loans = self.loans.read().await;
        let matches: Vec<LoanApplication> = loans
            .iter()
            .filter(|a| ApplicationStatus::REVIEW_QUEUE.contains(&a.status))
            .cloned()
            .collect();
        Ok(newest_first(matches, |a| a.created_at))
    }

    async fn update(&self, app: &LoanApplication) -> StoreResult<()> {
        let mut loans = self.loans.write().await;
        if let Some(existing) = loans.iter_mut().find(|a| a.request_id == app.request_id) {
            *existing = app.clone();
        }
        Ok(())
    }
}
