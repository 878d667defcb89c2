//! Postgres storage backend
//!
//! Runtime sqlx queries over three tables, one per entity. Uniqueness
//! of email / kycNumber / requestId is carried by `UNIQUE` columns, so
//! a colliding insert fails in the database rather than in a racy
//! application-level pre-check. DDL lives in `migrations/`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    ApplicationStatus, AssetDetails, BankDetails, KycDocuments, KycRecord, KycStatus,
    LoanApplication, User,
};

use super::{KycStore, LoanStore, StoreError, StoreResult, UserStore};

/// Postgres store implementing all three persistence contracts.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(field: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            StoreError::Duplicate(field)
        }
        _ => StoreError::Database(e),
    }
}

fn decode_error(message: String) -> StoreError {
    StoreError::Database(sqlx::Error::Decode(message.into()))
}

type UserRow = (
    Uuid,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn user_from_row(row: UserRow) -> StoreResult<User> {
    let (id, name, email, password_hash, user_type, kyc_number, employee_id, active, created_at, updated_at) =
        row;
    Ok(User {
        id,
        name,
        email,
        password_hash,
        user_type: user_type.parse().map_err(decode_error)?,
        kyc_number,
        employee_id,
        active,
        created_at,
        updated_at,
    })
}

const SELECT_USER: &str = r#"
    SELECT id, name, email, password_hash, user_type, kyc_number, employee_id,
           active, created_at, updated_at
    FROM users
"#;

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: User) -> StoreResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, email, password_hash, user_type, kyc_number, employee_id,
                 active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.user_type.as_str())
        .bind(&user.kyc_number)
        .bind(&user.employee_id)
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation("email"))?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE email = $1", SELECT_USER))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.map(user_from_row).transpose()
    }

    async fn find_by_kyc_number(&self, kyc_number: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE kyc_number = $1", SELECT_USER))
                .bind(kyc_number)
                .fetch_optional(&self.pool)
                .await?;
        row.map(user_from_row).transpose()
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE employee_id = $1", SELECT_USER))
                .bind(employee_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(user_from_row).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

type KycRow = (
    Uuid,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn kyc_from_row(row: KycRow) -> StoreResult<KycRecord> {
    let (
        id,
        kyc_number,
        user_id,
        status,
        aadhaar_number,
        pan_number,
        driving_license,
        passport,
        aadhaar_image_url,
        pan_image_url,
        driving_license_image_url,
        passport_image_url,
        verification_notes,
        created_at,
        updated_at,
    ) = row;
    Ok(KycRecord {
        id,
        kyc_number,
        user_id,
        status: status.parse().map_err(decode_error)?,
        documents: KycDocuments {
            aadhaar_number,
            pan_number,
            driving_license,
            passport,
            aadhaar_image_url,
            pan_image_url,
            driving_license_image_url,
            passport_image_url,
        },
        verification_notes,
        created_at,
        updated_at,
    })
}

const SELECT_KYC: &str = r#"
    SELECT id, kyc_number, user_id, status, aadhaar_number, pan_number,
           driving_license, passport, aadhaar_image_url, pan_image_url,
           driving_license_image_url, passport_image_url, verification_notes,
           created_at, updated_at
    FROM kyc_records
"#;

#[async_trait]
impl KycStore for PgStore {
    async fn insert(&self, record: KycRecord) -> StoreResult<KycRecord> {
        sqlx::query(
            r#"
            INSERT INTO kyc_records
                (id, kyc_number, user_id, status, aadhaar_number, pan_number,
                 driving_license, passport, aadhaar_image_url, pan_image_url,
                 driving_license_image_url, passport_image_url, verification_notes,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(record.id)
        .bind(&record.kyc_number)
        .bind(&record.user_id)
        .bind(record.status.as_str())
        .bind(&record.documents.aadhaar_number)
        .bind(&record.documents.pan_number)
        .bind(&record.documents.driving_license)
        .bind(&record.documents.passport)
        .bind(&record.documents.aadhaar_image_url)
        .bind(&record.documents.pan_image_url)
        .bind(&record.documents.driving_license_image_url)
        .bind(&record.documents.passport_image_url)
        .bind(&record.verification_notes)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation("kycNumber"))?;

        Ok(record)
    }

    async fn find_by_kyc_number(&self, kyc_number: &str) -> StoreResult<Option<KycRecord>> {
        let row: Option<KycRow> =
            sqlx::query_as(&format!("{} WHERE kyc_number = $1", SELECT_KYC))
                .bind(kyc_number)
                .fetch_optional(&self.pool)
                .await?;
        row.map(kyc_from_row).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<KycRecord>> {
        let row: Option<KycRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1 LIMIT 1", SELECT_KYC))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(kyc_from_row).transpose()
    }

    async fn list_by_status(&self, status: KycStatus) -> StoreResult<Vec<KycRecord>> {
        let rows: Vec<KycRow> = sqlx::query_as(&format!(
            "{} WHERE status = $1 ORDER BY created_at DESC",
            SELECT_KYC
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(kyc_from_row).collect()
    }

    async fn exists_by_kyc_number(&self, kyc_number: &str) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM kyc_records WHERE kyc_number = $1)",
        )
        .bind(kyc_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn update(&self, record: &KycRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE kyc_records
            SET status = $2, verification_notes = $3, updated_at = $4
            WHERE kyc_number = $1
            "#,
        )
        .bind(&record.kyc_number)
        .bind(record.status.as_str())
        .bind(&record.verification_notes)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

type LoanRow = (
    Uuid,
    String,
    String,
    String,
    String,
    Json<AssetDetails>,
    Json<BankDetails>,
    Decimal,
    Option<Decimal>,
    Option<Decimal>,
    Option<String>,
    Vec<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn loan_from_row(row: LoanRow) -> StoreResult<LoanApplication> {
    let (
        id,
        request_id,
        user_id,
        kyc_number,
        status,
        asset_details,
        bank_details,
        requested_amount,
        approved_amount,
        gold_quality_index,
        evaluation_notes,
        suspicious_flags,
        created_at,
        updated_at,
    ) = row;
    Ok(LoanApplication {
        id,
        request_id,
        user_id,
        kyc_number,
        status: status.parse().map_err(decode_error)?,
        asset_details: asset_details.0,
        bank_details: bank_details.0,
        requested_amount,
        approved_amount,
        gold_quality_index,
        evaluation_notes,
        suspicious_flags,
        created_at,
        updated_at,
    })
}

const SELECT_LOAN: &str = r#"
    SELECT id, request_id, user_id, kyc_number, status, asset_details,
           bank_details, requested_amount, approved_amount, gold_quality_index,
           evaluation_notes, suspicious_flags, created_at, updated_at
    FROM loan_applications
"#;

#[async_trait]
impl LoanStore for PgStore {
    async fn insert(&self, app: LoanApplication) -> StoreResult<LoanApplication> {
        sqlx::query(
            r#"
            INSERT INTO loan_applications
                (id, request_id, user_id, kyc_number, status, asset_details,
                 bank_details, requested_amount, approved_amount, gold_quality_index,
                 evaluation_notes, suspicious_flags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(app.id)
        .bind(&app.request_id)
        .bind(&app.user_id)
        .bind(&app.kyc_number)
        .bind(app.status.as_str())
        .bind(Json(&app.asset_details))
        .bind(Json(&app.bank_details))
        .bind(app.requested_amount)
        .bind(app.approved_amount)
        .bind(app.gold_quality_index)
        .bind(&app.evaluation_notes)
        .bind(&app.suspicious_flags)
        .bind(app.created_at)
        .bind(app.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation("requestId"))?;

        Ok(app)
    }

    async fn find_by_request_id(
        &self,
        request_id: &str,
    ) -> StoreResult<Option<LoanApplication>> {
        let row: Option<LoanRow> =
            sqlx::query_as(&format!("{} WHERE request_id = $1", SELECT_LOAN))
                .bind(request_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(loan_from_row).transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<LoanApplication>> {
        let rows: Vec<LoanRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_LOAN
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(loan_from_row).collect()
    }

    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<LoanApplication>> {
        let rows: Vec<LoanRow> = sqlx::query_as(&format!(
            "{} WHERE status = $1 ORDER BY created_at DESC",
            SELECT_LOAN
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(loan_from_row).collect()
    }

    async fn list_by_kyc_number(
        &self,
        kyc_number: &str,
    ) -> StoreResult<Vec<LoanApplication>> {
        let rows: Vec<LoanRow> = sqlx::query_as(&format!(
            "{} WHERE kyc_number = $1 ORDER BY created_at DESC",
            SELECT_LOAN
        ))
        .bind(kyc_number)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(loan_from_row).collect()
    }

    async fn exists_by_request_id(&self, request_id: &str) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM loan_applications WHERE request_id = $1)",
        )
        .bind(request_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_pending(&self) -> StoreResult<Vec<LoanApplication>> {
        let statuses: Vec<&str> = ApplicationStatus::REVIEW_QUEUE
            .iter()
            .map(|s| s.as_str())
            .collect();
        let rows: Vec<LoanRow> = sqlx::query_as(&format!(
            "{} WHERE status = ANY($1) ORDER BY created_at DESC",
            SELECT_LOAN
        ))
        .bind(&statuses)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(loan_from_row).collect()
    }

    async fn update(&self, app: &LoanApplication) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE loan_applications
            SET status = $2, approved_amount = $3, gold_quality_index = $4,
                evaluation_notes = $5, suspicious_flags = $6, updated_at = $7
            WHERE request_id = $1
            "#,
        )
        .bind(&app.request_id)
        .bind(app.status.as_str())
        .bind(app.approved_amount)
        .bind(app.gold_quality_index)
        .bind(&app.evaluation_notes)
        .bind(&app.suspicious_flags)
        .bind(app.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
