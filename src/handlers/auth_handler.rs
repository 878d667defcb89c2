//! Authentication handler
//!
//! Stateless bank-employee login and registration. No session or token
//! is issued; each request authenticates from scratch.

use crate::auth;
use crate::domain::{User, UserType};
use crate::error::AppError;
use crate::store::{StoreError, Stores};

use super::{LoginCommand, RegisterCommand};

pub struct AuthHandler {
    stores: Stores,
}

impl AuthHandler {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Authenticate a bank employee. All failure modes collapse into
    /// one generic error so the endpoint cannot be used to enumerate
    /// accounts.
    pub async fn login(&self, command: LoginCommand) -> Result<User, AppError> {
        let user = self.stores.users.find_by_email(&command.email).await?;

        match user {
            Some(user)
                if user.user_type == UserType::BankEmployee
                    && auth::verify_password(&command.password, &user.password_hash) =>
            {
                Ok(user)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// Register a bank employee. Email uniqueness is enforced by the
    /// store's atomic insert, not by a racy pre-check; the stored type
    /// is always BANK_EMPLOYEE.
    pub async fn register(&self, command: RegisterCommand) -> Result<User, AppError> {
        if command.email.is_empty() || !command.email.contains('@') {
            return Err(AppError::validation("email", "a valid email is required"));
        }
        if command.password.is_empty() {
            return Err(AppError::validation("password", "password is required"));
        }

        let user = User::bank_employee(
            command.name,
            command.email,
            auth::hash_password(&command.password),
        );

        match self.stores.users.insert(user).await {
            Ok(user) => {
                tracing::info!(email = %user.email, "registered bank employee");
                Ok(user)
            }
            Err(StoreError::Duplicate(_)) => Err(AppError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }
}
