//! User record
//!
//! Identity record for both customers and bank employees. Passwords are
//! stored as salted hashes; the plain password never reaches this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids;

/// User classification. Only bank employees may authenticate through
/// the bank login endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    BankEmployee,
    Customer,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankEmployee => "BANK_EMPLOYEE",
            Self::Customer => "CUSTOMER",
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BANK_EMPLOYEE" => Ok(Self::BankEmployee),
            "CUSTOMER" => Ok(Self::Customer),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

/// Identity record. Email is unique across all users; uniqueness is
/// enforced by the store's insert, not by a pre-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub kyc_number: Option<String>,
    pub employee_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a bank employee record. Registration always produces this
    /// type regardless of what the caller submitted, and assigns a
    /// generated employee ID.
    pub fn bank_employee(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            user_type: UserType::BankEmployee,
            kyc_number: None,
            employee_id: Some(ids::employee_id()),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_employee_forces_type() {
        let user = User::bank_employee(
            "Asha Rao".to_string(),
            "asha@bank.test".to_string(),
            "salt$hash".to_string(),
        );

        assert_eq!(user.user_type, UserType::BankEmployee);
        assert!(user.active);
        assert!(user.employee_id.as_deref().unwrap().starts_with("EMP"));
        assert!(user.kyc_number.is_none());
    }

    #[test]
    fn test_user_type_round_trip() {
        for t in [UserType::BankEmployee, UserType::Customer] {
            assert_eq!(t.as_str().parse::<UserType>().unwrap(), t);
        }
        assert!("ADMIN".parse::<UserType>().is_err());
    }

    #[test]
    fn test_user_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&UserType::BankEmployee).unwrap(),
            "\"BANK_EMPLOYEE\""
        );
    }
}
