//! External-facing identifier generation
//!
//! KYC numbers and loan request IDs are operator-visible codes, distinct
//! from the internal storage UUIDs. The legacy scheme was a bare
//! millisecond timestamp behind a fixed prefix, which collides for two
//! records created in the same clock tick. We keep the prefix and the
//! timestamp component but append a random suffix so same-tick
//! constructions stay distinct.

use chrono::Utc;
use rand::Rng;

/// Generate a KYC number, e.g. `KYC1755862390123a41f`.
pub fn kyc_number() -> String {
    prefixed_code("KYC")
}

/// Generate a loan request ID, e.g. `RID1755862390123c07b`.
pub fn request_id() -> String {
    prefixed_code("RID")
}

/// Generate a bank employee ID, e.g. `EMP7K2QX9`.
pub fn employee_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("EMP{}", suffix)
}

fn prefixed_code(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().gen();
    format!("{}{}{:04x}", prefix, millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kyc_number_prefix() {
        let code = kyc_number();
        assert!(code.starts_with("KYC"));
        assert!(code.len() > "KYC".len() + 13);
    }

    #[test]
    fn test_request_id_prefix() {
        assert!(request_id().starts_with("RID"));
    }

    #[test]
    fn test_codes_are_distinct() {
        // Distinct even within the same clock tick thanks to the suffix.
        let codes: Vec<String> = (0..64).map(|_| request_id()).collect();
        let mut deduped = codes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
    }

    #[test]
    fn test_employee_id_shape() {
        let id = employee_id();
        assert!(id.starts_with("EMP"));
        assert_eq!(id.len(), 9);
        assert!(id[3..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
