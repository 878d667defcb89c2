//! Command Handlers module
//!
//! Each handler coordinates domain rules and the persistence contracts
//! for one operation family.

mod auth_handler;
mod commands;
mod kyc_handler;
mod loan_handler;


pub use auth_handler::AuthHandler;
pub use commands::*;
pub use kyc_handler::KycHandler;
pub use loan_handler::LoanHandler;
