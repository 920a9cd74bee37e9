//! OTP domain actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP routes.

mod issue_otp;
mod verify_otp;

pub use issue_otp::{generate_code, issue_otp};
pub use verify_otp::{codes_match, verify_otp};
