//! OTP domain - one-time passcode issuance and verification
//!
//! Responsibilities:
//! - Normalized (email, phone) keys
//! - In-memory store of pending codes with lazy expiry
//! - Issuing codes through a delivery channel
//! - Verifying codes with an attempt limit

pub mod actions;
pub mod models;
pub mod store;
pub mod types;

pub use actions::{issue_otp, verify_otp};
pub use models::{OtpEntry, OtpKey};
pub use store::OtpStore;
pub use types::{IssuedOtp, OtpFailure, OtpPolicy, VerifyOtpResult};
