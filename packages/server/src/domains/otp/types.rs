//! OTP domain data types

use std::time::Duration;

use anyhow::{ensure, Result};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domains::otp::models::OtpKey;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_CODE_LENGTH: usize = 6;

pub const VERIFIED_MESSAGE: &str = "OTP verified successfully.";

/// Issuance and lockout knobs shared by the issuer and the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    pub ttl: Duration,
    pub max_attempts: u32,
    pub code_length: usize,
}

impl OtpPolicy {
    pub fn new(ttl: Duration, max_attempts: u32, code_length: usize) -> Result<Self> {
        ensure!(max_attempts >= 1, "OTP max attempts must be at least 1");
        ensure!(
            (4..=10).contains(&code_length),
            "OTP code length must be between 4 and 10, got {}",
            code_length
        );
        ensure!(!ttl.is_zero(), "OTP TTL must be greater than zero");

        Ok(Self {
            ttl,
            max_attempts,
            code_length,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

/// Why a submitted code was rejected. The display text is what clients see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OtpFailure {
    #[error("No OTP found. Please request a new one.")]
    NotFound,

    #[error("OTP expired. Please request a new one.")]
    Expired,

    #[error("Too many attempts. Please request a new one.")]
    TooManyAttempts,

    #[error("Invalid OTP. {remaining} attempts remaining.")]
    Mismatch { remaining: u32 },
}

/// Result of verifying OTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOtpResult {
    Verified,
    Failed { reason: OtpFailure },
}

impl VerifyOtpResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyOtpResult::Verified)
    }

    pub fn message(&self) -> String {
        match self {
            VerifyOtpResult::Verified => VERIFIED_MESSAGE.to_string(),
            VerifyOtpResult::Failed { reason } => reason.to_string(),
        }
    }
}

impl From<OtpFailure> for VerifyOtpResult {
    fn from(reason: OtpFailure) -> Self {
        VerifyOtpResult::Failed { reason }
    }
}

/// Result of issuing an OTP. The code itself only goes to the delivery channel.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub key: OtpKey,
    pub expires_at: DateTime<Utc>,
}
