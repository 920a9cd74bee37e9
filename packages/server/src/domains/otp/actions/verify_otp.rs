//! Verify OTP action

use chrono::Utc;
use subtle::ConstantTimeEq;
use tracing::info;

use crate::domains::otp::models::OtpKey;
use crate::domains::otp::types::{OtpFailure, VerifyOtpResult};
use crate::kernel::ServerDeps;

/// Constant-time code comparison. Different lengths never match.
pub fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.as_bytes().ct_eq(submitted.as_bytes()).into()
}

/// Check a submitted code against the pending entry for (email, phone).
///
/// The whole check runs inside one store update, so concurrent wrong guesses
/// are counted one at a time. Terminal outcomes (success, expiry, lockout)
/// delete the entry; a mismatch keeps it with one more attempt recorded.
pub async fn verify_otp(
    email: &str,
    phone: &str,
    submitted: &str,
    deps: &ServerDeps,
) -> VerifyOtpResult {
    let key = OtpKey::new(email, phone);
    let max_attempts = deps.otp_policy.max_attempts;
    let now = Utc::now();

    let result: VerifyOtpResult = deps
        .otp_store
        .update(&key, |entry| {
            let Some(mut entry) = entry else {
                return (None, OtpFailure::NotFound.into());
            };

            if entry.is_expired_at(now) {
                return (None, OtpFailure::Expired.into());
            }

            if entry.attempts >= max_attempts {
                return (None, OtpFailure::TooManyAttempts.into());
            }

            if codes_match(&entry.code, submitted) {
                return (None, VerifyOtpResult::Verified);
            }

            entry.attempts = entry.attempts.saturating_add(1);
            let remaining = max_attempts.saturating_sub(entry.attempts);
            (Some(entry), OtpFailure::Mismatch { remaining }.into())
        })
        .await;

    match &result {
        VerifyOtpResult::Verified => info!(key = %key.fingerprint(), "OTP verified"),
        VerifyOtpResult::Failed { reason } => {
            info!(key = %key.fingerprint(), reason = ?reason, "OTP verification failed")
        }
    }

    result
}
