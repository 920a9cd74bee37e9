//! Issue OTP action

use anyhow::{ensure, Context, Result};
use rand::Rng;
use tracing::{error, info};

use crate::domains::otp::models::OtpKey;
use crate::domains::otp::types::IssuedOtp;
use crate::kernel::ServerDeps;

/// Random numeric code of `length` digits. Leading zeros are kept.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Generate a code, store it under (email, phone) and deliver it.
///
/// Overwrites any pending code for the same key. If delivery fails the new
/// entry is withdrawn again, unless a newer issuance already replaced it
/// (even one that happened to draw the same code).
pub async fn issue_otp(email: &str, phone: &str, deps: &ServerDeps) -> Result<IssuedOtp> {
    let key = OtpKey::new(email, phone);
    ensure!(key.is_complete(), "Email and phone are required to issue an OTP");

    let policy = &deps.otp_policy;
    let code = generate_code(policy.code_length);
    let entry = deps.otp_store.put_key(&key, code.clone(), policy.ttl).await;

    if let Err(e) = deps
        .delivery
        .deliver(key.email(), key.phone(), &code)
        .await
    {
        error!(
            key = %key.fingerprint(),
            channel = deps.delivery.channel(),
            error = %e,
            "Failed to deliver OTP"
        );
        deps.otp_store
            .update(&key, |current| match current {
                Some(current) if current == entry => (None, ()),
                other => (other, ()),
            })
            .await;
        return Err(e).context("Failed to deliver OTP");
    }

    info!(
        key = %key.fingerprint(),
        channel = deps.delivery.channel(),
        expires_at = %entry.expires_at,
        "OTP issued"
    );

    Ok(IssuedOtp {
        key,
        expires_at: entry.expires_at,
    })
}
