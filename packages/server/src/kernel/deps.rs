//! Server dependencies for OTP actions (using traits for testability)
//!
//! This module provides the central dependency container shared by every
//! request handler. External delivery goes through `BaseOtpDelivery`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use twilio::{TwilioOptions, TwilioService};

use crate::config::Config;
use crate::domains::otp::{OtpPolicy, OtpStore};
use crate::kernel::BaseOtpDelivery;

// =============================================================================
// TwilioService Adapter (implements BaseOtpDelivery trait)
// =============================================================================

/// Wrapper around TwilioService that sends the code by SMS
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

pub fn otp_message_body(code: &str) -> String {
    format!("Your verification code is {code}. It expires in a few minutes. Do not share it.")
}

#[async_trait]
impl BaseOtpDelivery for TwilioAdapter {
    async fn deliver(&self, _email: &str, phone: &str, code: &str) -> Result<()> {
        let message = self
            .0
            .send_sms(phone, &otp_message_body(code))
            .await
            .context("Twilio SMS send failed")?;

        tracing::debug!(sid = %message.sid, status = %message.status, "OTP SMS queued");
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "twilio_sms"
    }
}

// =============================================================================
// Log-only delivery (development)
// =============================================================================

/// Writes the code to the log instead of sending it. Development only.
pub struct LogOtpDelivery;

#[async_trait]
impl BaseOtpDelivery for LogOtpDelivery {
    async fn deliver(&self, email: &str, phone: &str, code: &str) -> Result<()> {
        tracing::warn!(
            email = %email,
            phone = %phone,
            code = %code,
            "Twilio not configured: OTP written to log instead of being sent"
        );
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "log"
    }
}

/// Pick the delivery channel from configuration.
pub fn delivery_from_config(
    twilio: Option<&TwilioOptions>,
) -> Result<Arc<dyn BaseOtpDelivery>> {
    match twilio {
        Some(options) => {
            options
                .validate()
                .context("Twilio configuration is incomplete")?;
            let service = Arc::new(TwilioService::new(options.clone()));
            Ok(Arc::new(TwilioAdapter::new(service)))
        }
        None => {
            tracing::warn!("TWILIO_* not set, OTP codes will only be logged");
            Ok(Arc::new(LogOtpDelivery))
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// Pending codes. Cloning shares the same underlying map.
    pub otp_store: OtpStore,
    pub otp_policy: OtpPolicy,
    pub delivery: Arc<dyn BaseOtpDelivery>,
}

impl ServerDeps {
    pub fn new(
        otp_store: OtpStore,
        otp_policy: OtpPolicy,
        delivery: Arc<dyn BaseOtpDelivery>,
    ) -> Self {
        Self {
            otp_store,
            otp_policy,
            delivery,
        }
    }

    /// Build production dependencies: empty store, configured policy and channel.
    pub fn from_config(config: &Config) -> Result<Self> {
        let policy = config.otp_policy()?;
        let delivery = delivery_from_config(config.twilio.as_ref())?;

        tracing::info!(
            channel = delivery.channel(),
            ttl_secs = policy.ttl.as_secs(),
            max_attempts = policy.max_attempts,
            "OTP dependencies ready"
        );

        Ok(Self::new(OtpStore::new(), policy, delivery))
    }
}
