use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use twilio::TwilioOptions;

use crate::domains::otp::types::{
    OtpPolicy, DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL,
};

pub const DEFAULT_SWEEP_SCHEDULE: &str = "0 * * * * *";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    pub otp_ttl_seconds: u64,
    pub otp_max_attempts: u32,
    pub otp_code_length: usize,
    /// Routes GET /otp/debug, which exposes live codes. Never enable in production.
    pub otp_debug_enabled: bool,
    pub otp_sweep_enabled: bool,
    pub otp_sweep_schedule: String,
    pub rate_limit_enabled: bool,
    /// Requests still running after this are answered with 408
    pub request_timeout_ms: u64,
    /// Present only when all TWILIO_* variables are set
    pub twilio: Option<TwilioOptions>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            allowed_origins: Vec::new(),
            otp_ttl_seconds: DEFAULT_TTL.as_secs(),
            otp_max_attempts: DEFAULT_MAX_ATTEMPTS,
            otp_code_length: DEFAULT_CODE_LENGTH,
            otp_debug_enabled: false,
            otp_sweep_enabled: true,
            otp_sweep_schedule: DEFAULT_SWEEP_SCHEDULE.to_string(),
            rate_limit_enabled: true,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            twilio: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let twilio = match (
            lookup("TWILIO_ACCOUNT_SID"),
            lookup("TWILIO_AUTH_TOKEN"),
            lookup("TWILIO_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioOptions {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            otp_ttl_seconds: parse_or(&lookup, "OTP_TTL_SECONDS", defaults.otp_ttl_seconds)?,
            otp_max_attempts: parse_or(&lookup, "OTP_MAX_ATTEMPTS", defaults.otp_max_attempts)?,
            otp_code_length: parse_or(&lookup, "OTP_CODE_LENGTH", defaults.otp_code_length)?,
            otp_debug_enabled: parse_bool_or(&lookup, "OTP_DEBUG_ENABLED", false)?,
            otp_sweep_enabled: parse_bool_or(&lookup, "OTP_SWEEP_ENABLED", true)?,
            otp_sweep_schedule: lookup("OTP_SWEEP_SCHEDULE")
                .unwrap_or(defaults.otp_sweep_schedule),
            rate_limit_enabled: parse_bool_or(&lookup, "RATE_LIMIT_ENABLED", true)?,
            request_timeout_ms: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            )?,
            twilio,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn otp_policy(&self) -> Result<OtpPolicy> {
        OtpPolicy::new(
            Duration::from_secs(self.otp_ttl_seconds),
            self.otp_max_attempts,
            self.otp_code_length,
        )
        .context("Invalid OTP configuration")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number")),
        None => Ok(default),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => anyhow::bail!("{key} must be a boolean, got {other:?}"),
        },
    }
}
