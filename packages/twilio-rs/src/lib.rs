// Minimal Twilio Programmable Messaging client used for OTP delivery.
// https://www.twilio.com/docs/messaging/api/message-resource

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

pub mod models;

use crate::models::{ApiErrorResponse, MessageResponse};

const DEFAULT_API_BASE: &str = "https://api.twilio.com";
/// Upper bound for one API call, connect through body
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("Request to Twilio failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Twilio returned an error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid Twilio options: {0}")]
    InvalidOptions(&'static str),
}

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 format
    pub from_number: String,
}

impl TwilioOptions {
    pub fn validate(&self) -> Result<(), TwilioError> {
        if self.account_sid.trim().is_empty() {
            return Err(TwilioError::InvalidOptions("account_sid is empty"));
        }
        if self.auth_token.trim().is_empty() {
            return Err(TwilioError::InvalidOptions("auth_token is empty"));
        }
        if self.from_number.trim().is_empty() {
            return Err(TwilioError::InvalidOptions("from_number is empty"));
        }
        Ok(())
    }
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
    api_base: String,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: build_client(DEFAULT_TIMEOUT),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Point the client at a different API host (local fakes, regional edges).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{base}/2010-04-01/Accounts/{sid}/Messages.json",
            base = self.api_base,
            sid = self.options.account_sid
        )
    }

    fn message_form<'a>(&'a self, to: &'a str, body: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("To", to),
            ("From", self.options.from_number.as_str()),
            ("Body", body),
        ]
    }

    /// Send a plain SMS.
    pub async fn send_sms(&self, to: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&self.message_form(to, body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&raw)
                .map(|e| match e.code {
                    Some(code) => format!("{} (code {})", e.message, code),
                    None => e.message,
                })
                .unwrap_or(raw);
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<MessageResponse>().await?)
    }
}
