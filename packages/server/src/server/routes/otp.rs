//! OTP endpoints.
//!
//! POST /otp/send    - issue a code and deliver it
//! POST /otp/verify  - check a submitted code
//! GET  /otp/debug   - inspect a pending entry (opt-in, see `Config::otp_debug_enabled`)

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::common::ApiError;
use crate::domains::otp::{issue_otp, verify_otp, OtpEntry, OtpKey};
use crate::server::app::AppState;

pub const SEND_REQUIRED_MESSAGE: &str = "Email and phone are required";
pub const VERIFY_REQUIRED_MESSAGE: &str = "Email, phone, and OTP are required";
pub const DEBUG_REQUIRED_MESSAGE: &str = "Email and phone query parameters are required";
pub const SENT_MESSAGE: &str = "OTP sent successfully.";

/// Fields are optional so a missing one maps to our own 400 instead of a 422.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    email: Option<String>,
    phone: Option<String>,
    otp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DebugOtpQuery {
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugOtpResponse {
    key: String,
    found: bool,
    entry: Option<OtpEntry>,
    is_expired: bool,
    now: DateTime<Utc>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn send_otp_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::validation(SEND_REQUIRED_MESSAGE))?;
    let (Some(email), Some(phone)) = (required(request.email), required(request.phone)) else {
        return Err(ApiError::validation(SEND_REQUIRED_MESSAGE));
    };

    issue_otp(&email, &phone, &state.deps).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "message": SENT_MESSAGE })),
    )
        .into_response())
}

pub async fn verify_otp_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::validation(VERIFY_REQUIRED_MESSAGE))?;
    let (Some(email), Some(phone), Some(otp)) = (
        required(request.email),
        required(request.phone),
        required(request.otp),
    ) else {
        return Err(ApiError::validation(VERIFY_REQUIRED_MESSAGE));
    };

    let result = verify_otp(&email, &phone, &otp, &state.deps).await;

    let response = if result.is_valid() {
        (
            StatusCode::OK,
            Json(json!({ "success": true, "message": result.message() })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": result.message() })),
        )
    };

    Ok(response.into_response())
}

/// Diagnostic view of a pending entry. Exposes the secret code.
pub async fn debug_otp_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<DebugOtpQuery>,
) -> Result<Json<DebugOtpResponse>, ApiError> {
    let (Some(email), Some(phone)) = (required(query.email), required(query.phone)) else {
        return Err(ApiError::validation(DEBUG_REQUIRED_MESSAGE));
    };

    let key = OtpKey::new(&email, &phone);
    let entry = state.deps.otp_store.get_key(&key).await;
    let now = Utc::now();
    let is_expired = entry.as_ref().is_some_and(|e| e.expires_at < now);

    tracing::debug!(key = %key.fingerprint(), found = entry.is_some(), "OTP debug lookup");

    Ok(Json(DebugOtpResponse {
        key: key.to_string(),
        found: entry.is_some(),
        entry,
        is_expired,
        now,
    }))
}
