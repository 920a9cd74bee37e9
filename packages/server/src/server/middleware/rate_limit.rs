// Rate limiting middleware using tower-governor
//
// Configuration:
// - /otp/*: one request replenished every 2 seconds per IP, bursts up to 10
// - Keeps code guessing and SMS pumping expensive
// - Bucket key comes from SmartIpKeyExtractor: X-Forwarded-For, X-Real-IP or
//   Forwarded, falling back to the peer address (requires
//   `into_make_service_with_connect_info`). A request with none of these is
//   rejected with 500.
// - Responses carry x-ratelimit-* headers

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};

pub const OTP_REPLENISH_SECONDS: u64 = 2;
pub const OTP_BURST_SIZE: u32 = 10;

/// Wrap `router` in the per-client-IP OTP rate limiter.
pub fn with_otp_rate_limit<S>(router: Router<S>) -> Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(OTP_REPLENISH_SECONDS)
            .burst_size(OTP_BURST_SIZE)
            .use_headers()
            .finish()
            .context("Rate limiter configuration is invalid")?,
    );

    Ok(router.layer(GovernorLayer { config }))
}
