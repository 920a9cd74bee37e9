//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::ServerDeps;
use crate::server::middleware::with_otp_rate_limit;
use crate::server::routes::{
    debug_otp_handler, health_handler, send_otp_handler, verify_otp_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

fn build_cors(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {o}"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]))
}

/// Build the Axum application router
///
/// The debug route is only registered when `config.otp_debug_enabled` is set;
/// otherwise `/otp/debug` is a plain 404. Requests running longer than
/// `config.request_timeout()` (a stuck SMS provider, say) get 408.
pub fn build_app(deps: ServerDeps, config: &Config) -> Result<Router> {
    let app_state = AppState {
        deps: Arc::new(deps),
    };

    let mut otp_routes = Router::new()
        .route("/otp/send", post(send_otp_handler))
        .route("/otp/verify", post(verify_otp_handler));

    if config.otp_debug_enabled {
        tracing::warn!(
            "GET /otp/debug is enabled and exposes live OTP codes. Never enable this in production."
        );
        otp_routes = otp_routes.route("/otp/debug", get(debug_otp_handler));
    }

    if config.rate_limit_enabled {
        otp_routes = with_otp_rate_limit(otp_routes)?;
    }

    let cors = build_cors(&config.allowed_origins)?;

    let app = Router::new()
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        .merge(otp_routes)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
