//! Test harness for driving the HTTP router in-process.
//!
//! Every test gets its own store and recording delivery channel, so tests
//! never observe each other's codes.

use std::net::SocketAddr;
use std::sync::Arc;

use api_core::domains::otp::OtpStore;
use api_core::kernel::{MockOtpDelivery, TestDependencies};
use api_core::server::build_app;
use api_core::Config;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use test_context::AsyncTestContext;
use tower::ServiceExt;

/// Test harness that owns a router and handles into its dependencies.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.post_json("/otp/send", json!({...})).await;
/// }
/// ```
pub struct TestHarness {
    pub app: Router,
    /// Same store the router uses
    pub store: OtpStore,
    pub delivery: Arc<MockOtpDelivery>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::with_config(Self::test_config(), TestDependencies::new())
    }
}

#[allow(dead_code)]
impl TestHarness {
    /// Debug route on, rate limiting off (requests carry no peer address).
    pub fn test_config() -> Config {
        Config {
            otp_debug_enabled: true,
            rate_limit_enabled: false,
            otp_sweep_enabled: false,
            ..Config::default()
        }
    }

    pub fn with_config(config: Config, deps: TestDependencies) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let (deps, delivery) = deps.into_server_deps();
        let store = deps.otp_store.clone();
        let app = build_app(deps, &config).expect("Failed to build test app");

        Self {
            app,
            store,
            delivery,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, body)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("valid request");
        self.request(request).await
    }

    /// POST as if it arrived over a connection from `peer`, optionally through a
    /// proxy that set `X-Forwarded-For`. The rate limiter needs one of the two.
    pub async fn post_json_from(
        &self,
        uri: &str,
        body: Value,
        peer: SocketAddr,
        forwarded_for: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(forwarded_for) = forwarded_for {
            builder = builder.header("x-forwarded-for", forwarded_for);
        }
        let mut request = builder
            .body(Body::from(body.to_string()))
            .expect("valid request");
        request.extensions_mut().insert(ConnectInfo(peer));
        self.request(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.request(request).await
    }
}
