// TestDependencies - mock implementations for testing
//
// Provides a recording delivery channel that can be injected into ServerDeps.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseOtpDelivery, ServerDeps};
use crate::domains::otp::{OtpPolicy, OtpStore};

// =============================================================================
// Mock OTP Delivery
// =============================================================================

/// One captured delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryCall {
    pub email: String,
    pub phone: String,
    pub code: String,
}

pub struct MockOtpDelivery {
    calls: Arc<Mutex<Vec<DeliveryCall>>>,
    fail_with: Option<String>,
    delay: Option<Duration>,
}

impl MockOtpDelivery {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            delay: None,
        }
    }

    /// Every delivery fails with the given message (calls are still recorded).
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Every delivery waits this long before answering, like a stalled provider.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<DeliveryCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Most recent code delivered to this phone (normalized form).
    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|c| c.phone == phone)
            .map(|c| c.code.clone())
    }
}

impl Default for MockOtpDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOtpDelivery for MockOtpDelivery {
    async fn deliver(&self, email: &str, phone: &str, code: &str) -> Result<()> {
        self.calls.lock().unwrap().push(DeliveryCall {
            email: email.to_string(),
            phone: phone.to_string(),
            code: code.to_string(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.fail_with {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(()),
        }
    }

    fn channel(&self) -> &'static str {
        "mock"
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Builder for ServerDeps wired to mocks
pub struct TestDependencies {
    pub policy: OtpPolicy,
    pub delivery: Arc<MockOtpDelivery>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            policy: OtpPolicy::default(),
            delivery: Arc::new(MockOtpDelivery::new()),
        }
    }

    pub fn with_policy(mut self, policy: OtpPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_delivery(mut self, delivery: MockOtpDelivery) -> Self {
        self.delivery = Arc::new(delivery);
        self
    }

    /// Fresh store, configured policy, recording delivery.
    pub fn into_server_deps(self) -> (ServerDeps, Arc<MockOtpDelivery>) {
        let deps = ServerDeps::new(OtpStore::new(), self.policy, self.delivery.clone());
        (deps, self.delivery)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
