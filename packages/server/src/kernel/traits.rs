// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Issuance and verification rules live in domains/otp/actions.
//
// Naming convention: Base* for trait names (e.g., BaseOtpDelivery)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// OTP Delivery Trait (Infrastructure - SMS/email)
// =============================================================================

#[async_trait]
pub trait BaseOtpDelivery: Send + Sync {
    /// Hand a freshly issued code to the user behind (email, phone).
    /// Identifiers arrive already normalized.
    async fn deliver(&self, email: &str, phone: &str, code: &str) -> Result<()>;

    /// Short name for logs
    fn channel(&self) -> &'static str;
}
