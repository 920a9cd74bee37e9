//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{delivery_from_config, LogOtpDelivery, ServerDeps, TwilioAdapter};
pub use scheduled_tasks::{run_otp_sweep, start_scheduler};
pub use test_dependencies::{DeliveryCall, MockOtpDelivery, TestDependencies};
pub use traits::*;
