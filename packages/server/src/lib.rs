// One-time passcode service - API Core
//
// Issues and verifies short-lived codes bound to an (email, phone) pair for
// the review platform. Pending codes live in memory for the lifetime of the
// process; delivery goes out through Twilio SMS.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
