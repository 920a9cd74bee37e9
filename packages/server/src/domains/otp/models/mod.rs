pub mod entry;
pub mod key;

pub use entry::OtpEntry;
pub use key::{normalize_email, normalize_phone, OtpKey, KEY_SEPARATOR};
