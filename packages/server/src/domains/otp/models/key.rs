use std::fmt;

use sha2::{Digest, Sha256};

/// Separator between the normalized email and phone in the rendered key.
pub const KEY_SEPARATOR: char = '|';

/// Normalized (email, phone) pair identifying one pending verification.
///
/// Email is trimmed and lowercased. Phone has every whitespace character
/// removed and is otherwise kept as given, so `"+91 123"` and `"+91123"`
/// address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpKey {
    email: String,
    phone: String,
}

impl OtpKey {
    pub fn new(email: &str, phone: &str) -> Self {
        Self {
            email: normalize_email(email),
            phone: normalize_phone(phone),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Both halves survived normalization.
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.phone.is_empty()
    }

    /// Short SHA256 fingerprint for logs. Raw identifiers are never logged.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_string().as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..12].to_string()
    }
}

impl fmt::Display for OtpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.email, KEY_SEPARATOR, self.phone)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Removes whitespace only. Country codes and other punctuation are kept, so
/// `"+91 123"` and `"123"` are different phones.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace()).collect()
}
