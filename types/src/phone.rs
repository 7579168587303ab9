//! Phone number identity type.
//!
//! The phone number is the sole identity key in Civis. Ownership of the
//! number is attested by the external identity provider; this type only
//! enforces well-formedness.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A normalized phone number in E.164-like form: an optional leading `+`
/// followed by 7–15 digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhoneNumber(String);

#[derive(Debug, Error)]
pub enum PhoneNumberError {
    #[error("phone number is empty")]
    Empty,

    #[error("phone number {0:?} contains non-digit characters")]
    NonDigit(String),

    #[error("phone number {0:?} has invalid length (expected 7-15 digits)")]
    BadLength(String),
}

impl PhoneNumber {
    /// Parse and normalize a phone number. Whitespace is trimmed; a single
    /// leading `+` is preserved.
    pub fn parse(raw: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PhoneNumberError::Empty);
        }
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneNumberError::NonDigit(trimmed.to_string()));
        }
        if digits.len() < 7 || digits.len() > 15 {
            return Err(PhoneNumberError::BadLength(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Construct from a string already known to be well-formed
    /// (e.g. read back from a store that only persists parsed numbers).
    ///
    /// # Panics
    /// Panics if the string does not parse.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        Self::parse(&s).expect("well-formed phone number")
    }

    /// Return the raw number string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_digits() {
        let p = PhoneNumber::parse("5551234567").unwrap();
        assert_eq!(p.as_str(), "5551234567");
    }

    #[test]
    fn parses_plus_prefix_and_trims() {
        let p = PhoneNumber::parse("  +15551234567 ").unwrap();
        assert_eq!(p.as_str(), "+15551234567");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            PhoneNumber::parse("   "),
            Err(PhoneNumberError::Empty)
        ));
    }

    #[test]
    fn rejects_letters() {
        assert!(matches!(
            PhoneNumber::parse("555-CALL-NOW"),
            Err(PhoneNumberError::NonDigit(_))
        ));
    }

    #[test]
    fn rejects_too_short_and_too_long() {
        assert!(matches!(
            PhoneNumber::parse("123456"),
            Err(PhoneNumberError::BadLength(_))
        ));
        assert!(matches!(
            PhoneNumber::parse("+1234567890123456"),
            Err(PhoneNumberError::BadLength(_))
        ));
    }
}
