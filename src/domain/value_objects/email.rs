//! Email value object.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$")
        .unwrap_or_else(|e| panic!("email pattern must compile: {e}"))
});

/// A syntactically valid, trimmed email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and normalize an email address.
    ///
    /// # Errors
    /// Returns `InvalidEmail` when the address is not of the form `local@domain.suffix`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let value = raw.trim();
        if EMAIL_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(AppError::InvalidEmail(format!("Invalid email address: {}", value)))
        }
    }

    /// Wrap a value that was validated before it was stored.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for raw in [
            "user@example.com",
            "first.last+tag@sub-domain.co.uk",
            "a_b-c@host.io",
        ] {
            assert!(Email::parse(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for raw in ["", "plainaddress", "user@", "user@host", "@host.com", "user host@x.com"] {
            let result = Email::parse(raw);
            assert!(
                matches!(result, Err(AppError::InvalidEmail(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_is_trimmed() {
        let email = Email::parse("  user@example.com ").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }
}
