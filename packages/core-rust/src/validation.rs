//! Input validation for request parameters.

use std::sync::OnceLock;

use regex::Regex;

/// RFC 5321 upper bound on address length.
const MAX_EMAIL_LEN: usize = 254;

/// Validation failure for a single request field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value is not a syntactically valid email address.
    #[error("invalid email address")]
    InvalidEmail,
    /// The value exceeds the maximum allowed length.
    #[error("value exceeds {max} characters")]
    TooLong {
        /// The enforced maximum.
        max: usize,
    },
    /// The value is empty.
    #[error("value must not be empty")]
    Empty,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Syntactic check only: local part, one `@`, dotted domain. Deliverability
    // is the auth collaborator's problem, not ours.
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("email regex is valid")
    })
}

/// Validates that `value` is a syntactically valid email address.
///
/// # Errors
///
/// Returns a [`ValidationError`] describing the first failed check.
pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty);
    }
    if value.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong { max: MAX_EMAIL_LEN });
    }
    if !email_regex().is_match(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert_eq!(email("valid@example.com"), Ok(()));
        assert_eq!(email("first.last+tag@sub.domain.org"), Ok(()));
    }

    #[test]
    fn rejects_missing_at_sign() {
        assert_eq!(email("not-an-email"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn rejects_missing_domain_dot() {
        assert_eq!(email("user@localhost"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(email(""), Err(ValidationError::Empty));
    }

    #[test]
    fn rejects_whitespace() {
        assert_eq!(email("a b@example.com"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn rejects_overlong_addresses() {
        let long = format!("{}@example.com", "a".repeat(300));
        assert_eq!(email(&long), Err(ValidationError::TooLong { max: 254 }));
    }

    #[test]
    fn rejects_double_at() {
        assert_eq!(email("a@@example.com"), Err(ValidationError::InvalidEmail));
    }
}
