//! Quote text normalization and password policy helpers.

use crate::constants::{MIN_REGISTER_PASSWORD_STRENGTH, MIN_USERNAME_LEN};
use crate::error::ClientError;

/// Trim an optional string and drop empty values.
pub fn normalize_optional_nonempty(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Reject quote text that is empty after trimming.
///
/// The original text is returned unmodified when accepted; the server
/// receives what the user typed.
pub fn require_quote_text(text: &str) -> Result<&str, ClientError> {
    if text.trim().is_empty() {
        return Err(ClientError::validation("Quote text must not be empty"));
    }
    Ok(text)
}

/// Coarse password strength label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => Self::Weak,
            2 | 3 => Self::Medium,
            _ => Self::Strong,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }
}

/// Score a password from 0 to 4.
///
/// One point each for length >= 8, an uppercase letter, a digit, and a
/// character outside `[A-Za-z0-9]`.
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|ch| ch.is_ascii_uppercase()),
        password.chars().any(|ch| ch.is_ascii_digit()),
        password.chars().any(|ch| !ch.is_ascii_alphanumeric()),
    ];
    checks.iter().filter(|passed| **passed).count() as u8
}

/// Strict policy: length >= 8 with upper, lower, digit, and symbol present.
pub fn is_password_secure(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|ch| ch.is_ascii_uppercase())
        && password.chars().any(|ch| ch.is_ascii_lowercase())
        && password.chars().any(|ch| ch.is_ascii_digit())
        && password.chars().any(|ch| !ch.is_ascii_alphanumeric())
}

/// Local checks applied before a login request is sent.
pub fn validate_login(username: &str, password: &str) -> Result<(), ClientError> {
    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(ClientError::validation(
            "Please enter both username and password",
        ));
    }
    Ok(())
}

/// Local checks applied before a registration request is sent.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ClientError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ClientError::validation(format!(
            "Username must be at least {} characters.",
            MIN_USERNAME_LEN
        )));
    }
    let fields_ok = !password.is_empty()
        && !confirm.is_empty()
        && password == confirm
        && password_strength(password) >= MIN_REGISTER_PASSWORD_STRENGTH;
    if !fields_ok {
        return Err(ClientError::validation(
            "Please fill in all fields correctly.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_quote_text_rejects_blank() {
        assert!(require_quote_text("").is_err());
        assert!(require_quote_text("   \t").is_err());
        assert_eq!(require_quote_text("  keep  ").expect("accepted"), "  keep  ");
    }

    #[test]
    fn normalize_optional_nonempty_trims_and_drops_blank() {
        assert_eq!(
            normalize_optional_nonempty(Some("  value  ".to_string())),
            Some("value".to_string())
        );
        assert_eq!(normalize_optional_nonempty(Some("   ".to_string())), None);
        assert_eq!(normalize_optional_nonempty(None), None);
    }

    #[test]
    fn password_strength_scores_each_criterion() {
        let cases = [
            ("abc", 0, PasswordStrength::Weak),
            ("abcdefgh", 1, PasswordStrength::Weak),
            ("Abcdefgh", 2, PasswordStrength::Medium),
            ("Abcdefg1", 3, PasswordStrength::Medium),
            ("Abcdef1!", 4, PasswordStrength::Strong),
        ];
        for (password, score, label) in cases {
            assert_eq!(password_strength(password), score, "password: {}", password);
            assert_eq!(PasswordStrength::from_score(score), label);
        }
    }

    #[test]
    fn secure_password_needs_lowercase_too() {
        assert!(is_password_secure("Abcdef1!"));
        assert!(!is_password_secure("ABCDEF1!"));
        assert!(!is_password_secure("Ab1!"));
    }

    #[test]
    fn registration_rules() {
        assert_eq!(
            validate_registration("bob", "Abcdef1!", "Abcdef1!")
                .expect_err("short username")
                .to_string(),
            "Username must be at least 6 characters."
        );
        assert!(validate_registration("bobbyb", "Abcdef1!", "Abcdef1?").is_err());
        assert!(validate_registration("bobbyb", "abcdefgh", "abcdefgh").is_err());
        assert!(validate_registration("bobbyb", "Abcdefg1", "Abcdefg1").is_ok());
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login(" ", "pw").is_err());
        assert!(validate_login("user", "").is_err());
        assert!(validate_login("user", "pw").is_ok());
    }
}
