//! Field checks shared by the login, password reset and roster forms.
//!
//! Every function returns `Err(message)` with text suitable for showing
//! next to the offending field.

use validator::ValidateEmail;

/// Minimum password length accepted for new passwords.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A required free-text field must be non-blank.
pub fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    validate_required("Email", email)?;
    if !email.trim().validate_email() {
        return Err(format!("'{}' is not a valid email address", email.trim()));
    }
    Ok(())
}

/// New passwords must meet the minimum length and mix letters with digits.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err("Password must contain both letters and digits".to_string());
    }
    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_email ------------------------------------------------------

    #[test]
    fn valid_email_accepted() {
        assert!(validate_email("dr.house@stemsight.org").is_ok());
    }

    #[test]
    fn malformed_email_rejected() {
        assert!(validate_email("not-an-email").unwrap_err().contains("not a valid email"));
    }

    #[test]
    fn blank_email_reports_required() {
        assert!(validate_email("  ").unwrap_err().contains("required"));
    }

    // -- validate_password_strength ------------------------------------------

    #[test]
    fn short_password_rejected() {
        assert!(validate_password_strength("ab1").unwrap_err().contains("at least"));
    }

    #[test]
    fn password_without_digit_rejected() {
        assert!(validate_password_strength("abcdefgh").is_err());
    }

    #[test]
    fn strong_password_accepted() {
        assert!(validate_password_strength("rounds2024").is_ok());
    }

    // -- validate_password_confirmation --------------------------------------

    #[test]
    fn mismatched_confirmation_rejected() {
        assert_eq!(
            validate_password_confirmation("rounds2024", "rounds2025"),
            Err("Passwords do not match".to_string())
        );
        assert!(validate_password_confirmation("same1234", "same1234").is_ok());
    }
}
