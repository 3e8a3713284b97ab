//! Field validation rules shared by the sign-in and sign-up flows.
//!
//! All checks are pure functions over the raw field string. The flows apply
//! the charset rule on every keystroke and the full chain again at submission
//! (see `flows::login` / `flows::register` for the fixed ordering).

use crate::error::{LoginError, PasswordError};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// True when the payload of a field-change event must be ignored outright
/// (pasted multi-line input).
pub fn contains_control(s: &str) -> bool {
    s.contains('\n') || s.contains('\r') || s.contains('\t')
}

/// Non-empty and made up entirely of ASCII letters and digits.
pub fn is_allowed_charset(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn validate_login(s: &str) -> Result<(), LoginError> {
    if s.trim().is_empty() {
        return Err(LoginError::Empty);
    }
    if !is_allowed_charset(s) {
        return Err(LoginError::IncorrectSymbols);
    }
    Ok(())
}

pub fn validate_password(s: &str) -> Result<(), PasswordError> {
    if s.trim().is_empty() {
        return Err(PasswordError::Empty);
    }
    if !is_allowed_charset(s) {
        return Err(PasswordError::IncorrectSymbols);
    }
    if s.trim().len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}

/// Registration only: a trimmed password of nothing but digits, or nothing
/// but letters, is rejected.
pub fn validate_strength(s: &str) -> Result<(), PasswordError> {
    let trimmed = s.trim();
    let all_digits = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit());
    let all_letters = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphabetic());
    if all_digits || all_letters {
        return Err(PasswordError::Weak);
    }
    Ok(())
}

/// Registration only: repeat must equal password exactly.
pub fn validate_repeat(password: &str, repeat: &str) -> Result<(), PasswordError> {
    if password != repeat {
        return Err(PasswordError::Mismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_control_characters() {
        assert!(contains_control("abc\ndef"));
        assert!(contains_control("abc\r"));
        assert!(contains_control("\tabc"));
        assert!(!contains_control("abc def"));
        assert!(!contains_control(""));
    }

    #[test]
    fn t_charset() {
        assert!(is_allowed_charset("abc123"));
        assert!(is_allowed_charset("ABCxyz"));
        assert!(!is_allowed_charset(""));
        assert!(!is_allowed_charset("abc def"));
        assert!(!is_allowed_charset("abc!"));
        assert!(!is_allowed_charset("пароль"));
        assert!(!is_allowed_charset("abc_123"));
    }

    #[test]
    fn t_login_rules() {
        assert_eq!(validate_login(""), Err(LoginError::Empty));
        assert_eq!(validate_login("   "), Err(LoginError::Empty));
        assert_eq!(validate_login("user name"), Err(LoginError::IncorrectSymbols));
        assert_eq!(validate_login("user1"), Ok(()));
    }

    #[test]
    fn t_password_rules() {
        assert_eq!(validate_password(""), Err(PasswordError::Empty));
        assert_eq!(validate_password("  "), Err(PasswordError::Empty));
        assert_eq!(validate_password("pass word"), Err(PasswordError::IncorrectSymbols));
        assert_eq!(validate_password("abc1234"), Err(PasswordError::TooShort));
        assert_eq!(validate_password("abcd1234"), Ok(()));
    }

    #[test]
    fn t_strength() {
        assert_eq!(validate_strength("12345678"), Err(PasswordError::Weak));
        assert_eq!(validate_strength("abcdefgh"), Err(PasswordError::Weak));
        assert_eq!(validate_strength("abcd1234"), Ok(()));
    }

    #[test]
    fn t_repeat() {
        assert_eq!(validate_repeat("abcd1234", "abcd1239"), Err(PasswordError::Mismatch));
        assert_eq!(validate_repeat("abcd1234", "abcd1234"), Ok(()));
    }
}
