//! Character variety tests - one optional test per ASCII character class.

use secrecy::{ExposeSecret, SecretString};

fn contains(password: &SecretString, pred: impl Fn(char) -> bool) -> bool {
    password.expose_secret().chars().any(pred)
}

/// Fails when the password has no ASCII lowercase letter.
pub fn lowercase_test(password: &SecretString) -> Option<String> {
    if !contains(password, |c| c.is_ascii_lowercase()) {
        return Some("The password must contain at least one lowercase letter.".to_string());
    }
    None
}

/// Fails when the password has no ASCII uppercase letter.
pub fn uppercase_test(password: &SecretString) -> Option<String> {
    if !contains(password, |c| c.is_ascii_uppercase()) {
        return Some("The password must contain at least one uppercase letter.".to_string());
    }
    None
}

/// Fails when the password has no ASCII digit.
pub fn digit_test(password: &SecretString) -> Option<String> {
    if !contains(password, |c| c.is_ascii_digit()) {
        return Some("The password must contain at least one number.".to_string());
    }
    None
}

/// Anything outside `[A-Za-z0-9]` counts as special, including whitespace
/// and non-ASCII letters.
pub fn special_char_test(password: &SecretString) -> Option<String> {
    if !contains(password, |c| !c.is_ascii_alphanumeric()) {
        return Some("The password must contain at least one special character.".to_string());
    }
    None
}
