//! Length tests - enforce the configured minimum and maximum length.
//!
//! Length is counted in Unicode scalar values.

use secrecy::{ExposeSecret, SecretString};

pub(crate) fn char_len(password: &SecretString) -> i64 {
    i64::try_from(password.expose_secret().chars().count()).unwrap_or(i64::MAX)
}

/// Fails when the password is shorter than `min_length`.
pub fn min_length_test(password: &SecretString, min_length: i64) -> Option<String> {
    if char_len(password) < min_length {
        return Some(format!(
            "The password must be at least {} characters long.",
            min_length
        ));
    }
    None
}

/// Fails when the password is longer than `max_length`.
pub fn max_length_test(password: &SecretString, max_length: i64) -> Option<String> {
    if char_len(password) > max_length {
        return Some(format!(
            "The password must be fewer than {} characters.",
            max_length
        ));
    }
    None
}
