//! Pattern test - detects runs of repeated characters.

use secrecy::{ExposeSecret, SecretString};

const MAX_RUN: usize = 2;

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Fails when any character appears three or more times in a row.
///
/// Line terminators never form a run.
pub fn repeated_chars_test(password: &SecretString) -> Option<String> {
    let mut prev: Option<char> = None;
    let mut run = 0;

    for c in password.expose_secret().chars() {
        if is_line_terminator(c) {
            prev = None;
            run = 0;
            continue;
        }
        if prev == Some(c) {
            run += 1;
            if run > MAX_RUN {
                return Some(
                    "The password may not contain sequences of three or more repeated characters."
                        .to_string(),
                );
            }
        } else {
            prev = Some(c);
            run = 1;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_repeated_chars_triple() {
        let result = repeated_chars_test(&secret("aaaa1B"));
        assert!(result.is_some());
        assert!(result.unwrap().contains("three or more repeated"));
    }

    #[test]
    fn test_repeated_chars_exactly_three_in_middle() {
        assert!(repeated_chars_test(&secret("xy!!!zw")).is_some());
    }

    #[test]
    fn test_repeated_chars_pairs_are_fine() {
        assert_eq!(repeated_chars_test(&secret("aabbccdd11")), None);
    }

    #[test]
    fn test_repeated_chars_interrupted_run() {
        assert_eq!(repeated_chars_test(&secret("aabaa")), None);
    }

    #[test]
    fn test_repeated_chars_too_short() {
        assert_eq!(repeated_chars_test(&secret("")), None);
        assert_eq!(repeated_chars_test(&secret("zz")), None);
    }

    #[test]
    fn test_repeated_line_terminators_ignored() {
        assert_eq!(repeated_chars_test(&secret("ab\n\n\ncd")), None);
    }

    #[test]
    fn test_repeated_multibyte_chars() {
        assert!(repeated_chars_test(&secret("pass€€€word")).is_some());
    }
}
