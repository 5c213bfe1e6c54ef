//! Password policy evaluation library
//!
//! A [`PolicyEngine`] runs three ordered groups of tests against a password:
//!
//! - **required** tests must all pass,
//! - **optional** tests must pass at least `minOptionalTestsToPass` times,
//!   unless the password is long enough to count as a passphrase,
//! - **custom** tests, added by the caller, must all pass.
//!
//! The engine ships with the required tests (minimum length, maximum length,
//! no triple-repeated characters) and the optional tests (lowercase,
//! uppercase, digit, special character). More can be added with
//! [`PolicyEngine::add_test`].
//!
//! # Features
//!
//! - `async` (default): Enables debounced evaluation with cancellation support
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! [`PolicyConfig::from_env`] reads `PWD_POLICY_ALLOW_PASSPHRASES`,
//! `PWD_POLICY_MAX_LENGTH`, `PWD_POLICY_MIN_LENGTH`,
//! `PWD_POLICY_MIN_PHRASE_LENGTH` and `PWD_POLICY_MIN_OPTIONAL_TESTS_TO_PASS`.
//!
//! # Example
//!
//! ```rust
//! use pwd_policy::{ConfigValue, PolicyEngine, RuleResult};
//! use secrecy::{ExposeSecret, SecretString};
//!
//! let engine = PolicyEngine::new();
//! engine.configure([
//!     ("minLength", ConfigValue::Int(12)),
//!     ("allowPassphrases", ConfigValue::Bool(false)),
//!     ("minOptionalTestsToPass", ConfigValue::Int(3)),
//! ]);
//!
//! engine.add_test("custom", |pwd: &SecretString| -> RuleResult {
//!     if pwd.expose_secret().contains("1234") {
//!         let message = "The password should not contain sequential numbers like \"1234\".";
//!         return Ok(Some(message.into()));
//!     }
//!     Ok(None)
//! });
//!
//! let password = SecretString::new("weakpassword1234!".to_string().into());
//! let result = engine.evaluate(&password).expect("built-in tests never abort");
//!
//! assert!(!result.strong);
//! assert_eq!(result.errors.len(), 2);
//! ```

mod config;
mod engine;
mod error;
mod result;
mod rules;

// Public API
pub use config::{
    ALLOW_PASSPHRASES, ConfigValue, MAX_LENGTH, MIN_LENGTH, MIN_OPTIONAL_TESTS_TO_PASS,
    MIN_PHRASE_LENGTH, PolicyConfig,
};
pub use engine::PolicyEngine;
pub use error::{PolicyError, RuleError};
pub use result::{EvaluationResult, TestOutcome};
pub use rules::{BuiltinTest, Rule, RuleResult, TestCategory};

#[cfg(feature = "async")]
pub use engine::evaluate_tx;
