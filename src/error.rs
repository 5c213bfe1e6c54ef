//! Error types.

use thiserror::Error;

use crate::rules::TestCategory;

/// Error returned by a rule that could not run to completion.
///
/// This is distinct from a rule *failing*: a failing rule returns
/// `Ok(Some(message))`. A `RuleError` means the rule itself is broken and
/// aborts the whole evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RuleError(pub String);

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("{category} test #{index} aborted evaluation: {source}")]
    Rule {
        category: TestCategory,
        index: usize,
        #[source]
        source: RuleError,
    },
    #[error("Invalid policy configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid value for environment variable {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("Evaluation cancelled")]
    Cancelled,
}
