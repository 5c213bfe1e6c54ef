//! Password tests
//!
//! Built-in tests are grouped by what they inspect; caller-supplied tests
//! implement [`Rule`].

mod length;
mod pattern;
mod variety;

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

use crate::config::PolicyConfig;
use crate::error::RuleError;

pub(crate) use length::char_len;
pub use length::{max_length_test, min_length_test};
pub use pattern::repeated_chars_test;
pub use variety::{digit_test, lowercase_test, special_char_test, uppercase_test};

/// Result type for test functions.
/// - `Ok(Some(message))` - Test failed with message
/// - `Ok(None)` - Test passed
/// - `Err(_)` - The test could not run; evaluation aborts
pub type RuleResult = Result<Option<String>, RuleError>;

/// A caller-supplied password test.
///
/// Rules must be pure: they may be invoked repeatedly and from several
/// threads for the same engine.
pub trait Rule: Send + Sync {
    fn check(&self, password: &SecretString) -> RuleResult;
}

impl<F> Rule for F
where
    F: Fn(&SecretString) -> RuleResult + Send + Sync,
{
    fn check(&self, password: &SecretString) -> RuleResult {
        self(password)
    }
}

/// The bucket a test is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestCategory {
    Required,
    Optional,
    Custom,
}

impl TestCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCategory::Required => "required",
            TestCategory::Optional => "optional",
            TestCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that is not exactly `"required"` or `"optional"` is a custom test.
impl From<&str> for TestCategory {
    fn from(name: &str) -> Self {
        match name {
            "required" => TestCategory::Required,
            "optional" => TestCategory::Optional,
            _ => TestCategory::Custom,
        }
    }
}

impl From<String> for TestCategory {
    fn from(name: String) -> Self {
        TestCategory::from(name.as_str())
    }
}

/// Tests shipped with the engine. They read the configuration at
/// evaluation time, so `configure` affects them immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTest {
    MinLength,
    MaxLength,
    RepeatedChars,
    Lowercase,
    Uppercase,
    Digit,
    SpecialChar,
}

impl BuiltinTest {
    pub const REQUIRED: [BuiltinTest; 3] = [
        BuiltinTest::MinLength,
        BuiltinTest::MaxLength,
        BuiltinTest::RepeatedChars,
    ];

    pub const OPTIONAL: [BuiltinTest; 4] = [
        BuiltinTest::Lowercase,
        BuiltinTest::Uppercase,
        BuiltinTest::Digit,
        BuiltinTest::SpecialChar,
    ];

    pub fn check(&self, password: &SecretString, config: &PolicyConfig) -> Option<String> {
        match self {
            BuiltinTest::MinLength => min_length_test(password, config.min_length),
            BuiltinTest::MaxLength => max_length_test(password, config.max_length),
            BuiltinTest::RepeatedChars => repeated_chars_test(password),
            BuiltinTest::Lowercase => lowercase_test(password),
            BuiltinTest::Uppercase => uppercase_test(password),
            BuiltinTest::Digit => digit_test(password),
            BuiltinTest::SpecialChar => special_char_test(password),
        }
    }
}

/// A registered test: either built in or supplied through `add_test`.
#[derive(Clone)]
pub(crate) enum Test {
    Builtin(BuiltinTest),
    Dynamic(Arc<dyn Rule>),
}

impl Test {
    pub(crate) fn run(&self, password: &SecretString, config: &PolicyConfig) -> RuleResult {
        match self {
            Test::Builtin(builtin) => Ok(builtin.check(password, config)),
            Test::Dynamic(rule) => rule.check(password),
        }
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Test::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            Test::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// The three ordered test sequences. Insertion order is the index reported
/// in evaluation results.
#[derive(Debug, Clone)]
pub(crate) struct RuleSet {
    pub(crate) required: Vec<Test>,
    pub(crate) optional: Vec<Test>,
    pub(crate) custom: Vec<Test>,
}

impl RuleSet {
    pub(crate) fn push(&mut self, category: TestCategory, test: Test) {
        match category {
            TestCategory::Required => self.required.push(test),
            TestCategory::Optional => self.optional.push(test),
            TestCategory::Custom => self.custom.push(test),
        }
    }

    pub(crate) fn len(&self, category: TestCategory) -> usize {
        match category {
            TestCategory::Required => self.required.len(),
            TestCategory::Optional => self.optional.len(),
            TestCategory::Custom => self.custom.len(),
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            required: BuiltinTest::REQUIRED.into_iter().map(Test::Builtin).collect(),
            optional: BuiltinTest::OPTIONAL.into_iter().map(Test::Builtin).collect(),
            custom: Vec::new(),
        }
    }
}
