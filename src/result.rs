//! Evaluation result.

use crate::rules::TestCategory;

/// One executed test, qualified by the category it ran in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub category: TestCategory,
    /// Position within `category`.
    pub index: usize,
    /// Failure message, `None` if the test passed.
    pub error: Option<String>,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Verdict for a single password.
///
/// Indices in `failed_tests` and `passed_tests` are local to the category
/// that produced them; use `outcomes` to tell categories apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    /// All failure messages, in evaluation order (required, optional, custom).
    pub errors: Vec<String>,
    pub failed_tests: Vec<usize>,
    pub passed_tests: Vec<usize>,
    pub required_test_errors: Vec<String>,
    pub optional_test_errors: Vec<String>,
    pub custom_test_errors: Vec<String>,
    pub is_passphrase: bool,
    pub strong: bool,
    pub optional_tests_passed: usize,
    pub outcomes: Vec<TestOutcome>,
}

impl Default for EvaluationResult {
    fn default() -> Self {
        Self {
            errors: Vec::new(),
            failed_tests: Vec::new(),
            passed_tests: Vec::new(),
            required_test_errors: Vec::new(),
            optional_test_errors: Vec::new(),
            custom_test_errors: Vec::new(),
            is_passphrase: false,
            strong: true,
            optional_tests_passed: 0,
            outcomes: Vec::new(),
        }
    }
}

impl EvaluationResult {
    pub(crate) fn record(&mut self, category: TestCategory, index: usize, error: Option<String>) {
        match &error {
            Some(message) => {
                self.errors.push(message.clone());
                self.category_errors_mut(category).push(message.clone());
                self.failed_tests.push(index);
                if category != TestCategory::Optional {
                    self.strong = false;
                }
            }
            None => {
                self.passed_tests.push(index);
                if category == TestCategory::Optional {
                    self.optional_tests_passed += 1;
                }
            }
        }
        self.outcomes.push(TestOutcome {
            category,
            index,
            error,
        });
    }

    fn category_errors_mut(&mut self, category: TestCategory) -> &mut Vec<String> {
        match category {
            TestCategory::Required => &mut self.required_test_errors,
            TestCategory::Optional => &mut self.optional_test_errors,
            TestCategory::Custom => &mut self.custom_test_errors,
        }
    }

    /// Errors reported by tests of `category`.
    pub fn category_errors(&self, category: TestCategory) -> &[String] {
        match category {
            TestCategory::Required => &self.required_test_errors,
            TestCategory::Optional => &self.optional_test_errors,
            TestCategory::Custom => &self.custom_test_errors,
        }
    }

    /// Outcomes of the tests that failed, across all categories.
    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strong_and_empty() {
        let result = EvaluationResult::default();
        assert!(result.strong);
        assert!(!result.is_passphrase);
        assert!(result.errors.is_empty());
        assert_eq!(result.optional_tests_passed, 0);
    }

    #[test]
    fn test_record_required_failure() {
        let mut result = EvaluationResult::default();
        result.record(TestCategory::Required, 0, Some("too short".to_string()));
        assert!(!result.strong);
        assert_eq!(result.errors, vec!["too short"]);
        assert_eq!(result.required_test_errors, vec!["too short"]);
        assert_eq!(result.failed_tests, vec![0]);
        assert!(result.passed_tests.is_empty());
    }

    #[test]
    fn test_record_optional_failure_keeps_strong() {
        let mut result = EvaluationResult::default();
        result.record(TestCategory::Optional, 1, Some("no upper".to_string()));
        result.record(TestCategory::Optional, 2, None);
        assert!(result.strong);
        assert_eq!(result.optional_test_errors, vec!["no upper"]);
        assert_eq!(result.optional_tests_passed, 1);
        assert_eq!(result.failed_tests, vec![1]);
        assert_eq!(result.passed_tests, vec![2]);
    }

    #[test]
    fn test_record_custom_pass_does_not_count_as_optional() {
        let mut result = EvaluationResult::default();
        result.record(TestCategory::Custom, 0, None);
        assert_eq!(result.optional_tests_passed, 0);
        assert_eq!(result.passed_tests, vec![0]);
    }

    #[test]
    fn test_outcomes_disambiguate_indices() {
        let mut result = EvaluationResult::default();
        result.record(TestCategory::Required, 0, None);
        result.record(TestCategory::Optional, 0, Some("x".to_string()));
        assert_eq!(result.passed_tests, vec![0]);
        assert_eq!(result.failed_tests, vec![0]);

        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].category, TestCategory::Optional);
        assert_eq!(result.category_errors(TestCategory::Optional), ["x".to_string()]);
    }
}
