//! Policy engine - owns configuration and tests, evaluates passwords.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::SecretString;

#[cfg(feature = "async")]
use std::time::Duration;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigValue, PolicyConfig};
use crate::error::PolicyError;
use crate::result::EvaluationResult;
use crate::rules::{Rule, RuleSet, Test, TestCategory, char_len};

#[derive(Debug, Default)]
struct PolicyState {
    config: PolicyConfig,
    rules: RuleSet,
}

/// Password policy engine.
///
/// `evaluate` only reads shared state; `configure` and `add_test` take a
/// write lock, so an engine can be shared behind an `Arc` and administered
/// while evaluations are in flight.
#[derive(Debug, Default)]
pub struct PolicyEngine {
    state: RwLock<PolicyState>,
}

impl PolicyEngine {
    /// Creates an engine with the default configuration and built-in tests.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PolicyConfig) -> Self {
        Self {
            state: RwLock::new(PolicyState {
                config,
                rules: RuleSet::default(),
            }),
        }
    }

    // Rules are pure, so a poisoned lock never guards half-written state.
    fn read(&self) -> RwLockReadGuard<'_, PolicyState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PolicyState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of the current configuration.
    pub fn config(&self) -> PolicyConfig {
        self.read().config.clone()
    }

    /// Merges recognized option names into the configuration.
    ///
    /// Unknown keys and values of the wrong kind are ignored. Values are not
    /// validated; call [`validate`](Self::validate) to check consistency.
    ///
    /// ```rust
    /// use pwd_policy::{ConfigValue, PolicyEngine};
    ///
    /// let engine = PolicyEngine::new();
    /// engine.configure([
    ///     ("minLength", ConfigValue::Int(12)),
    ///     ("allowPassphrases", ConfigValue::Bool(false)),
    /// ]);
    /// assert_eq!(engine.config().min_length, 12);
    /// ```
    pub fn configure<I, K>(&self, params: I)
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: AsRef<str>,
    {
        self.write().config.merge(params);
    }

    /// Appends `rule` to `category`. Any category name other than
    /// `"required"` or `"optional"` registers a custom test.
    pub fn add_test<C, R>(&self, category: C, rule: R)
    where
        C: Into<TestCategory>,
        R: Rule + 'static,
    {
        let category = category.into();
        let mut state = self.write();
        state.rules.push(category, Test::Dynamic(Arc::new(rule)));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Registered {} test #{}",
            category,
            state.rules.len(category) - 1
        );
    }

    /// Number of tests currently registered in `category`.
    pub fn test_count(&self, category: TestCategory) -> usize {
        self.read().rules.len(category)
    }

    /// Checks the configuration, and that the optional threshold is reachable
    /// with the registered optional tests.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let state = self.read();
        state.config.validate()?;

        let optional = i64::try_from(state.rules.len(TestCategory::Optional)).unwrap_or(i64::MAX);
        if state.config.min_optional_tests_to_pass > optional {
            return Err(PolicyError::InvalidConfig(format!(
                "minOptionalTestsToPass ({}) exceeds the number of optional tests ({})",
                state.config.min_optional_tests_to_pass, optional
            )));
        }
        Ok(())
    }

    /// Evaluates `password` against every registered test.
    ///
    /// Password content never produces an error. `Err` is returned only when
    /// a test itself returns `Err`, which aborts the evaluation.
    pub fn evaluate(&self, password: &SecretString) -> Result<EvaluationResult, PolicyError> {
        self.run(password, || false)
    }

    /// Like [`evaluate`](Self::evaluate), but checks `token` before each test.
    #[cfg(feature = "async")]
    pub fn evaluate_cancellable(
        &self,
        password: &SecretString,
        token: &CancellationToken,
    ) -> Result<EvaluationResult, PolicyError> {
        self.run(password, || token.is_cancelled())
    }

    fn run(
        &self,
        password: &SecretString,
        cancelled: impl Fn() -> bool,
    ) -> Result<EvaluationResult, PolicyError> {
        let state = self.read();
        let config = &state.config;

        let mut result = EvaluationResult {
            is_passphrase: config.allow_passphrases
                && char_len(password) >= config.min_phrase_length,
            ..EvaluationResult::default()
        };

        // Orchestrator: required, then optional unless exempt, then custom
        let mut phases = vec![(TestCategory::Required, &state.rules.required)];
        if !result.is_passphrase {
            phases.push((TestCategory::Optional, &state.rules.optional));
        }
        phases.push((TestCategory::Custom, &state.rules.custom));

        for (category, tests) in phases {
            for (index, test) in tests.iter().enumerate() {
                if cancelled() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "Password evaluation cancelled before {} test #{}",
                        category,
                        index
                    );
                    return Err(PolicyError::Cancelled);
                }

                match test.run(password, config) {
                    Ok(error) => result.record(category, index, error),
                    Err(source) => {
                        #[cfg(feature = "tracing")]
                        tracing::error!("Fatal error in {} test #{}: {}", category, index, source);
                        return Err(PolicyError::Rule {
                            category,
                            index,
                            source,
                        });
                    }
                }
            }
        }

        let optional_passed = i64::try_from(result.optional_tests_passed).unwrap_or(i64::MAX);
        if !result.is_passphrase && optional_passed < config.min_optional_tests_to_pass {
            result.strong = false;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            strong = result.strong,
            is_passphrase = result.is_passphrase,
            optional_tests_passed = result.optional_tests_passed,
            failed = result.failed_tests.len(),
            "Password evaluated"
        );

        Ok(result)
    }
}

/// Debounced evaluation that sends its result via channel.
///
/// Waits `debounce` first so rapid successive inputs can cancel stale
/// evaluations. Nothing is sent if `token` is cancelled during the wait.
#[cfg(feature = "async")]
pub async fn evaluate_tx(
    engine: Arc<PolicyEngine>,
    password: SecretString,
    token: CancellationToken,
    debounce: Duration,
    tx: mpsc::Sender<Result<EvaluationResult, PolicyError>>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("evaluation is about to start...");

    tokio::select! {
        _ = token.cancelled() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Evaluation cancelled during debounce");
            return;
        }
        _ = tokio::time::sleep(debounce) => {}
    }

    let evaluation = engine.evaluate_cancellable(&password, &token);

    if let Err(e) = tx.send(evaluation).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password evaluation result: {}", e);
        #[cfg(not(feature = "tracing"))]
        let _ = e;
    }
}
