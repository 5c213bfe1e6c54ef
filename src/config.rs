//! Policy configuration
//!
//! Holds the tunable thresholds read by the built-in tests and the
//! aggregation step, and merges keyed updates into them.

use crate::error::PolicyError;

pub const ALLOW_PASSPHRASES: &str = "allowPassphrases";
pub const MAX_LENGTH: &str = "maxLength";
pub const MIN_LENGTH: &str = "minLength";
pub const MIN_PHRASE_LENGTH: &str = "minPhraseLength";
pub const MIN_OPTIONAL_TESTS_TO_PASS: &str = "minOptionalTestsToPass";

const ENV_ALLOW_PASSPHRASES: &str = "PWD_POLICY_ALLOW_PASSPHRASES";
const ENV_MAX_LENGTH: &str = "PWD_POLICY_MAX_LENGTH";
const ENV_MIN_LENGTH: &str = "PWD_POLICY_MIN_LENGTH";
const ENV_MIN_PHRASE_LENGTH: &str = "PWD_POLICY_MIN_PHRASE_LENGTH";
const ENV_MIN_OPTIONAL_TESTS_TO_PASS: &str = "PWD_POLICY_MIN_OPTIONAL_TESTS_TO_PASS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Exempt passwords of at least `min_phrase_length` chars from optional tests.
    pub allow_passphrases: bool,
    pub max_length: i64,
    pub min_length: i64,
    pub min_phrase_length: i64,
    pub min_optional_tests_to_pass: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allow_passphrases: true,
            max_length: 128,
            min_length: 10,
            min_phrase_length: 20,
            min_optional_tests_to_pass: 4,
        }
    }
}

/// A value in a keyed configuration update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(i64::from(value))
    }
}

impl From<usize> for ConfigValue {
    fn from(value: usize) -> Self {
        ConfigValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl ConfigValue {
    fn as_bool(self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(b),
            ConfigValue::Int(_) => None,
        }
    }

    fn as_int(self) -> Option<i64> {
        match self {
            ConfigValue::Int(n) => Some(n),
            ConfigValue::Bool(_) => None,
        }
    }
}

impl PolicyConfig {
    /// Applies a single keyed update.
    ///
    /// Returns `false` when the key is unknown or the value has the wrong
    /// kind; the configuration is left untouched in that case.
    pub fn set(&mut self, key: &str, value: ConfigValue) -> bool {
        let applied = match key {
            ALLOW_PASSPHRASES => value.as_bool().map(|v| self.allow_passphrases = v),
            MAX_LENGTH => value.as_int().map(|v| self.max_length = v),
            MIN_LENGTH => value.as_int().map(|v| self.min_length = v),
            MIN_PHRASE_LENGTH => value.as_int().map(|v| self.min_phrase_length = v),
            MIN_OPTIONAL_TESTS_TO_PASS => {
                value.as_int().map(|v| self.min_optional_tests_to_pass = v)
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Ignoring unknown policy option: {}", key);
                return false;
            }
        };

        if applied.is_none() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Ignoring policy option {} with mismatched value {:?}", key, value);
            return false;
        }
        true
    }

    /// Merges every recognized key of `params` into this configuration.
    /// Unknown keys are ignored. Values are not cross-checked; see [`validate`](Self::validate).
    pub fn merge<I, K>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: AsRef<str>,
    {
        for (key, value) in params {
            self.set(key.as_ref(), value);
        }
    }

    /// Builds a configuration from defaults plus `PWD_POLICY_*` environment
    /// overrides.
    ///
    /// # Environment Variables
    ///
    /// - `PWD_POLICY_ALLOW_PASSPHRASES` (`true`/`false`)
    /// - `PWD_POLICY_MAX_LENGTH`
    /// - `PWD_POLICY_MIN_LENGTH`
    /// - `PWD_POLICY_MIN_PHRASE_LENGTH`
    /// - `PWD_POLICY_MIN_OPTIONAL_TESTS_TO_PASS`
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidEnv`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, PolicyError> {
        let mut config = Self::default();

        if let Some(v) = env_parse::<bool>(ENV_ALLOW_PASSPHRASES)? {
            config.allow_passphrases = v;
        }
        if let Some(v) = env_parse::<i64>(ENV_MAX_LENGTH)? {
            config.max_length = v;
        }
        if let Some(v) = env_parse::<i64>(ENV_MIN_LENGTH)? {
            config.min_length = v;
        }
        if let Some(v) = env_parse::<i64>(ENV_MIN_PHRASE_LENGTH)? {
            config.min_phrase_length = v;
        }
        if let Some(v) = env_parse::<i64>(ENV_MIN_OPTIONAL_TESTS_TO_PASS)? {
            config.min_optional_tests_to_pass = v;
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Policy configuration loaded from environment: {:?}", config);

        Ok(config)
    }

    /// Checks internal consistency.
    ///
    /// Never called implicitly: `configure` keeps merging whatever it is given.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.min_length <= 0 {
            return Err(PolicyError::InvalidConfig(format!(
                "minLength must be greater than 0, got {}",
                self.min_length
            )));
        }
        if self.max_length <= 0 {
            return Err(PolicyError::InvalidConfig(format!(
                "maxLength must be greater than 0, got {}",
                self.max_length
            )));
        }
        if self.min_phrase_length <= 0 {
            return Err(PolicyError::InvalidConfig(format!(
                "minPhraseLength must be greater than 0, got {}",
                self.min_phrase_length
            )));
        }
        if self.min_optional_tests_to_pass < 0 {
            return Err(PolicyError::InvalidConfig(format!(
                "minOptionalTestsToPass must not be negative, got {}",
                self.min_optional_tests_to_pass
            )));
        }
        if self.min_length > self.max_length {
            return Err(PolicyError::InvalidConfig(format!(
                "minLength ({}) exceeds maxLength ({})",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, PolicyError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| PolicyError::InvalidEnv { key, value: raw }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_ENV: [&str; 5] = [
        ENV_ALLOW_PASSPHRASES,
        ENV_MAX_LENGTH,
        ENV_MIN_LENGTH,
        ENV_MIN_PHRASE_LENGTH,
        ENV_MIN_OPTIONAL_TESTS_TO_PASS,
    ];

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: serial tests, no concurrent env access
        unsafe { std::env::set_var(key, value); }
    }

    fn clear_env() {
        for key in ALL_ENV {
            // SAFETY: serial tests, no concurrent env access
            unsafe { std::env::remove_var(key); }
        }
    }

    #[test]
    fn test_defaults() {
        let config = PolicyConfig::default();
        assert!(config.allow_passphrases);
        assert_eq!(config.max_length, 128);
        assert_eq!(config.min_length, 10);
        assert_eq!(config.min_phrase_length, 20);
        assert_eq!(config.min_optional_tests_to_pass, 4);
    }

    #[test]
    fn test_merge_recognized_keys() {
        let mut config = PolicyConfig::default();
        config.merge([
            (MIN_LENGTH, ConfigValue::Int(12)),
            (ALLOW_PASSPHRASES, ConfigValue::from(false)),
            (MIN_OPTIONAL_TESTS_TO_PASS, ConfigValue::Int(3)),
        ]);
        assert_eq!(config.min_length, 12);
        assert!(!config.allow_passphrases);
        assert_eq!(config.min_optional_tests_to_pass, 3);
        assert_eq!(config.max_length, 128);
    }

    #[test]
    fn test_merge_ignores_unknown_keys() {
        let mut config = PolicyConfig::default();
        config.merge(vec![
            ("customTests".to_string(), ConfigValue::Int(1)),
            ("min_length".to_string(), ConfigValue::Int(99)),
        ]);
        assert_eq!(config, PolicyConfig::default());
    }

    #[test]
    fn test_set_reports_mismatched_kind() {
        let mut config = PolicyConfig::default();
        assert!(!config.set(MIN_LENGTH, ConfigValue::Bool(true)));
        assert!(!config.set(ALLOW_PASSPHRASES, ConfigValue::Int(0)));
        assert!(!config.set("nope", ConfigValue::Int(1)));
        assert!(config.set(MAX_LENGTH, ConfigValue::Int(64)));
        assert_eq!(config.max_length, 64);
        assert_eq!(config.min_length, 10);
    }

    #[test]
    fn test_negative_values_stored_as_given() {
        let mut config = PolicyConfig::default();
        assert!(config.set(MIN_LENGTH, ConfigValue::Int(-5)));
        assert_eq!(config.min_length, -5);
        assert!(matches!(config.validate(), Err(PolicyError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate() {
        assert!(PolicyConfig::default().validate().is_ok());

        let mut config = PolicyConfig::default();
        config.min_length = 200;
        assert!(matches!(config.validate(), Err(PolicyError::InvalidConfig(_))));

        let mut config = PolicyConfig::default();
        config.min_length = 0;
        assert!(matches!(config.validate(), Err(PolicyError::InvalidConfig(_))));

        let mut config = PolicyConfig::default();
        config.min_phrase_length = 0;
        assert!(config.validate().is_err());

        let mut config = PolicyConfig::default();
        config.max_length = -1;
        assert!(config.validate().is_err());

        let mut config = PolicyConfig::default();
        config.min_optional_tests_to_pass = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        assert_eq!(PolicyConfig::from_env().unwrap(), PolicyConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        set_env(ENV_MIN_LENGTH, "12");
        set_env(ENV_ALLOW_PASSPHRASES, "false");
        set_env(ENV_MIN_OPTIONAL_TESTS_TO_PASS, " 3 ");

        let config = PolicyConfig::from_env().unwrap();
        assert_eq!(config.min_length, 12);
        assert!(!config.allow_passphrases);
        assert_eq!(config.min_optional_tests_to_pass, 3);
        assert_eq!(config.max_length, 128);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_value() {
        clear_env();
        set_env(ENV_MAX_LENGTH, "lots");

        match PolicyConfig::from_env() {
            Err(PolicyError::InvalidEnv { key, value }) => {
                assert_eq!(key, ENV_MAX_LENGTH);
                assert_eq!(value, "lots");
            }
            other => panic!("Expected InvalidEnv error, got {:?}", other),
        }

        clear_env();
    }
}
