//! Two-phase environment accessor
//!
//! An app's env declaration runs twice against the same accessor
//! interface: once with a [`RecordingAccessor`] to statically enumerate
//! every name it will need (pre-deploy validation), and once with a
//! [`ValidatingAccessor`] against the actually resolved values. The two
//! are separate implementations of one trait; nothing is patched or
//! intercepted at runtime.

use crate::error::{EnvError, Result};
use crate::validate::{Contextual, VarValidator};
use std::collections::{BTreeMap, HashSet};

/// Accessor an env declaration reads its variables through
pub trait EnvAccessor {
    /// Fetch a required variable
    fn get(&mut self, name: &str) -> Result<String>;

    /// Fetch a required variable and validate its value
    ///
    /// Validation failures carry the variable name via [`Contextual`].
    fn get_checked(&mut self, name: &str, rules: &dyn VarValidator) -> Result<String> {
        let value = self.get(name)?;
        Contextual::new(name, rules)
            .validate(&value)
            .map_err(EnvError::Validation)?;
        Ok(value)
    }
}

/// Records every requested name; never fails, never validates
///
/// Names keep first-seen order and are deduplicated.
#[derive(Debug, Default)]
pub struct RecordingAccessor {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl RecordingAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> &[String] {
        &self.names
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }

    fn record(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }
}

impl EnvAccessor for RecordingAccessor {
    fn get(&mut self, name: &str) -> Result<String> {
        self.record(name);
        Ok(String::new())
    }

    // The recording pass must not fail on placeholder values
    fn get_checked(&mut self, name: &str, _rules: &dyn VarValidator) -> Result<String> {
        self.get(name)
    }
}

/// Resolves against a concrete value map; missing names are errors
pub struct ValidatingAccessor<'a> {
    values: &'a BTreeMap<String, String>,
}

impl<'a> ValidatingAccessor<'a> {
    pub fn new(values: &'a BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl EnvAccessor for ValidatingAccessor<'_> {
    fn get(&mut self, name: &str) -> Result<String> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| EnvError::MissingVar(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Rules;

    fn declare(env: &mut dyn EnvAccessor) -> Result<()> {
        env.get("PORT")?;
        env.get("DATABASE_URL")?;
        env.get("PORT")?;
        env.get_checked("BETTER_AUTH_URL", &Rules::new().url())?;
        Ok(())
    }

    #[test]
    fn test_recording_enumerates_in_first_seen_order() {
        let mut recorder = RecordingAccessor::new();
        declare(&mut recorder).unwrap();

        assert_eq!(
            recorder.into_names(),
            vec!["PORT", "DATABASE_URL", "BETTER_AUTH_URL"]
        );
    }

    #[test]
    fn test_recording_never_fails() {
        let mut recorder = RecordingAccessor::new();
        // get_checked with strict rules still records instead of failing
        let value = recorder
            .get_checked("STRICT_VAR", &Rules::new().non_empty().number())
            .unwrap();
        assert_eq!(value, "");
        assert_eq!(recorder.recorded(), ["STRICT_VAR"]);
    }

    #[test]
    fn test_validating_resolves_known_names() {
        let mut values = BTreeMap::new();
        values.insert("PORT".to_string(), "3000".to_string());
        values.insert("DATABASE_URL".to_string(), "postgresql://u:p@h:5432/d".to_string());
        values.insert("BETTER_AUTH_URL".to_string(), "https://api.myapp.com".to_string());

        let mut accessor = ValidatingAccessor::new(&values);
        assert!(declare(&mut accessor).is_ok());
        assert_eq!(accessor.get("PORT").unwrap(), "3000");
    }

    #[test]
    fn test_validating_fails_on_missing_name() {
        let values = BTreeMap::new();
        let mut accessor = ValidatingAccessor::new(&values);

        let err = accessor.get("PORT").unwrap_err();
        assert!(matches!(err, EnvError::MissingVar(name) if name == "PORT"));
    }

    #[test]
    fn test_validating_checks_values() {
        let mut values = BTreeMap::new();
        values.insert("BETTER_AUTH_URL".to_string(), "not a url".to_string());

        let mut accessor = ValidatingAccessor::new(&values);
        let err = accessor
            .get_checked("BETTER_AUTH_URL", &Rules::new().url())
            .unwrap_err();
        assert!(err.to_string().contains("BETTER_AUTH_URL"));
    }
}
