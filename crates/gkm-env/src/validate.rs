//! Value validation for resolved variables
//!
//! A small fluent rule set behind the [`VarValidator`] trait. The
//! [`Contextual`] decorator guarantees that every terminal validation
//! failure names the variable it belongs to, without touching the
//! wrapped validator's own rules: only `validate` output is rewritten,
//! everything else is forwarded unchanged.

#[derive(Debug, Clone)]
enum Check {
    NonEmpty,
    MinLen(usize),
    Url,
    Number,
    OneOf(Vec<String>),
}

/// Terminal validation interface
pub trait VarValidator {
    /// Human-readable description of the rules
    fn describe(&self) -> String;

    /// Validate a value, returning the first failure message
    fn validate(&self, value: &str) -> Result<(), String>;
}

/// Fluent rule builder
#[derive(Debug, Clone, Default)]
pub struct Rules {
    checks: Vec<Check>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn non_empty(mut self) -> Self {
        self.checks.push(Check::NonEmpty);
        self
    }

    pub fn min_len(mut self, len: usize) -> Self {
        self.checks.push(Check::MinLen(len));
        self
    }

    pub fn url(mut self) -> Self {
        self.checks.push(Check::Url);
        self
    }

    pub fn number(mut self) -> Self {
        self.checks.push(Check::Number);
        self
    }

    pub fn one_of(mut self, options: &[&str]) -> Self {
        self.checks
            .push(Check::OneOf(options.iter().map(|o| o.to_string()).collect()));
        self
    }
}

impl VarValidator for Rules {
    fn describe(&self) -> String {
        let parts: Vec<&str> = self
            .checks
            .iter()
            .map(|check| match check {
                Check::NonEmpty => "non-empty",
                Check::MinLen(_) => "minimum length",
                Check::Url => "url",
                Check::Number => "number",
                Check::OneOf(_) => "one of",
            })
            .collect();
        parts.join(", ")
    }

    fn validate(&self, value: &str) -> Result<(), String> {
        for check in &self.checks {
            match check {
                Check::NonEmpty => {
                    if value.is_empty() {
                        return Err("must not be empty".to_string());
                    }
                }
                Check::MinLen(len) => {
                    if value.chars().count() < *len {
                        return Err(format!("must be at least {len} characters"));
                    }
                }
                Check::Url => {
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err("must be an http(s) URL".to_string());
                    }
                }
                Check::Number => {
                    if value.parse::<f64>().is_err() {
                        return Err("must be a number".to_string());
                    }
                }
                Check::OneOf(options) => {
                    if !options.iter().any(|o| o == value) {
                        return Err(format!("must be one of: {}", options.join(", ")));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Decorator that stamps the variable name onto validation failures
pub struct Contextual<'a, V: ?Sized> {
    name: &'a str,
    inner: &'a V,
}

impl<'a, V: VarValidator + ?Sized> Contextual<'a, V> {
    pub fn new(name: &'a str, inner: &'a V) -> Self {
        Self { name, inner }
    }
}

impl<V: VarValidator + ?Sized> VarValidator for Contextual<'_, V> {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn validate(&self, value: &str) -> Result<(), String> {
        self.inner.validate(value).map_err(|message| {
            if message.contains(self.name) {
                message
            } else {
                format!("{}: {}", self.name, message)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_pass() {
        let rules = Rules::new().non_empty().url();
        assert!(rules.validate("https://api.myapp.com").is_ok());
    }

    #[test]
    fn test_rules_first_failure_wins() {
        let rules = Rules::new().non_empty().url();
        assert_eq!(rules.validate("").unwrap_err(), "must not be empty");
        assert_eq!(rules.validate("ftp://x").unwrap_err(), "must be an http(s) URL");
    }

    #[test]
    fn test_number_and_one_of() {
        assert!(Rules::new().number().validate("3000").is_ok());
        assert!(Rules::new().number().validate("3000x").is_err());
        assert!(Rules::new().one_of(&["backend", "frontend"]).validate("backend").is_ok());
        assert!(Rules::new().one_of(&["backend", "frontend"]).validate("database").is_err());
    }

    #[test]
    fn test_contextual_names_the_variable() {
        let rules = Rules::new().number();
        let contextual = Contextual::new("PORT", &rules);

        let err = contextual.validate("not-a-number").unwrap_err();
        assert_eq!(err, "PORT: must be a number");
    }

    #[test]
    fn test_contextual_does_not_double_stamp() {
        struct AlreadyNamed;
        impl VarValidator for AlreadyNamed {
            fn describe(&self) -> String {
                "custom".to_string()
            }
            fn validate(&self, _value: &str) -> Result<(), String> {
                Err("PORT is out of range".to_string())
            }
        }

        let contextual = Contextual::new("PORT", &AlreadyNamed);
        assert_eq!(contextual.validate("x").unwrap_err(), "PORT is out of range");
    }

    #[test]
    fn test_contextual_forwards_describe_unchanged() {
        let rules = Rules::new().non_empty().number();
        let contextual = Contextual::new("PORT", &rules);
        assert_eq!(contextual.describe(), rules.describe());
    }

    #[test]
    fn test_contextual_passes_valid_values_through() {
        let rules = Rules::new().min_len(8);
        let contextual = Contextual::new("SECRET", &rules);
        assert!(contextual.validate("long-enough").is_ok());
    }
}
