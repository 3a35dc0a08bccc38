//! Reader for the `rules` section of `.eslintrc.json` files.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EslintConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rule '{rule}': invalid severity {value}")]
    Severity { rule: String, value: String },
    #[error("Rule '{rule}': expected a severity or an array starting with one")]
    Entry { rule: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "off" => Some(Severity::Off),
                "warn" => Some(Severity::Warn),
                "error" => Some(Severity::Error),
                _ => None,
            },
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(Severity::Off),
                Some(1) => Some(Severity::Warn),
                Some(2) => Some(Severity::Error),
                _ => None,
            },
            _ => None,
        }
    }
}

/// One entry of the `rules` object: a severity and its positional options.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub name: String,
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleEntry {
    fn parse(name: &str, value: &Value) -> Result<Self, EslintConfigError> {
        let (severity, options) = match value {
            Value::Array(items) => {
                let (first, rest) = items.split_first().ok_or_else(|| EslintConfigError::Entry {
                    rule: name.to_string(),
                })?;
                (first, rest.to_vec())
            }
            other => (other, Vec::new()),
        };

        let severity = Severity::from_value(severity).ok_or_else(|| EslintConfigError::Severity {
            rule: name.to_string(),
            value: severity.to_string(),
        })?;

        Ok(Self {
            name: name.to_string(),
            severity,
            options,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.severity != Severity::Off
    }
}

/// The subset of an ESLint config file jsindent understands.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EslintConfig {
    #[serde(default)]
    rules: BTreeMap<String, Value>,
}

impl EslintConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EslintConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, EslintConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// All rule entries, sorted by name.
    pub fn rules(&self) -> Result<Vec<RuleEntry>, EslintConfigError> {
        self.rules
            .iter()
            .map(|(name, value)| RuleEntry::parse(name, value))
            .collect()
    }

    pub fn rule(&self, name: &str) -> Result<Option<RuleEntry>, EslintConfigError> {
        self.rules
            .get(name)
            .map(|value| RuleEntry::parse(name, value))
            .transpose()
    }
}
