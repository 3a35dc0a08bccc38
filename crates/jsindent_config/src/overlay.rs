//! Parser for `jsindent.toml`, the optional overlay that controls how
//! findings are handled and where the ESLint config lives:
//!
//! ```toml
//! [fix]
//! unsafe_fixes = false
//!
//! [fix.rules]
//! indent = "check"
//!
//! [eslint]
//! config = "config/.eslintrc.json"
//!
//! [files]
//! extensions = ["js", "mjs"]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// How a rule's violations are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleMode {
    /// Report and auto-fix.
    #[default]
    Fix,
    /// Report only.
    Check,
    /// Do not run the rule.
    Disabled,
}

impl<'de> Deserialize<'de> for RuleMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_lowercase().as_str() {
            "fix" => Ok(RuleMode::Fix),
            "check" => Ok(RuleMode::Check),
            "disabled" | "disable" | "off" => Ok(RuleMode::Disabled),
            _ => Err(serde::de::Error::custom(format!(
                "Invalid rule mode: {s}. Expected fix, check, or disabled"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FixSettings {
    #[serde(default)]
    pub unsafe_fixes: bool,

    #[serde(default)]
    pub rules: HashMap<String, RuleMode>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct EslintReference {
    /// Path to the ESLint JSON config.
    pub config: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    ["js", "mjs", "cjs", "jsx"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Root of `jsindent.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JsindentConfig {
    #[serde(default)]
    pub fix: FixSettings,

    #[serde(default)]
    pub eslint: EslintReference,

    #[serde(default)]
    pub files: FileSettings,
}

impl JsindentConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OverlayConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, OverlayConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The configured mode, defaulting to `Fix`.
    pub fn rule_mode(&self, rule_name: &str) -> RuleMode {
        self.fix
            .rules
            .get(rule_name)
            .copied()
            .unwrap_or(RuleMode::Fix)
    }

    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rule_mode(rule_name) != RuleMode::Disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = JsindentConfig::parse("").unwrap();
        assert!(!config.fix.unsafe_fixes);
        assert!(config.fix.rules.is_empty());
        assert!(config.eslint.config.is_none());
        assert_eq!(config.files.extensions, vec!["js", "mjs", "cjs", "jsx"]);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[fix]
unsafe_fixes = true

[fix.rules]
indent = "CHECK"

[eslint]
config = "config/.eslintrc.json"

[files]
extensions = ["js"]
"#;

        let config = JsindentConfig::parse(toml).unwrap();

        assert!(config.fix.unsafe_fixes);
        assert_eq!(config.rule_mode("indent"), RuleMode::Check);
        assert_eq!(config.rule_mode("other"), RuleMode::Fix);
        assert!(config.is_rule_enabled("indent"));
        assert_eq!(config.eslint.config.as_deref(), Some("config/.eslintrc.json"));
        assert_eq!(config.files.extensions, vec!["js"]);
    }

    #[test]
    fn test_off_disables() {
        let config = JsindentConfig::parse("[fix.rules]\nindent = \"off\"\n").unwrap();
        assert_eq!(config.rule_mode("indent"), RuleMode::Disabled);
        assert!(!config.is_rule_enabled("indent"));
    }

    #[test]
    fn test_invalid_mode() {
        assert!(JsindentConfig::parse("[fix.rules]\nindent = \"maybe\"\n").is_err());
    }
}
