//! Merged configuration from `.eslintrc.json` and `jsindent.toml`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::{EslintConfig, EslintConfigError, JsindentConfig, OverlayConfigError, RuleMode};

/// Rule that runs when no ESLint config is found.
const DEFAULT_RULE: &str = "indent";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ESLint config error: {0}")]
    Eslint(#[from] EslintConfigError),
    #[error("jsindent.toml error: {0}")]
    Overlay(#[from] OverlayConfigError),
    #[error("ESLint config not found: {0}")]
    NotFound(PathBuf),
}

/// A rule with its ESLint options and its handling mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredRule {
    pub name: String,
    pub options: Vec<Value>,
    pub mode: RuleMode,
}

impl ConfiguredRule {
    pub fn is_enabled(&self) -> bool {
        self.mode != RuleMode::Disabled
    }

    pub fn should_fix(&self) -> bool {
        self.mode == RuleMode::Fix
    }
}

#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub rules: Vec<ConfiguredRule>,
    pub unsafe_fixes: bool,
    pub extensions: Vec<String>,
    /// Files the configuration was read from.
    pub sources: Vec<PathBuf>,
}

impl MergedConfig {
    /// Combine an optional ESLint config with an optional overlay.
    ///
    /// Without an ESLint config, `indent` runs with default options.
    pub fn new(
        eslint: Option<&EslintConfig>,
        overlay: Option<&JsindentConfig>,
    ) -> Result<Self, ConfigError> {
        let overlay = overlay.cloned().unwrap_or_default();

        let rules = match eslint {
            Some(eslint) => eslint
                .rules()?
                .into_iter()
                .filter(|entry| entry.is_enabled())
                .map(|entry| ConfiguredRule {
                    mode: overlay.rule_mode(&entry.name),
                    name: entry.name,
                    options: entry.options,
                })
                .collect(),
            None => vec![ConfiguredRule {
                name: DEFAULT_RULE.to_string(),
                options: Vec::new(),
                mode: overlay.rule_mode(DEFAULT_RULE),
            }],
        };

        Ok(Self {
            rules,
            unsafe_fixes: overlay.fix.unsafe_fixes,
            extensions: overlay.files.extensions,
            sources: Vec::new(),
        })
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = &ConfiguredRule> {
        self.rules.iter().filter(|r| r.is_enabled())
    }

    pub fn get_rule(&self, name: &str) -> Option<&ConfiguredRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.get_rule(name).is_some_and(ConfiguredRule::is_enabled)
    }

    /// Replace the options of `name`, adding the rule if it is not configured.
    pub fn override_options(&mut self, name: &str, options: Vec<Value>) {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.name == name) {
            rule.options = options;
        } else {
            self.rules.push(ConfiguredRule {
                name: name.to_string(),
                options,
                mode: RuleMode::Fix,
            });
        }
    }
}

/// Finds and loads both config files.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    eslint_path: Option<PathBuf>,
    overlay_path: Option<PathBuf>,
    /// Found by [`ConfigLoader::find_eslint`]; an overlay pointer wins over it.
    discovered_eslint: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eslint(mut self, path: impl AsRef<Path>) -> Self {
        self.eslint_path = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn overlay(mut self, path: impl AsRef<Path>) -> Self {
        self.overlay_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Look for `jsindent.toml` in `dir` unless a path was given.
    #[must_use]
    pub fn find_overlay(mut self, dir: &Path) -> Self {
        if self.overlay_path.is_none() {
            self.overlay_path = ["jsindent.toml", ".jsindent.toml"]
                .into_iter()
                .map(|name| dir.join(name))
                .find(|path| path.exists());
        }
        self
    }

    /// Look for an ESLint JSON config in `dir`, used when neither a path
    /// nor the overlay names one.
    #[must_use]
    pub fn find_eslint(mut self, dir: &Path) -> Self {
        self.discovered_eslint = [".eslintrc.json", ".eslintrc"]
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists());
        self
    }

    pub fn load(self) -> Result<MergedConfig, ConfigError> {
        let mut sources = Vec::new();
        let overlay = match self.overlay_path {
            Some(path) if path.exists() => {
                let overlay = JsindentConfig::from_file(&path)?;
                sources.push(path);
                Some(overlay)
            }
            _ => None,
        };

        // An explicit path first, then the overlay's pointer, then discovery.
        let eslint_path = self
            .eslint_path
            .or_else(|| {
                overlay
                    .as_ref()
                    .and_then(|o| o.eslint.config.as_ref().map(PathBuf::from))
            })
            .or(self.discovered_eslint);

        let eslint = match eslint_path {
            Some(path) if path.exists() => {
                let eslint = EslintConfig::from_file(&path)?;
                sources.push(path);
                Some(eslint)
            }
            Some(path) => return Err(ConfigError::NotFound(path)),
            None => None,
        };

        let mut merged = MergedConfig::new(eslint.as_ref(), overlay.as_ref())?;
        merged.sources = sources;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_eslint() -> EslintConfig {
        EslintConfig::parse(
            r#"{ "rules": {
                "indent": ["error", 2, { "SwitchCase": 1 }],
                "semi": ["error", "always"],
                "quotes": "off"
            } }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_merged_config_without_overlay() {
        let merged = MergedConfig::new(Some(&sample_eslint()), None).unwrap();

        assert_eq!(merged.rules.len(), 2);
        assert!(!merged.unsafe_fixes);
        assert!(merged.rules.iter().all(|r| r.mode == RuleMode::Fix));

        let indent = merged.get_rule("indent").unwrap();
        assert_eq!(indent.options, vec![json!(2), json!({ "SwitchCase": 1 })]);
        assert!(!merged.is_rule_enabled("quotes"));
    }

    #[test]
    fn test_merged_config_with_overlay() {
        let overlay = JsindentConfig::parse(
            r#"
[fix]
unsafe_fixes = true

[fix.rules]
indent = "check"
semi = "disabled"
"#,
        )
        .unwrap();

        let merged = MergedConfig::new(Some(&sample_eslint()), Some(&overlay)).unwrap();
        assert!(merged.unsafe_fixes);

        let indent = merged.get_rule("indent").unwrap();
        assert!(indent.is_enabled());
        assert!(!indent.should_fix());

        let enabled: Vec<_> = merged.enabled_rules().map(|r| r.name.as_str()).collect();
        assert_eq!(enabled, vec!["indent"]);
    }

    #[test]
    fn test_default_rule_without_eslint_config() {
        let merged = MergedConfig::new(None, None).unwrap();
        assert_eq!(merged.rules.len(), 1);
        assert_eq!(merged.rules[0].name, "indent");
        assert!(merged.rules[0].options.is_empty());
    }

    #[test]
    fn test_override_options() {
        let mut merged = MergedConfig::new(Some(&sample_eslint()), None).unwrap();
        merged.override_options("indent", vec![json!("tab")]);
        assert_eq!(merged.get_rule("indent").unwrap().options, vec![json!("tab")]);
    }

    #[test]
    fn test_loader_follows_overlay_pointer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lint.json"),
            r#"{ "rules": { "indent": ["warn", "tab"] } }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("jsindent.toml"),
            format!(
                "[eslint]\nconfig = {:?}\n",
                dir.path().join("lint.json").display().to_string()
            ),
        )
        .unwrap();

        std::fs::write(
            dir.path().join(".eslintrc.json"),
            r#"{ "rules": { "indent": ["warn", 8] } }"#,
        )
        .unwrap();

        let merged = ConfigLoader::new()
            .find_overlay(dir.path())
            .find_eslint(dir.path())
            .load()
            .unwrap();
        assert_eq!(merged.get_rule("indent").unwrap().options, vec![json!("tab")]);
        assert_eq!(merged.sources.len(), 2);
    }

    #[test]
    fn test_loader_discovers_eslint_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".eslintrc.json"),
            r#"{ "rules": { "indent": ["error", 2] } }"#,
        )
        .unwrap();

        let merged = ConfigLoader::new()
            .find_overlay(dir.path())
            .find_eslint(dir.path())
            .load()
            .unwrap();
        assert_eq!(merged.get_rule("indent").unwrap().options, vec![json!(2)]);
        assert_eq!(merged.sources, vec![dir.path().join(".eslintrc.json")]);
    }

    #[test]
    fn test_loader_missing_eslint_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new().eslint(dir.path().join("nope.json")).load();
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
