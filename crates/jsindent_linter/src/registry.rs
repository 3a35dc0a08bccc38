//! Rule registry for mapping ESLint rule names to rule implementations.

use std::collections::HashMap;

use jsindent_config::OptionsError;
use serde_json::Value;

use crate::Rule;

/// Trait for rules that can be constructed from ESLint rule options.
pub trait FromConfig: Rule + Sized {
    /// The ESLint rule name this rule corresponds to.
    const RULE_NAME: &'static str;

    /// Create a rule instance from the positional options that follow the severity.
    fn from_config(options: &[Value]) -> Result<Self, OptionsError>;
}

type RuleFactory = fn(&[Value]) -> Result<Box<dyn Rule>, OptionsError>;

/// Registry mapping rule names to rule factories.
pub struct RuleRegistry {
    factories: HashMap<&'static str, RuleFactory>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with all built-in rules registered.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<crate::rules::Indent>();
        registry
    }

    pub fn register<R: FromConfig + 'static>(&mut self) {
        self.factories.insert(R::RULE_NAME, |options| {
            R::from_config(options).map(|rule| Box::new(rule) as Box<dyn Rule>)
        });
    }

    /// Create a rule from its name and options.
    /// Returns `None` if the name is not recognized.
    pub fn create_rule(
        &self,
        name: &str,
        options: &[Value],
    ) -> Option<Result<Box<dyn Rule>, OptionsError>> {
        self.factories.get(name).map(|factory| factory(options))
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
