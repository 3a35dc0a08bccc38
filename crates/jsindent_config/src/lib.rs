//! Configuration for jsindent.
//!
//! `.eslintrc.json` says *which* rules run and with what options.
//! `jsindent.toml` says *how* their findings are handled.

mod eslintrc;
mod indent_options;
mod merged_config;
mod overlay;

pub use eslintrc::{EslintConfig, EslintConfigError, RuleEntry, Severity};
pub use indent_options::{
    CallOptions, FunctionOptions, IndentKind, IndentOptions, ListOffset, OptionsError,
    VariableDeclaratorOffsets, VariableKind,
};
pub use merged_config::{ConfigError, ConfigLoader, ConfiguredRule, MergedConfig};
pub use overlay::{
    EslintReference, FileSettings, FixSettings, JsindentConfig, OverlayConfigError, RuleMode,
};
