//! Built-in rules.

pub mod indent;

pub use indent::Indent;
