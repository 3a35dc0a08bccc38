//! Options of the `indent` rule, parsed from ESLint's positional form:
//! `[unit, { SwitchCase, VariableDeclarator, ... }]`.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("indent unit must be \"tab\" or a non-negative integer, got {0}")]
    Unit(Value),
    #[error("invalid indent options: {0}")]
    Object(#[from] serde_json::Error),
    #[error("indent takes at most two options, got {0}")]
    TooMany(usize),
}

/// The indentation character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentKind {
    Space,
    Tab,
}

impl IndentKind {
    pub fn as_char(self) -> char {
        match self {
            IndentKind::Space => ' ',
            IndentKind::Tab => '\t',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IndentKind::Space => "space",
            IndentKind::Tab => "tab",
        }
    }
}

/// Offset of the elements of a list construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOffset {
    Levels(u32),
    /// Align every element with the first one.
    First,
}

/// Declaration keyword of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDeclaratorOffsets {
    pub var: u32,
    pub let_: u32,
    pub const_: u32,
}

impl VariableDeclaratorOffsets {
    fn uniform(levels: u32) -> Self {
        Self {
            var: levels,
            let_: levels,
            const_: levels,
        }
    }

    pub fn get(&self, kind: VariableKind) -> u32 {
        match kind {
            VariableKind::Var => self.var,
            VariableKind::Let => self.let_,
            VariableKind::Const => self.const_,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionOptions {
    /// `None` leaves parameter indentation unchecked.
    pub parameters: Option<ListOffset>,
    pub body: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallOptions {
    /// `None` leaves argument indentation unchecked.
    pub arguments: Option<ListOffset>,
}

/// Normalized `indent` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentOptions {
    pub kind: IndentKind,
    /// Characters per level: the space count, or 1 for tabs.
    pub size: u32,
    pub switch_case: u32,
    pub variable_declarator: VariableDeclaratorOffsets,
    pub outer_iife_body: u32,
    pub member_expression: Option<u32>,
    pub function_declaration: FunctionOptions,
    pub function_expression: FunctionOptions,
    pub call_expression: CallOptions,
    pub array_expression: ListOffset,
    pub object_expression: ListOffset,
}

impl Default for IndentOptions {
    fn default() -> Self {
        let function = FunctionOptions {
            parameters: None,
            body: 1,
        };
        Self {
            kind: IndentKind::Space,
            size: 4,
            switch_case: 0,
            variable_declarator: VariableDeclaratorOffsets::uniform(1),
            outer_iife_body: 1,
            member_expression: None,
            function_declaration: function,
            function_expression: function,
            call_expression: CallOptions::default(),
            array_expression: ListOffset::Levels(1),
            object_expression: ListOffset::Levels(1),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUnit {
    Tab(TabKeyword),
    Width(u32),
}

#[derive(Deserialize)]
enum TabKeyword {
    #[serde(rename = "tab")]
    Tab,
}

#[derive(Deserialize)]
enum FirstKeyword {
    #[serde(rename = "first")]
    First,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawListOffset {
    Levels(u32),
    First(FirstKeyword),
}

impl From<RawListOffset> for ListOffset {
    fn from(raw: RawListOffset) -> Self {
        match raw {
            RawListOffset::Levels(levels) => ListOffset::Levels(levels),
            RawListOffset::First(FirstKeyword::First) => ListOffset::First,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPerKind {
    var: Option<u32>,
    #[serde(rename = "let")]
    let_: Option<u32>,
    #[serde(rename = "const")]
    const_: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDeclarator {
    Uniform(u32),
    PerKind(RawPerKind),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFunction {
    parameters: Option<RawListOffset>,
    body: Option<u32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCall {
    arguments: Option<RawListOffset>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    #[serde(rename = "SwitchCase")]
    switch_case: Option<u32>,
    #[serde(rename = "VariableDeclarator")]
    variable_declarator: Option<RawDeclarator>,
    #[serde(rename = "outerIIFEBody")]
    outer_iife_body: Option<u32>,
    #[serde(rename = "MemberExpression")]
    member_expression: Option<u32>,
    #[serde(rename = "FunctionDeclaration")]
    function_declaration: Option<RawFunction>,
    #[serde(rename = "FunctionExpression")]
    function_expression: Option<RawFunction>,
    #[serde(rename = "CallExpression")]
    call_expression: Option<RawCall>,
    #[serde(rename = "ArrayExpression")]
    array_expression: Option<RawListOffset>,
    #[serde(rename = "ObjectExpression")]
    object_expression: Option<RawListOffset>,
}

impl FunctionOptions {
    fn merge(self, raw: Option<RawFunction>) -> Self {
        let Some(raw) = raw else { return self };
        Self {
            parameters: raw.parameters.map(ListOffset::from).or(self.parameters),
            body: raw.body.unwrap_or(self.body),
        }
    }
}

impl VariableDeclaratorOffsets {
    fn merge(self, raw: Option<RawDeclarator>) -> Self {
        match raw {
            None => self,
            Some(RawDeclarator::Uniform(levels)) => Self::uniform(levels),
            Some(RawDeclarator::PerKind(per_kind)) => Self {
                var: per_kind.var.unwrap_or(self.var),
                let_: per_kind.let_.unwrap_or(self.let_),
                const_: per_kind.const_.unwrap_or(self.const_),
            },
        }
    }
}

impl IndentOptions {
    /// Build options from ESLint's positional rule options.
    ///
    /// Missing options keep their defaults; a partial object merges into them.
    pub fn from_eslint_options(options: &[Value]) -> Result<Self, OptionsError> {
        if options.len() > 2 {
            return Err(OptionsError::TooMany(options.len()));
        }

        let mut result = Self::default();

        if let Some(unit) = options.first() {
            match serde_json::from_value::<RawUnit>(unit.clone()) {
                Ok(RawUnit::Tab(TabKeyword::Tab)) => {
                    result.kind = IndentKind::Tab;
                    result.size = 1;
                }
                Ok(RawUnit::Width(width)) => {
                    result.kind = IndentKind::Space;
                    result.size = width;
                }
                Err(_) => return Err(OptionsError::Unit(unit.clone())),
            }
        }

        let raw = match options.get(1) {
            Some(Value::Null) | None => RawOptions::default(),
            Some(value) => serde_json::from_value::<RawOptions>(value.clone())?,
        };

        result.switch_case = raw.switch_case.unwrap_or(result.switch_case);
        result.variable_declarator = result.variable_declarator.merge(raw.variable_declarator);
        result.outer_iife_body = raw.outer_iife_body.unwrap_or(result.outer_iife_body);
        result.member_expression = raw.member_expression.or(result.member_expression);
        result.function_declaration = result.function_declaration.merge(raw.function_declaration);
        result.function_expression = result.function_expression.merge(raw.function_expression);
        if let Some(call) = raw.call_expression {
            result.call_expression.arguments = call
                .arguments
                .map(ListOffset::from)
                .or(result.call_expression.arguments);
        }
        if let Some(array) = raw.array_expression {
            result.array_expression = array.into();
        }
        if let Some(object) = raw.object_expression {
            result.object_expression = object.into();
        }

        Ok(result)
    }

    /// Options for `size` spaces per level and otherwise default settings.
    pub fn spaces(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn tabs() -> Self {
        Self {
            kind: IndentKind::Tab,
            size: 1,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = IndentOptions::from_eslint_options(&[]).unwrap();
        assert_eq!(options, IndentOptions::default());
        assert_eq!(options.size, 4);
        assert_eq!(options.kind, IndentKind::Space);
        assert_eq!(options.function_declaration.parameters, None);
        assert_eq!(options.function_expression.body, 1);
        assert_eq!(options.member_expression, None);
    }

    #[test]
    fn test_tab_unit() {
        let options = IndentOptions::from_eslint_options(&[json!("tab")]).unwrap();
        assert_eq!(options.kind, IndentKind::Tab);
        assert_eq!(options.size, 1);
    }

    #[test]
    fn test_full_object() {
        let options = IndentOptions::from_eslint_options(&[
            json!(2),
            json!({
                "SwitchCase": 1,
                "VariableDeclarator": { "var": 2, "const": 3 },
                "outerIIFEBody": 0,
                "MemberExpression": 1,
                "FunctionDeclaration": { "parameters": "first" },
                "FunctionExpression": { "body": 2, "parameters": 1 },
                "CallExpression": { "arguments": "first" },
                "ArrayExpression": "first",
                "ObjectExpression": 2
            }),
        ])
        .unwrap();

        assert_eq!(options.size, 2);
        assert_eq!(options.switch_case, 1);
        assert_eq!(options.variable_declarator.get(VariableKind::Var), 2);
        assert_eq!(options.variable_declarator.get(VariableKind::Let), 1);
        assert_eq!(options.variable_declarator.get(VariableKind::Const), 3);
        assert_eq!(options.outer_iife_body, 0);
        assert_eq!(options.member_expression, Some(1));
        assert_eq!(options.function_declaration.parameters, Some(ListOffset::First));
        assert_eq!(options.function_declaration.body, 1);
        assert_eq!(options.function_expression.parameters, Some(ListOffset::Levels(1)));
        assert_eq!(options.function_expression.body, 2);
        assert_eq!(options.call_expression.arguments, Some(ListOffset::First));
        assert_eq!(options.array_expression, ListOffset::First);
        assert_eq!(options.object_expression, ListOffset::Levels(2));
    }

    #[test]
    fn test_uniform_variable_declarator() {
        let options =
            IndentOptions::from_eslint_options(&[json!(4), json!({ "VariableDeclarator": 2 })])
                .unwrap();
        assert_eq!(options.variable_declarator, VariableDeclaratorOffsets::uniform(2));
    }

    #[test]
    fn test_rejects_unknown_key() {
        let err = IndentOptions::from_eslint_options(&[json!(2), json!({ "Switchcase": 1 })])
            .unwrap_err();
        assert!(matches!(err, OptionsError::Object(_)));
    }

    #[test]
    fn test_rejects_bad_unit() {
        for unit in [json!(-1), json!("spaces"), json!(2.5)] {
            assert!(matches!(
                IndentOptions::from_eslint_options(&[unit]),
                Err(OptionsError::Unit(_))
            ));
        }
    }

    #[test]
    fn test_rejects_unknown_per_kind_key() {
        assert!(
            IndentOptions::from_eslint_options(&[json!(2), json!({ "VariableDeclarator": { "val": 1 } })])
                .is_err()
        );
    }
}
