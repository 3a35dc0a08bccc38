//! Measuring a line's leading whitespace and describing mismatches.

use jsindent_config::IndentKind;
use jsindent_js_cst::{TokenId, TokenStream};

/// The spaces and tabs that start a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActualIndent {
    pub spaces: u32,
    pub tabs: u32,
}

impl ActualIndent {
    /// Count the run of spaces and tabs at the start of `line`.
    pub fn measure(line: &str) -> Self {
        let mut indent = Self::default();
        for c in line.chars() {
            match c {
                ' ' => indent.spaces += 1,
                '\t' => indent.tabs += 1,
                _ => break,
            }
        }
        indent
    }

    /// Indentation of the line `token` starts on.
    pub fn of_token(tokens: &TokenStream, token: TokenId) -> Self {
        Self::measure(tokens.line_prefix(token))
    }

    /// Characters of the configured kind.
    pub fn good(self, kind: IndentKind) -> u32 {
        match kind {
            IndentKind::Space => self.spaces,
            IndentKind::Tab => self.tabs,
        }
    }

    /// Characters of the other kind.
    pub fn bad(self, kind: IndentKind) -> u32 {
        match kind {
            IndentKind::Space => self.tabs,
            IndentKind::Tab => self.spaces,
        }
    }

    pub fn is_mixed(self) -> bool {
        self.spaces > 0 && self.tabs > 0
    }

    /// Whether this indentation satisfies `expected` characters of `kind`.
    ///
    /// Mixed lines always pass; they are another rule's business.
    pub fn satisfies(self, expected: u32, kind: IndentKind) -> bool {
        self.is_mixed() || (self.good(kind) == expected && self.bad(kind) == 0)
    }
}

fn plural(word: &str, count: u32) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// `Expected indentation of 4 spaces but found 2.`
///
/// The found count stays bare when it uses the expected character.
pub fn indentation_message(expected: u32, actual: ActualIndent, kind: IndentKind) -> String {
    let found = if actual.spaces > 0 {
        if kind == IndentKind::Space {
            actual.spaces.to_string()
        } else {
            format!("{} {}", actual.spaces, plural("space", actual.spaces))
        }
    } else if actual.tabs > 0 {
        if kind == IndentKind::Tab {
            actual.tabs.to_string()
        } else {
            format!("{} {}", actual.tabs, plural("tab", actual.tabs))
        }
    } else {
        "0".to_string()
    };

    format!(
        "Expected indentation of {expected} {} but found {found}.",
        plural(kind.name(), expected)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure() {
        assert_eq!(ActualIndent::measure("    "), ActualIndent { spaces: 4, tabs: 0 });
        assert_eq!(ActualIndent::measure("\t\tx"), ActualIndent { spaces: 0, tabs: 2 });
        assert_eq!(ActualIndent::measure(" \t "), ActualIndent { spaces: 2, tabs: 1 });
        assert_eq!(ActualIndent::measure(""), ActualIndent::default());
    }

    #[test]
    fn test_satisfies() {
        let spaces = ActualIndent { spaces: 4, tabs: 0 };
        assert!(spaces.satisfies(4, IndentKind::Space));
        assert!(!spaces.satisfies(2, IndentKind::Space));
        assert!(!spaces.satisfies(0, IndentKind::Tab));

        let mixed = ActualIndent { spaces: 1, tabs: 1 };
        assert!(mixed.satisfies(8, IndentKind::Space));
    }

    #[test]
    fn test_message_same_character() {
        assert_eq!(
            indentation_message(4, ActualIndent { spaces: 2, tabs: 0 }, IndentKind::Space),
            "Expected indentation of 4 spaces but found 2."
        );
        assert_eq!(
            indentation_message(1, ActualIndent { spaces: 0, tabs: 2 }, IndentKind::Tab),
            "Expected indentation of 1 tab but found 2."
        );
    }

    #[test]
    fn test_message_other_character() {
        assert_eq!(
            indentation_message(2, ActualIndent { spaces: 0, tabs: 1 }, IndentKind::Space),
            "Expected indentation of 2 spaces but found 1 tab."
        );
        assert_eq!(
            indentation_message(0, ActualIndent { spaces: 4, tabs: 0 }, IndentKind::Tab),
            "Expected indentation of 0 tabs but found 4 spaces."
        );
        assert_eq!(
            indentation_message(1, ActualIndent { spaces: 1, tabs: 0 }, IndentKind::Tab),
            "Expected indentation of 1 tab but found 1 space."
        );
    }

    #[test]
    fn test_message_nothing_found() {
        assert_eq!(
            indentation_message(8, ActualIndent::default(), IndentKind::Space),
            "Expected indentation of 8 spaces but found 0."
        );
    }
}
