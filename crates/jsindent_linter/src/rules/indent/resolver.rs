//! Turning the offset graph into expected indentation per token.

use jsindent_config::IndentKind;
use jsindent_js_cst::{TokenId, TokenStream};
use thiserror::Error;

use super::indent_level::ActualIndent;
use super::offsets::OffsetGraph;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndentError {
    /// The graph reached a state the handlers never produce.
    #[error("{0}")]
    Internal(String),
}

#[derive(Clone, Copy)]
enum Slot {
    Unvisited,
    InProgress,
    Done(u32),
}

/// Expected indentation, in characters, of every token and comment.
#[derive(Debug)]
pub struct ResolvedIndents {
    chars: Vec<u32>,
}

impl ResolvedIndents {
    pub fn get(&self, token: TokenId) -> u32 {
        self.chars[token.index()]
    }
}

/// Resolve every token.
///
/// An ignored token resolves to its own indentation. Any other token
/// resolves to its offset plus its anchor's resolution. Chains are walked
/// with an explicit stack. A token met again while its own resolution is
/// still in progress closes a cycle, which is an [`IndentError::Internal`].
pub fn resolve_all(
    graph: &OffsetGraph,
    tokens: &TokenStream,
    kind: IndentKind,
) -> Result<ResolvedIndents, IndentError> {
    let mut slots = vec![Slot::Unvisited; tokens.len()];
    let mut chain: Vec<TokenId> = Vec::new();

    for start in tokens.ids() {
        if matches!(slots[start.index()], Slot::Done(_)) {
            continue;
        }
        chain.push(start);

        while let Some(&current) = chain.last() {
            if matches!(slots[current.index()], Slot::Done(_)) {
                chain.pop();
                continue;
            }

            let resolved = if graph.is_ignored(current) {
                Some(ActualIndent::of_token(tokens, current).good(kind))
            } else {
                let edge = graph.edge(current);
                match edge.anchor {
                    None => Some(edge.offset),
                    Some(anchor) => match slots[anchor.index()] {
                        Slot::Done(base) => Some(base.saturating_add(edge.offset)),
                        Slot::InProgress => {
                            return Err(IndentError::Internal(format!(
                                "offset cycle: token {} is anchored to token {}, which depends on it",
                                current.index(),
                                anchor.index()
                            )));
                        }
                        Slot::Unvisited => {
                            slots[current.index()] = Slot::InProgress;
                            chain.push(anchor);
                            None
                        }
                    },
                }
            };

            if let Some(value) = resolved {
                slots[current.index()] = Slot::Done(value);
                chain.pop();
            }
        }
    }

    let chars = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| match slot {
            Slot::Done(value) => Ok(value),
            _ => Err(IndentError::Internal(format!("token {index} was never resolved"))),
        })
        .collect::<Result<_, _>>()?;

    Ok(ResolvedIndents { chars })
}
