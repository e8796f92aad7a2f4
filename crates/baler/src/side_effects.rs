//! Centralized side effect detection for modules
//!
//! Single source of truth for deciding whether a module body may have
//! observable effects when evaluated, which prevents the tree-shaker from
//! emptying it. The heuristic is deliberately conservative: false positives
//! keep dead code alive, false negatives would erase an observable effect
//! and are a correctness bug. Any extension must keep more, never less.

use crate::lexer::{Token, TokenKind};

/// A module is flagged side-effecting when any token is the word `new`
/// (a constructor call at any position in the body). The fixed keyword set
/// classifies `new` as a keyword, so both kinds are accepted.
pub fn module_has_side_effects(tokens: &[Token]) -> bool {
    tokens.iter().any(|token| {
        matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier) && token.value == "new"
    })
}
