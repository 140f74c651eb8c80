// src/lexer/mod.rs
pub mod cpu;
pub mod tokens;

use thiserror::Error;

use crate::automaton::AutomatonError;

pub use cpu::{Lexer, lex_on_cpu};
pub use tokens::Token;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// No transition on `symbol` and the current token is not accepted.
    #[error("lexical error on {symbol:?} at position {position}")]
    Lexical { symbol: char, position: usize },

    /// Input ended in the middle of a token that is not accepted.
    #[error("input ended inside an unfinished token starting at position {start}")]
    UnexpectedEnd { start: usize },

    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}
