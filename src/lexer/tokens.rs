// src/lexer/tokens.rs
use serde::{Deserialize, Serialize};

/// A lexeme recognized by the DFA. `start` and `len` count chars, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub start: usize,
    pub len: usize,
}

impl Token {
    /// The matched slice of `src` (the string the token was lexed from).
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        let mut indices = src.char_indices().map(|(i, _)| i).chain([src.len()]);
        let lo = indices.nth(self.start).unwrap_or(src.len());
        let hi = indices.nth(self.len.saturating_sub(1)).unwrap_or(src.len());
        if self.len == 0 { &src[lo..lo] } else { &src[lo..hi] }
    }
}
