// src/lexer/cpu.rs
// Table-driven lexer: walks chars through a DFA and cuts a token whenever the
// DFA gets stuck in an accepting state.

use super::{LexError, Token};
use crate::automaton::{Automaton, AutomatonError, State, StateId};

pub struct Lexer<'a> {
    dfa: &'a Automaton,
}

impl<'a> Lexer<'a> {
    pub fn new(dfa: &'a Automaton) -> Self {
        Self { dfa }
    }

    fn state(&self, id: StateId) -> Result<&'a State, LexError> {
        self.dfa
            .state(id)
            .ok_or(LexError::Automaton(AutomatonError::UnknownState(id)))
    }

    /// Tokenizes `input`. When the DFA has no move for a char and the current
    /// state accepts, the token is emitted and the same char is retried from
    /// the initial state; otherwise the char is a lexical error.
    ///
    /// Input that ends inside a token the DFA does not accept is reported as
    /// [`LexError::UnexpectedEnd`] instead of dropping the unfinished tail.
    pub fn run(&self, input: &str) -> Result<Vec<Token>, LexError> {
        let initial = self.dfa.initial_state();
        let mut out: Vec<Token> = Vec::new();
        let mut current = initial;
        let mut tok_start = 0usize;
        let mut consumed = 0usize;

        let mut chars = input.chars().peekable();
        while let Some(&symbol) = chars.peek() {
            match current.get_deterministic_transition(symbol)? {
                Some(next) => {
                    current = self.state(next)?;
                    consumed += 1;
                    chars.next();
                }
                // An empty token cannot be emitted, so retrying would spin.
                None if consumed == tok_start => {
                    return Err(LexError::Lexical {
                        symbol,
                        position: consumed,
                    });
                }
                None => match current.final_token() {
                    Some(token) => {
                        out.push(Token {
                            token: token.to_string(),
                            start: tok_start,
                            len: consumed - tok_start,
                        });
                        log::trace!("token {token} @{tok_start}+{}", consumed - tok_start);
                        current = initial;
                        tok_start = consumed;
                    }
                    None => {
                        return Err(LexError::Lexical {
                            symbol,
                            position: consumed,
                        });
                    }
                },
            }
        }

        if consumed > tok_start {
            let Some(token) = current.final_token() else {
                return Err(LexError::UnexpectedEnd { start: tok_start });
            };
            out.push(Token {
                token: token.to_string(),
                start: tok_start,
                len: consumed - tok_start,
            });
        }
        Ok(out)
    }
}

/// Convenience wrapper for one-shot lexing.
pub fn lex_on_cpu(dfa: &Automaton, input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(dfa).run(input)
}
