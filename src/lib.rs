// src/lib.rs
pub mod automaton;
pub mod grammar;
pub mod lexer;

pub use automaton::{Automaton, AutomatonError, INITIAL_STATE, State, StateId, determinize};
pub use grammar::{GrammarError, build_nfa};
pub use lexer::{LexError, Lexer, Token};
