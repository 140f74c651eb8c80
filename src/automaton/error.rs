// src/automaton/error.rs
use thiserror::Error;

use super::state::{StateId, Symbol};

/// Construction and lookup failures on an [`Automaton`](super::Automaton).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("state `{0}` already exists")]
    DuplicateState(String),

    /// More than one destination where exactly one is required, or a second
    /// transition on a symbol that was already determined.
    #[error("state `{state}` is not deterministic on {symbol:?}")]
    Indeterminism { state: String, symbol: char },

    #[error("cannot concat automaton rooted at `{left}` with one rooted at `{right}`")]
    MismatchedConcat { left: String, right: String },

    #[error("no state with id {0}")]
    UnknownState(StateId),

    #[error("the initial state `{0}` cannot be removed")]
    InitialState(String),
}

impl AutomatonError {
    pub(crate) fn indeterminism(state: &str, symbol: Symbol) -> Self {
        Self::Indeterminism {
            state: state.to_string(),
            symbol,
        }
    }
}
