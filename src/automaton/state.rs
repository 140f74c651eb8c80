// src/automaton/state.rs
use std::{collections::BTreeSet, fmt};

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::AutomatonError;

/// One terminal symbol of the input alphabet.
pub type Symbol = char;

/// Arena index of a state. Identity only; the human-readable name is the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NO_TRANSITIONS: BTreeSet<StateId> = BTreeSet::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    label: String,
    final_token: Option<String>,
    // symbol -> destinations; a symbol is only present while its set is non-empty
    transitions: IndexMap<Symbol, BTreeSet<StateId>>,
}

impl State {
    pub fn new(id: StateId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            final_token: None,
            transitions: IndexMap::new(),
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn relabel(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn final_token(&self) -> Option<&str> {
        self.final_token.as_deref()
    }

    pub fn is_final(&self) -> bool {
        self.final_token.is_some()
    }

    /// Empty markers are normalized to "not final".
    pub fn set_final_token(&mut self, token: Option<String>) {
        self.final_token = token.filter(|t| !t.is_empty());
    }

    /// Keeps our marker when we have one, otherwise takes `other`'s.
    pub fn merge_final_token(&mut self, other: &State) {
        if self.final_token.is_none() {
            self.final_token = other.final_token.clone();
        }
    }

    pub fn add_transition(&mut self, symbol: Symbol, destination: StateId) {
        self.transitions.entry(symbol).or_default().insert(destination);
    }

    /// Like [`State::add_transition`], but refuses to touch a symbol that
    /// already has a transition, even one to the same destination.
    pub fn add_deterministic_transition(
        &mut self,
        symbol: Symbol,
        destination: StateId,
    ) -> Result<(), AutomatonError> {
        if self.transitions.contains_key(&symbol) {
            return Err(AutomatonError::indeterminism(&self.label, symbol));
        }
        self.add_transition(symbol, destination);
        Ok(())
    }

    /// Replaces the destination set for `symbol`. An empty set removes the symbol.
    pub fn set_transition(&mut self, symbol: Symbol, destinations: BTreeSet<StateId>) {
        if destinations.is_empty() {
            self.transitions.shift_remove(&symbol);
        } else {
            self.transitions.insert(symbol, destinations);
        }
    }

    pub fn get_transitions(&self, symbol: Symbol) -> &BTreeSet<StateId> {
        self.transitions.get(&symbol).unwrap_or(&NO_TRANSITIONS)
    }

    pub fn get_deterministic_transition(
        &self,
        symbol: Symbol,
    ) -> Result<Option<StateId>, AutomatonError> {
        let destinations = self.get_transitions(symbol);
        if destinations.len() > 1 {
            return Err(AutomatonError::indeterminism(&self.label, symbol));
        }
        Ok(destinations.first().copied())
    }

    pub fn transitions(&self) -> impl Iterator<Item = (Symbol, &BTreeSet<StateId>)> {
        self.transitions.iter().map(|(&s, d)| (s, d))
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.transitions.keys().copied()
    }

    pub fn has_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }

    pub fn is_deterministic(&self) -> bool {
        self.transitions.values().all(|d| d.len() <= 1)
    }

    /// Strips `state` from every destination set.
    pub fn forget(&mut self, state: StateId) {
        for destinations in self.transitions.values_mut() {
            destinations.remove(&state);
        }
        self.transitions.retain(|_, d| !d.is_empty());
    }

    /// Unions `other`'s transitions into ours.
    pub fn merge_transitions(&mut self, other: &State) {
        for (symbol, destinations) in other.transitions() {
            self.transitions
                .entry(symbol)
                .or_default()
                .extend(destinations.iter().copied());
        }
    }

    /// Re-identifies this state and its destinations. Ids missing from
    /// `renames` are kept as they are.
    pub(crate) fn rename(&mut self, renames: &HashMap<StateId, StateId>) {
        let lookup = |id: StateId| renames.get(&id).copied().unwrap_or(id);
        self.id = lookup(self.id);
        for destinations in self.transitions.values_mut() {
            *destinations = destinations.iter().map(|&d| lookup(d)).collect();
        }
    }

    /// Table cell for the state column: `IF*` when the marker is the label,
    /// `ID_1(ID)*` otherwise.
    pub fn pretty_label(&self) -> String {
        match self.final_token() {
            Some(token) if token == self.label => format!("{}*", self.label),
            Some(token) => format!("{}({token})*", self.label),
            None => self.label.clone(),
        }
    }
}
