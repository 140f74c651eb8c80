// src/automaton/mod.rs
pub mod build;
pub mod determinize;
pub mod error;
pub mod io;
pub mod state;
pub mod table;

use std::collections::{BTreeSet, VecDeque};

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;

pub use determinize::{RemapQueue, determinize};
pub use error::AutomatonError;
pub use io::{load_automaton_json_bytes, save_automaton_json};
pub use state::{State, StateId, Symbol};

/// Label shared by the root of every fragment so fragments can be merged at it.
pub const INITIAL_STATE: &str = "START";

/// A finite automaton over `char` symbols. The same type holds NFAs and DFAs;
/// [`determinize`] produces one where every symbol has at most one destination.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: IndexMap<StateId, State>,
    labels: HashMap<String, StateId>,
    initial: StateId,
    next_id: u32,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton {
    /// An automaton with a single, non-accepting `START` state.
    pub fn new() -> Self {
        Self::with_initial(INITIAL_STATE)
    }

    pub fn with_initial(label: impl Into<String>) -> Self {
        let label = label.into();
        let initial = StateId(0);
        let mut states = IndexMap::new();
        let mut labels = HashMap::new();
        labels.insert(label.clone(), initial);
        states.insert(initial, State::new(initial, label));
        Self {
            states,
            labels,
            initial,
            next_id: 1,
        }
    }

    pub fn initial_id(&self) -> StateId {
        self.initial
    }

    pub fn initial_state(&self) -> &State {
        &self.states[&self.initial]
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.get_mut(&id)
    }

    pub fn id_of(&self, label: &str) -> Option<StateId> {
        self.labels.get(label).copied()
    }

    pub fn state_by_label(&self, label: &str) -> Option<&State> {
        self.id_of(label).and_then(|id| self.states.get(&id))
    }

    /// States in insertion order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Never true for a constructed automaton: the initial state always exists.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    /// Registers a fresh, non-accepting state under `label`.
    pub fn add_state(&mut self, label: impl Into<String>) -> Result<StateId, AutomatonError> {
        let id = StateId(self.next_id);
        self.insert_state(State::new(id, label))
    }

    pub fn add_final_state(
        &mut self,
        label: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<StateId, AutomatonError> {
        let id = self.add_state(label)?;
        self.states[&id].set_final_token(Some(token.into()));
        Ok(id)
    }

    /// Inserts a prepared state under its own id. Used when ids are assigned
    /// elsewhere (determinization, loading from disk).
    pub(crate) fn insert_state(&mut self, state: State) -> Result<StateId, AutomatonError> {
        if self.labels.contains_key(state.label()) {
            return Err(AutomatonError::DuplicateState(state.label().to_string()));
        }
        let id = state.id();
        if self.states.contains_key(&id) {
            return Err(AutomatonError::DuplicateState(id.to_string()));
        }
        self.next_id = self.next_id.max(id.0 + 1);
        self.labels.insert(state.label().to_string(), id);
        self.states.insert(id, state);
        Ok(id)
    }

    /// `label` when it is free, otherwise `label#<id>` (with a further `.k`
    /// suffix in the unlikely case that is taken too).
    pub(crate) fn unique_label(&self, label: &str, id: StateId) -> String {
        if !self.labels.contains_key(label) {
            return label.to_string();
        }
        let mut candidate = format!("{label}#{}", id.0);
        let mut k = 1usize;
        while self.labels.contains_key(&candidate) {
            candidate = format!("{label}#{}.{k}", id.0);
            k += 1;
        }
        candidate
    }

    pub(crate) fn replace_initial(&mut self, state: State) -> Result<(), AutomatonError> {
        if state.id() != self.initial {
            return Err(AutomatonError::UnknownState(state.id()));
        }
        let old_label = self.initial_state().label().to_string();
        if old_label != state.label() {
            if self.labels.contains_key(state.label()) {
                return Err(AutomatonError::DuplicateState(state.label().to_string()));
            }
            self.labels.remove(&old_label);
            self.labels.insert(state.label().to_string(), self.initial);
        }
        self.states.insert(self.initial, state);
        Ok(())
    }

    pub fn add_transition(
        &mut self,
        from: StateId,
        symbol: Symbol,
        to: StateId,
    ) -> Result<(), AutomatonError> {
        if !self.states.contains_key(&to) {
            return Err(AutomatonError::UnknownState(to));
        }
        self.states
            .get_mut(&from)
            .ok_or(AutomatonError::UnknownState(from))?
            .add_transition(symbol, to);
        Ok(())
    }

    pub fn set_final_token(
        &mut self,
        id: StateId,
        token: Option<String>,
    ) -> Result<(), AutomatonError> {
        self.states
            .get_mut(&id)
            .ok_or(AutomatonError::UnknownState(id))?
            .set_final_token(token);
        Ok(())
    }

    /// Removes `id` and strips it from every remaining transition set.
    pub fn forget_state(&mut self, id: StateId) -> Result<State, AutomatonError> {
        if id == self.initial {
            return Err(AutomatonError::InitialState(
                self.initial_state().label().to_string(),
            ));
        }
        let removed = self
            .states
            .shift_remove(&id)
            .ok_or(AutomatonError::UnknownState(id))?;
        self.labels.remove(removed.label());
        for state in self.states.values_mut() {
            state.forget(id);
        }
        Ok(removed)
    }

    /// States from which some final state can be reached (finals included).
    pub fn live_states(&self) -> HashSet<StateId> {
        let mut incoming: HashMap<StateId, Vec<StateId>> = HashMap::new();
        for state in self.states.values() {
            for (_, destinations) in state.transitions() {
                for &to in destinations {
                    incoming.entry(to).or_default().push(state.id());
                }
            }
        }

        let mut live: HashSet<StateId> = HashSet::new();
        let mut worklist: VecDeque<StateId> = VecDeque::new();
        for state in self.states.values().filter(|s| s.is_final()) {
            live.insert(state.id());
            worklist.push_back(state.id());
        }
        while let Some(id) = worklist.pop_front() {
            for &from in incoming.get(&id).into_iter().flatten() {
                if live.insert(from) {
                    worklist.push_back(from);
                }
            }
        }
        live
    }

    /// States reachable from the initial state, in breadth-first order.
    pub fn reachable_states(&self) -> Vec<StateId> {
        let mut seen: HashSet<StateId> = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([self.initial]);
        seen.insert(self.initial);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            let Some(state) = self.states.get(&id) else {
                continue;
            };
            for (_, destinations) in state.transitions() {
                for &to in destinations {
                    if seen.insert(to) {
                        queue.push_back(to);
                    }
                }
            }
        }
        order
    }

    /// Drops every state that cannot reach a final state. The initial state
    /// stays (with its dead transitions stripped). Returns how many were removed.
    pub fn remove_dead_states(&mut self) -> usize {
        let live = self.live_states();
        let dead: Vec<StateId> = self
            .states
            .keys()
            .copied()
            .filter(|id| *id != self.initial && !live.contains(id))
            .collect();
        self.forget_all(&dead)
    }

    /// Drops every state the initial state cannot reach.
    pub fn remove_unreachable_states(&mut self) -> usize {
        let reachable: HashSet<StateId> = self.reachable_states().into_iter().collect();
        let unreachable: Vec<StateId> = self
            .states
            .keys()
            .copied()
            .filter(|id| !reachable.contains(id))
            .collect();
        self.forget_all(&unreachable)
    }

    /// Dead states first (that can strand others), then unreachable ones.
    pub fn prune(&mut self) -> usize {
        self.remove_dead_states() + self.remove_unreachable_states()
    }

    fn forget_all(&mut self, ids: &[StateId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let doomed: HashSet<StateId> = ids.iter().copied().collect();
        self.states.retain(|id, _| !doomed.contains(id));
        self.labels.retain(|_, id| !doomed.contains(id));
        for state in self.states.values_mut() {
            for &id in ids {
                state.forget(id);
            }
        }
        log::debug!("pruned {} states", ids.len());
        ids.len()
    }

    /// Union at the root: `other`'s states are copied in under fresh ids and
    /// its initial state is folded into ours. `other` is left untouched.
    /// Copied states whose label is already taken get a `#<id>` suffix.
    pub fn concat(&mut self, other: &Automaton) -> Result<(), AutomatonError> {
        let ours = self.initial_state().label();
        let theirs = other.initial_state().label();
        if ours != theirs {
            return Err(AutomatonError::MismatchedConcat {
                left: ours.to_string(),
                right: theirs.to_string(),
            });
        }

        let incoming: Vec<&State> = other.states().filter(|s| s.id() != other.initial).collect();

        let mut renames: HashMap<StateId, StateId> = HashMap::new();
        renames.insert(other.initial, self.initial);
        for (offset, state) in incoming.iter().enumerate() {
            renames.insert(state.id(), StateId(self.next_id + offset as u32));
        }

        for state in incoming {
            let mut copy = state.clone();
            copy.rename(&renames);
            let label = self.unique_label(copy.label(), copy.id());
            if label != copy.label() {
                log::debug!("relabeled copied state `{}` as `{label}`", copy.label());
                copy.relabel(label);
            }
            self.insert_state(copy)?;
        }

        let mut root = other.initial_state().clone();
        root.rename(&renames);
        let initial = &mut self.states[&self.initial];
        initial.merge_final_token(&root);
        initial.merge_transitions(&root);
        Ok(())
    }

    pub fn is_deterministic(&self) -> bool {
        self.states.values().all(State::is_deterministic)
    }

    /// Reference simulation: tracks every state a run could be in. Works for
    /// NFAs and DFAs alike.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current: BTreeSet<StateId> = BTreeSet::from([self.initial]);
        for symbol in input.chars() {
            current = current
                .iter()
                .filter_map(|id| self.states.get(id))
                .flat_map(|s| s.get_transitions(symbol).iter().copied())
                .collect();
            if current.is_empty() {
                return false;
            }
        }
        current
            .iter()
            .filter_map(|id| self.states.get(id))
            .any(State::is_final)
    }

    /// Every symbol used by any transition, in first-seen order.
    pub fn alphabet(&self) -> Vec<Symbol> {
        let mut seen: HashSet<Symbol> = HashSet::new();
        self.states
            .values()
            .flat_map(State::symbols)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Checks that no transition points outside the automaton.
    pub fn validate(&self) -> Result<(), AutomatonError> {
        for state in self.states.values() {
            for (_, destinations) in state.transitions() {
                if let Some(&missing) = destinations.iter().find(|d| !self.states.contains_key(*d)) {
                    return Err(AutomatonError::UnknownState(missing));
                }
            }
        }
        Ok(())
    }
}
