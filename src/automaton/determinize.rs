// src/automaton/determinize.rs
// Subset construction. Labeled moves only: ε-transitions are not modeled, so
// there is no closure step.

use std::collections::{BTreeSet, VecDeque};

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;

use super::{Automaton, AutomatonError, State, StateId, Symbol};

/// Work queue for subset construction: hands out one DFA identity per
/// distinct set of NFA states and queues each identity for expansion once.
#[derive(Debug, Default)]
pub struct RemapQueue {
    discovered: HashSet<StateId>,
    to_discover: VecDeque<(StateId, BTreeSet<StateId>)>,
    queued: HashSet<StateId>,
    remap_state: IndexMap<StateId, BTreeSet<StateId>>,
    by_merged: HashMap<BTreeSet<StateId>, StateId>,
    next_state: u32,
}

impl RemapQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity for `merged`, minting (and queueing) a new one the first time
    /// this exact set is seen. The flag tells whether it was minted now.
    pub fn state_by_merged_states(&mut self, merged: BTreeSet<StateId>) -> (StateId, bool) {
        if let Some(&id) = self.by_merged.get(&merged) {
            return (id, false);
        }
        let id = StateId(self.next_state);
        self.next_state += 1;
        self.by_merged.insert(merged.clone(), id);
        self.remap_state.insert(id, merged);
        self.push_to_discovery(id);
        (id, true)
    }

    /// Queues `id` unless it is already closed or already waiting.
    pub fn push_to_discovery(&mut self, id: StateId) {
        if self.discovered.contains(&id) || self.queued.contains(&id) {
            return;
        }
        let Some(merged) = self.remap_state.get(&id) else {
            return;
        };
        self.queued.insert(id);
        self.to_discover.push_back((id, merged.clone()));
    }

    pub fn pop_to_discover(&mut self) -> Option<(StateId, BTreeSet<StateId>)> {
        let next = self.to_discover.pop_front()?;
        self.queued.remove(&next.0);
        Some(next)
    }

    pub fn set_discovered(&mut self, id: StateId) {
        self.discovered.insert(id);
    }

    pub fn is_discovered(&self, id: StateId) -> bool {
        self.discovered.contains(&id)
    }

    pub fn merged_states(&self, id: StateId) -> Option<&BTreeSet<StateId>> {
        self.remap_state.get(&id)
    }

    /// Number of identities handed out so far.
    pub fn len(&self) -> usize {
        self.remap_state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remap_state.is_empty()
    }
}

/// Builds a DFA accepting the same language as `nfa`.
///
/// States are discovered breadth-first from `{initial}`, so the numbering is
/// stable for a given NFA. A DFA state built from a single NFA state keeps that
/// state's label; merged states are labeled `q<id>`. A label already in use
/// gets a `#<id>` suffix. When several underlying
/// states are final, the marker of the lowest id (earliest defined) wins.
pub fn determinize(nfa: &Automaton) -> Result<Automaton, AutomatonError> {
    nfa.validate()?;
    let mut remap = RemapQueue::new();
    let (root, _) = remap.state_by_merged_states(BTreeSet::from([nfa.initial_id()]));

    let mut dfa = Automaton::with_initial(nfa.initial_state().label());
    debug_assert_eq!(root, dfa.initial_id());

    while let Some((id, merged)) = remap.pop_to_discover() {
        remap.set_discovered(id);

        let underlying: Vec<&State> = merged.iter().filter_map(|s| nfa.state(*s)).collect();
        // an NFA label may already spell `q<n>`; labels stay unique either way
        let label = dfa_label(id, &underlying);
        let label = if id == dfa.initial_id() {
            label
        } else {
            dfa.unique_label(&label, id)
        };
        let mut state = State::new(id, label);
        state.set_final_token(
            underlying
                .iter()
                .find_map(|s| s.final_token())
                .map(str::to_string),
        );

        // Per-symbol union over every underlying state: two underlying states
        // moving on the same symbol is exactly where the NFA was ambiguous.
        let mut moves: IndexMap<Symbol, BTreeSet<StateId>> = IndexMap::new();
        for nfa_state in &underlying {
            for (symbol, destinations) in nfa_state.transitions() {
                moves
                    .entry(symbol)
                    .or_default()
                    .extend(destinations.iter().copied());
            }
        }

        for (symbol, destinations) in moves {
            let (target, minted) = remap.state_by_merged_states(destinations);
            if minted {
                log::trace!("dfa state {target} <- {:?}", remap.merged_states(target));
            }
            state.add_deterministic_transition(symbol, target)?;
        }

        if id == dfa.initial_id() {
            dfa.replace_initial(state)?;
        } else {
            dfa.insert_state(state)?;
        }
    }

    log::debug!(
        "determinized {} nfa states into {} dfa states",
        nfa.len(),
        dfa.len()
    );
    Ok(dfa)
}

fn dfa_label(id: StateId, underlying: &[&State]) -> String {
    match underlying {
        [single] => single.label().to_string(),
        _ => format!("q{}", id.0),
    }
}
