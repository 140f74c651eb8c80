//! NFA assembly: token chains, grammars, concat and pruning.

use lexfa::{Automaton, AutomatonError, INITIAL_STATE, StateId};

fn dest_labels(nfa: &Automaton, from: &str, symbol: char) -> Vec<String> {
    nfa.state_by_label(from)
        .unwrap()
        .get_transitions(symbol)
        .iter()
        .map(|id| nfa.state(*id).unwrap().label().to_string())
        .collect()
}

#[test]
fn from_token_builds_a_chain() {
    let nfa = Automaton::from_token("if").unwrap();
    assert_eq!(nfa.len(), 3);
    assert!(!nfa.is_empty());
    assert_eq!(nfa.initial_state().label(), INITIAL_STATE);
    assert_eq!(dest_labels(&nfa, "START", 'i'), vec!["IF_1"]);
    assert_eq!(dest_labels(&nfa, "IF_1", 'f'), vec!["IF"]);

    assert!(!nfa.state_by_label("START").unwrap().is_final());
    assert!(!nfa.state_by_label("IF_1").unwrap().is_final());
    assert_eq!(nfa.state_by_label("IF").unwrap().final_token(), Some("IF"));
    assert!(!nfa.state_by_label("IF").unwrap().has_transitions());
}

#[test]
fn from_token_else() {
    let nfa = Automaton::from_token("else").unwrap();
    assert_eq!(dest_labels(&nfa, "START", 'e'), vec!["ELSE_1"]);
    assert_eq!(dest_labels(&nfa, "ELSE_1", 'l'), vec!["ELSE_2"]);
    assert_eq!(dest_labels(&nfa, "ELSE_2", 's'), vec!["ELSE_3"]);
    assert_eq!(dest_labels(&nfa, "ELSE_3", 'e'), vec!["ELSE"]);
    let finals: Vec<&str> = nfa.states().filter(|s| s.is_final()).map(|s| s.label()).collect();
    assert_eq!(finals, vec!["ELSE"]);
}

#[test]
fn from_token_rule_uses_explicit_name() {
    let nfa = Automaton::from_token_rule("KW_IF", "if").unwrap();
    assert_eq!(dest_labels(&nfa, "START", 'i'), vec!["KW_IF_1"]);
    assert_eq!(nfa.state_by_label("KW_IF").unwrap().final_token(), Some("KW_IF"));
    assert!(nfa.accepts("if"));
    assert!(!nfa.accepts("i"));
}

#[test]
fn add_state_rejects_duplicate_labels() {
    let mut nfa = Automaton::new();
    nfa.add_state("A").unwrap();
    assert_eq!(nfa.add_state("A"), Err(AutomatonError::DuplicateState("A".into())));
    assert_eq!(
        nfa.add_state(INITIAL_STATE),
        Err(AutomatonError::DuplicateState(INITIAL_STATE.into()))
    );
}

#[test]
fn add_transition_rejects_unknown_states() {
    let mut nfa = Automaton::new();
    let root = nfa.initial_id();
    assert_eq!(
        nfa.add_transition(root, 'a', StateId(42)),
        Err(AutomatonError::UnknownState(StateId(42)))
    );
}

#[test]
fn concat_merges_at_the_root() {
    let mut nfa = Automaton::from_token("if").unwrap();
    let id = Automaton::from_token("id").unwrap();
    nfa.concat(&id).unwrap();

    assert_eq!(nfa.len(), 5);
    assert_eq!(dest_labels(&nfa, "START", 'i'), vec!["IF_1", "ID_1"]);
    assert!(nfa.accepts("if"));
    assert!(nfa.accepts("id"));
    assert!(!nfa.accepts("i"));
    nfa.validate().unwrap();

    // the merged-in fragment is untouched
    assert_eq!(id.len(), 3);
    assert_eq!(dest_labels(&id, "START", 'i'), vec!["ID_1"]);
}

#[test]
fn concat_copies_instead_of_sharing() {
    let mut nfa = Automaton::from_token("if").unwrap();
    let fragment = Automaton::from_token("do").unwrap();
    nfa.concat(&fragment).unwrap();

    let do_1 = nfa.id_of("DO_1").unwrap();
    let extra = nfa.add_final_state("X", "X").unwrap();
    nfa.add_transition(do_1, 'x', extra).unwrap();

    assert!(fragment.state_by_label("DO_1").unwrap().get_transitions('x').is_empty());
}

#[test]
fn concat_merges_root_final_marker() {
    let mut nfa = Automaton::from_token("a").unwrap();
    let mut accepting_root = Automaton::new();
    let root = accepting_root.initial_id();
    accepting_root.set_final_token(root, Some("EMPTY".into())).unwrap();
    nfa.concat(&accepting_root).unwrap();
    assert_eq!(nfa.initial_state().final_token(), Some("EMPTY"));
    assert!(nfa.accepts(""));
}

#[test]
fn concat_rejects_mismatched_roots() {
    let mut nfa = Automaton::new();
    let other = Automaton::with_initial("ROOT");
    assert!(matches!(
        nfa.concat(&other),
        Err(AutomatonError::MismatchedConcat { .. })
    ));
}

#[test]
fn concat_relabels_clashing_states() {
    let mut nfa = Automaton::from_token("if").unwrap();
    nfa.concat(&Automaton::from_token_rule("IF", "if").unwrap()).unwrap();

    assert_eq!(nfa.len(), 5);
    assert_eq!(dest_labels(&nfa, "START", 'i'), vec!["IF_1", "IF_1#3"]);
    assert_eq!(dest_labels(&nfa, "IF_1#3", 'f'), vec!["IF#4"]);
    assert_eq!(nfa.state_by_label("IF#4").unwrap().final_token(), Some("IF"));
    assert!(nfa.accepts("if"));
    nfa.validate().unwrap();

    // the same fragment twice still merges
    let twice = Automaton::from_token("a").unwrap();
    nfa.concat(&twice).unwrap();
    nfa.concat(&twice).unwrap();
    let mut labels: Vec<&str> = nfa.states().map(|s| s.label()).collect();
    let total = labels.len();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), total);
    assert!(nfa.accepts("a"));
}

#[test]
fn live_states_follow_paths_to_finals() {
    let mut nfa = Automaton::from_token("if").unwrap();
    let endless = nfa.add_state("ENDLESS").unwrap();
    let if_id = nfa.id_of("IF").unwrap();
    nfa.add_transition(if_id, 'f', endless).unwrap();

    let live = nfa.live_states();
    let mut labels: Vec<&str> = live
        .iter()
        .map(|id| nfa.state(*id).unwrap().label())
        .collect();
    labels.sort();
    assert_eq!(labels, vec!["IF", "IF_1", "START"]);
}

#[test]
fn remove_dead_states_strips_references() {
    let mut nfa = Automaton::from_token("if").unwrap();
    let endless = nfa.add_state("ENDLESS").unwrap();
    let if_id = nfa.id_of("IF").unwrap();
    nfa.add_transition(if_id, 'f', endless).unwrap();

    assert_eq!(nfa.remove_dead_states(), 1);
    assert!(nfa.state_by_label("ENDLESS").is_none());
    assert!(nfa.state_by_label("IF").unwrap().get_transitions('f').is_empty());
    nfa.validate().unwrap();
}

#[test]
fn pruning_is_idempotent() {
    let mut nfa = Automaton::from_token("ab").unwrap();
    let dead = nfa.add_state("DEAD").unwrap();
    let orphan = nfa.add_final_state("ORPHAN", "ORPHAN").unwrap();
    let root = nfa.initial_id();
    nfa.add_transition(root, 'z', dead).unwrap();
    nfa.add_transition(orphan, 'o', orphan).unwrap();

    assert_eq!(nfa.prune(), 2);
    let once: Vec<String> = nfa.states().map(|s| s.label().to_string()).collect();
    assert_eq!(nfa.prune(), 0);
    let twice: Vec<String> = nfa.states().map(|s| s.label().to_string()).collect();
    assert_eq!(once, twice);
    assert_eq!(once, vec!["START", "AB_1", "AB"]);
}

#[test]
fn pruning_keeps_a_dead_root() {
    let mut nfa = Automaton::new();
    let a = nfa.add_state("A").unwrap();
    let root = nfa.initial_id();
    nfa.add_transition(root, 'a', a).unwrap();
    nfa.prune();
    assert_eq!(nfa.len(), 1);
    assert!(!nfa.initial_state().has_transitions());
}

#[test]
fn forget_state_refuses_the_root() {
    let mut nfa = Automaton::from_token("a").unwrap();
    let root = nfa.initial_id();
    assert!(matches!(
        nfa.forget_state(root),
        Err(AutomatonError::InitialState(_))
    ));
    let a = nfa.id_of("A").unwrap();
    let removed = nfa.forget_state(a).unwrap();
    assert_eq!(removed.label(), "A");
    assert!(!nfa.initial_state().has_transitions());
}

#[test]
fn reachable_states_are_breadth_first() {
    let mut nfa = Automaton::from_token("ab").unwrap();
    nfa.concat(&Automaton::from_token("c").unwrap()).unwrap();
    let order: Vec<&str> = nfa
        .reachable_states()
        .into_iter()
        .map(|id| nfa.state(id).unwrap().label())
        .collect();
    assert_eq!(order, vec!["START", "AB_1", "C", "AB"]);
}

#[test]
fn ascii_table_lists_every_state() {
    let nfa = Automaton::from_token("if").unwrap();
    let table = nfa.ascii_table();
    let rows: Vec<&str> = table.lines().collect();
    // rule, header, rule, 3 states, rule
    assert_eq!(rows.len(), 7);
    assert!(rows[1].contains(" / ") && rows[1].contains(" i ") && rows[1].contains(" f "));
    assert!(rows[3].starts_with("| START "));
    assert!(rows[5].contains("IF*"));
    assert_eq!(table, nfa.to_string());
}
