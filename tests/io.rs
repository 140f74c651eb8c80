//! DFA tables on disk (JSON).

use std::{fs, path::PathBuf};

use lexfa::{
    automaton::{load_automaton_json_bytes, save_automaton_json},
    build_nfa, determinize,
    lexer::lex_on_cpu,
};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lexfa-{}-{name}.json", std::process::id()))
}

#[test]
fn saved_table_lexes_the_same() {
    let dfa = determinize(&build_nfa(&["if", "id", "EQ -> ="]).unwrap()).unwrap();
    let path = scratch_path("roundtrip");
    save_automaton_json(&path, &dfa).unwrap();
    let bytes = fs::read(&path).unwrap();
    let _ = fs::remove_file(&path);

    let loaded = load_automaton_json_bytes(&bytes).unwrap();
    assert_eq!(loaded.len(), dfa.len());
    assert_eq!(loaded.initial_state().label(), "START");
    assert!(loaded.is_deterministic());
    for src in ["if", "id=if", "==id"] {
        assert_eq!(lex_on_cpu(&loaded, src), lex_on_cpu(&dfa, src), "{src:?}");
    }
    assert_eq!(loaded.to_string(), dfa.to_string());
}

#[test]
fn initial_state_need_not_be_first() {
    let json = r#"{
        "initial": 5,
        "states": [
            { "id": 0, "label": "END", "token": "AB" },
            { "id": 3, "label": "MID", "transitions": [{ "symbol": "b", "to": [0] }] },
            { "id": 5, "label": "START", "transitions": [{ "symbol": "a", "to": [3] }] }
        ]
    }"#;
    let dfa = load_automaton_json_bytes(json.as_bytes()).unwrap();
    assert_eq!(dfa.initial_state().label(), "START");
    let toks = lex_on_cpu(&dfa, "abab").unwrap();
    assert_eq!(toks.len(), 2);
    assert!(toks.iter().all(|t| t.token == "AB"));
}

#[test]
fn dangling_transition_is_rejected() {
    let json = r#"{
        "initial": 0,
        "states": [
            { "id": 0, "label": "START", "transitions": [{ "symbol": "a", "to": [7] }] }
        ]
    }"#;
    assert!(load_automaton_json_bytes(json.as_bytes()).is_err());
}

#[test]
fn missing_initial_state_is_rejected() {
    let json = r#"{ "initial": 2, "states": [{ "id": 0, "label": "START" }] }"#;
    let err = load_automaton_json_bytes(json.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("initial state #2"));
}

#[test]
fn duplicate_labels_are_rejected() {
    let json = r#"{
        "initial": 0,
        "states": [
            { "id": 0, "label": "START" },
            { "id": 1, "label": "X" },
            { "id": 2, "label": "X" }
        ]
    }"#;
    assert!(load_automaton_json_bytes(json.as_bytes()).is_err());
}

#[test]
fn garbage_is_rejected() {
    assert!(load_automaton_json_bytes(b"not json").is_err());
}
