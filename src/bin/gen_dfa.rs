// src/bin/gen_dfa.rs
// Compile a token/grammar file once and write the DFA to JSON.
// Usage:
//   cargo run --bin gen_dfa -- tokens.txt                # writes tables/dfa.json
//   cargo run --bin gen_dfa -- tokens.txt /path/out.json

use std::{env, fs, path::Path, time::Instant};

use anyhow::{Context, Result};
use lexfa::{automaton::save_automaton_json, build_nfa, determinize};

fn main() -> Result<()> {
    let input = env::args()
        .nth(1)
        .unwrap_or_else(|| "grammar/tokens.txt".to_string());
    let out = env::args()
        .nth(2)
        .unwrap_or_else(|| "tables/dfa.json".to_string());
    let out_path = Path::new(&out);

    let src = fs::read_to_string(&input).with_context(|| format!("failed to read {input}"))?;
    let lines: Vec<&str> = src.lines().collect();

    println!("[gen_dfa] building automata from {input}…");
    let t0 = Instant::now();
    let nfa = build_nfa(&lines).with_context(|| format!("in {input}"))?;
    let dfa = determinize(&nfa)?;

    let finals = dfa.states().filter(|s| s.is_final()).count();
    println!(
        "[gen_dfa] nfa = {} states, dfa = {} states ({} final), alphabet = {} symbols, took {} ms",
        nfa.len(),
        dfa.len(),
        finals,
        dfa.alphabet().len(),
        t0.elapsed().as_millis()
    );

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    save_automaton_json(out_path, &dfa)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_dfa] wrote {}", out_path.display());
    Ok(())
}
