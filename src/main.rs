// src/main.rs
// Reads token/grammar definitions from stdin, prints the NFA and DFA
// tables, and optionally lexes the text given as the first argument.
//
//   printf 'if\nid\n' | cargo run -- ifid

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use lexfa::{Lexer, build_nfa, determinize};

fn main() -> Result<()> {
    let lines = io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<String>, _>>()
        .context("failed to read token definitions from stdin")?;

    let nfa = build_nfa(&lines).context("failed to build NFA")?;
    println!("### Grammar ###");
    println!("{nfa}");

    let dfa = determinize(&nfa).context("failed to determinize")?;
    println!("### DFA ###");
    println!("{dfa}");

    if let Some(src) = std::env::args().nth(1) {
        let tokens = Lexer::new(&dfa)
            .run(&src)
            .with_context(|| format!("failed to lex {src:?}"))?;
        println!("TOKENS:");
        for t in tokens {
            println!("{:<12} {:?}", t.token, t.text(&src));
        }
    }
    Ok(())
}
