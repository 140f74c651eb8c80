// src/bin/fuzz_dfa.rs
// Generate random token sets, determinize them, and compare the DFA against a
// direct NFA simulation on random inputs.
//   - FUZZ_SEED=<u64>   seed (default 1)
//   - FUZZ_ITERS=<n>    number of token sets (default 200)
//   - FUZZ_WORDS=<n>    max words per set (default 8)

use std::time::Instant;

use anyhow::Result;
use lexfa::{Automaton, AutomatonError, determinize};
use rand::{Rng, SeedableRng, rngs::StdRng};

const ALPHABET: &[char] = &['a', 'b', 'c', 'd'];

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn random_word<R: Rng>(rng: &mut R, max_len: usize) -> String {
    let len = rng.random_range(1..=max_len);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

fn random_nfa<R: Rng>(
    rng: &mut R,
    max_words: usize,
) -> Result<(Vec<String>, Automaton), AutomatonError> {
    let mut nfa = Automaton::new();
    let mut words: Vec<String> = Vec::new();
    let n = rng.random_range(1..=max_words);
    for _ in 0..n {
        let word = random_word(rng, 5);
        nfa.concat(&Automaton::from_token(&word)?)?;
        words.push(word);
    }
    Ok((words, nfa))
}

fn main() -> Result<()> {
    let seed = env_u64("FUZZ_SEED", 1);
    let iters = env_u64("FUZZ_ITERS", 200) as usize;
    let max_words = env_u64("FUZZ_WORDS", 8).max(1) as usize;
    let mut rng = StdRng::seed_from_u64(seed);

    println!("[fuzz_dfa] seed={seed} iters={iters} max_words={max_words}");
    let t0 = Instant::now();
    let mut samples = 0usize;

    for iter in 0..iters {
        let (words, nfa) = random_nfa(&mut rng, max_words)?;
        let dfa = match determinize(&nfa) {
            Ok(dfa) => dfa,
            Err(e) => {
                eprintln!("[fuzz_dfa] iter {iter}: determinize failed: {e}\n  words={words:?}");
                std::process::exit(1);
            }
        };

        if !dfa.is_deterministic() {
            eprintln!("[fuzz_dfa] iter {iter}: result is not deterministic\n  words={words:?}");
            eprintln!("{dfa}");
            std::process::exit(1);
        }

        let mut inputs: Vec<String> = words.clone();
        for _ in 0..32 {
            inputs.push(random_word(&mut rng, 7));
        }
        for input in &inputs {
            samples += 1;
            let (want, got) = (nfa.accepts(input), dfa.accepts(input));
            if want != got {
                eprintln!(
                    "[diff] iter {iter}: {input:?} nfa={want} dfa={got}\n  words={words:?}"
                );
                eprintln!("--- nfa ---\n{nfa}\n--- dfa ---\n{dfa}");
                std::process::exit(1);
            }
        }
    }

    println!(
        "[fuzz_dfa] OK: {iters} automata, {samples} inputs in {} ms",
        t0.elapsed().as_millis()
    );
    Ok(())
}
