// src/automaton/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::{Automaton, State, StateId};

// -------------------- JSON (de)serialization --------------------

#[derive(Serialize, Deserialize)]
struct AutomatonDisk {
    initial: StateId,
    states: Vec<StateDisk>,
}

#[derive(Serialize, Deserialize)]
struct StateDisk {
    id: StateId,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    transitions: Vec<TransitionDisk>,
}

#[derive(Serialize, Deserialize)]
struct TransitionDisk {
    symbol: char,
    to: Vec<StateId>,
}

impl From<&Automaton> for AutomatonDisk {
    fn from(a: &Automaton) -> Self {
        Self {
            initial: a.initial_id(),
            states: a
                .states()
                .map(|s| StateDisk {
                    id: s.id(),
                    label: s.label().to_string(),
                    token: s.final_token().map(str::to_string),
                    transitions: s
                        .transitions()
                        .map(|(symbol, to)| TransitionDisk {
                            symbol,
                            to: to.iter().copied().collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl AutomatonDisk {
    fn into_automaton(self) -> Result<Automaton> {
        let Some(root) = self.states.iter().find(|s| s.id == self.initial) else {
            bail!("initial state {} is not listed", self.initial);
        };
        let mut automaton = Automaton::with_initial(root.label.clone());
        // the placeholder root always has id 0; remap when the file says otherwise
        let remap = |id: StateId| -> StateId {
            if id == self.initial {
                StateId(0)
            } else if id == StateId(0) {
                self.initial
            } else {
                id
            }
        };

        for disk in &self.states {
            let mut state = State::new(remap(disk.id), disk.label.clone());
            state.set_final_token(disk.token.clone());
            for t in &disk.transitions {
                for &to in &t.to {
                    state.add_transition(t.symbol, remap(to));
                }
            }
            if disk.id == self.initial {
                automaton.replace_initial(state)?;
            } else {
                automaton
                    .insert_state(state)
                    .with_context(|| format!("state {}", disk.id))?;
            }
        }
        automaton.validate()?;
        Ok(automaton)
    }
}

pub fn save_automaton_json(path: &Path, automaton: &Automaton) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &AutomatonDisk::from(automaton))?;
    w.flush()
}

pub fn load_automaton_json_bytes(data: &[u8]) -> Result<Automaton> {
    serde_json::from_slice::<AutomatonDisk>(data)
        .context("failed to parse automaton JSON")?
        .into_automaton()
}
