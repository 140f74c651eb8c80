// src/automaton/table.rs
// Plain-text transition table: one row per state, one column per symbol.

use std::fmt;

use super::Automaton;

impl Automaton {
    /// Renders the transition table with `+---+` borders. Final states are
    /// suffixed with `*` (and their marker when it differs from the label);
    /// missing transitions show `-`.
    pub fn ascii_table(&self) -> String {
        let alphabet = self.alphabet();

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(self.len() + 1);
        let mut header = vec!["/".to_string()];
        header.extend(alphabet.iter().map(|c| c.to_string()));
        rows.push(header);

        for state in self.states() {
            let mut row = vec![state.pretty_label()];
            for &symbol in &alphabet {
                let labels: Vec<&str> = state
                    .get_transitions(symbol)
                    .iter()
                    .map(|id| self.state(*id).map_or("?", |s| s.label()))
                    .collect();
                row.push(if labels.is_empty() {
                    "-".to_string()
                } else {
                    labels.join(", ")
                });
            }
            rows.push(row);
        }

        let widths: Vec<usize> = (0..rows[0].len())
            .map(|col| rows.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
            .collect();
        let rule = {
            let mut s = String::from("+");
            for w in &widths {
                s.push_str(&"-".repeat(w + 2));
                s.push('+');
            }
            s
        };

        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        for (i, row) in rows.iter().enumerate() {
            out.push('|');
            for (cell, w) in row.iter().zip(&widths) {
                let pad = w - cell.chars().count();
                out.push(' ');
                out.push_str(cell);
                out.push_str(&" ".repeat(pad + 1));
                out.push('|');
            }
            out.push('\n');
            if i == 0 {
                out.push_str(&rule);
                out.push('\n');
            }
        }
        out.push_str(&rule);
        out
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ascii_table())
    }
}
