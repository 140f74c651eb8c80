// src/automaton/build.rs
// Fragment constructors: literal tokens, named token rules and right-linear grammars.

use hashbrown::HashMap;

use super::{Automaton, AutomatonError, StateId};
use crate::grammar::{Alternative, GrammarError, Rule};

impl Automaton {
    /// `START -i-> IF_1 -f-> IF`, with `IF` final and marked `IF`.
    pub fn from_token(word: &str) -> Result<Self, AutomatonError> {
        Self::from_token_rule(&word.to_uppercase(), word)
    }

    /// Chain that spells `literal` and accepts with marker `token`
    /// (the `IF -> if` rule form).
    pub fn from_token_rule(token: &str, literal: &str) -> Result<Self, AutomatonError> {
        let mut nfa = Self::new();
        let symbols: Vec<char> = literal.chars().collect();
        if symbols.is_empty() {
            log::warn!("token `{token}` has an empty literal; it accepts nothing");
            return Ok(nfa);
        }

        let mut prev = nfa.initial_id();
        for (i, &symbol) in symbols.iter().enumerate() {
            let next = if i + 1 == symbols.len() {
                nfa.add_final_state(token, token)?
            } else {
                nfa.add_state(format!("{token}_{}", i + 1))?
            };
            nfa.add_transition(prev, symbol, next)?;
            prev = next;
        }
        Ok(nfa)
    }

    /// One state per nonterminal; the first rule is the root. Dead and
    /// unreachable states are pruned before returning.
    pub fn from_rules(rules: &[Rule]) -> Result<Self, GrammarError> {
        let (first, rest) = rules.split_first().ok_or(GrammarError::EmptyGrammar)?;

        let mut nfa = Self::new();
        let mut non_terminals: HashMap<&str, StateId> = HashMap::new();
        non_terminals.insert(&first.name, nfa.initial_id());
        for rule in rest {
            if non_terminals.contains_key(rule.name.as_str()) {
                return Err(AutomatonError::DuplicateState(rule.name.clone()).into());
            }
            let id = nfa.add_state(rule.name.clone())?;
            non_terminals.insert(&rule.name, id);
        }

        for rule in rules {
            let from = non_terminals[rule.name.as_str()];
            let mut fresh = 0usize;
            for alternative in &rule.alternatives {
                match alternative {
                    Alternative::Epsilon => {
                        nfa.set_final_token(from, Some(rule.name.clone()))?;
                    }
                    Alternative::Production {
                        terminals,
                        non_terminal,
                    } => {
                        let target = match non_terminal {
                            Some(name) => match non_terminals.get(name.as_str()) {
                                Some(&id) => Some(id),
                                None => {
                                    log::warn!(
                                        "<{}> references undefined <{name}>; alternative dropped",
                                        rule.name
                                    );
                                    continue;
                                }
                            },
                            None => None,
                        };
                        nfa.add_production(&rule.name, from, terminals, target, &mut fresh)?;
                    }
                }
            }
        }

        let pruned = nfa.prune();
        log::debug!(
            "grammar rooted at <{}>: {} states ({pruned} pruned)",
            first.name,
            nfa.len()
        );
        Ok(nfa)
    }

    // `abc<B>` becomes from -a-> NAME_1 -b-> NAME_2 -c-> B; without `<B>` the
    // last hop lands on a fresh state that accepts with marker NAME.
    fn add_production(
        &mut self,
        name: &str,
        from: StateId,
        terminals: &str,
        target: Option<StateId>,
        fresh: &mut usize,
    ) -> Result<(), AutomatonError> {
        let symbols: Vec<char> = terminals.chars().collect();
        let mut prev = from;
        for (i, &symbol) in symbols.iter().enumerate() {
            let last = i + 1 == symbols.len();
            let next = match (last, target) {
                (true, Some(target)) => target,
                _ => {
                    *fresh += 1;
                    let label = format!("{name}_{fresh}");
                    if last {
                        self.add_final_state(label, name)?
                    } else {
                        self.add_state(label)?
                    }
                }
            };
            self.add_transition(prev, symbol, next)?;
            prev = next;
        }
        Ok(())
    }
}
