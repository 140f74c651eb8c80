// src/grammar/mod.rs
// Text front-end: classifies input lines and assembles the composite NFA.
//
// Line kinds:
//   <S> ::= a<A> | e<A>      expression (right-linear rule); consecutive
//   <A> ::= a<A> | ε         expression lines form one grammar block
//   IF -> if                 token rule: literal with an explicit token name
//   while                    sentence: literal whose token is WHILE
//   # ...                    comment
// A blank line closes the current grammar block.

pub mod parse;

use thiserror::Error;

use crate::automaton::{Automaton, AutomatonError};

pub use parse::{is_expression, is_sentence, parse_rule, parse_token_rule};

/// Marks a rule's state as accepting.
pub const EPSILON: &str = "ε";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alternative {
    Epsilon,
    /// `terminals` then an optional `<non_terminal>`; `terminals` is never empty.
    Production {
        terminals: String,
        non_terminal: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Expression(Rule),
    TokenRule { token: String, literal: String },
    Sentence(String),
    Blank,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("grammar has no rules")]
    EmptyGrammar,

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<GrammarError>,
    },

    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}

impl GrammarError {
    fn at_line(self, line: usize) -> Self {
        match self {
            at @ GrammarError::AtLine { .. } => at,
            other => GrammarError::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }
}

impl Line {
    pub fn classify(raw: &str) -> Result<Self, GrammarError> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(Line::Blank);
        }
        if line.starts_with('#') {
            return Ok(Line::Comment);
        }
        if is_expression(line) {
            return parse_rule(line).map(Line::Expression);
        }
        if let Some((token, literal)) = parse_token_rule(line) {
            return Ok(Line::TokenRule { token, literal });
        }
        Ok(Line::Sentence(line.to_string()))
    }
}

impl Automaton {
    /// Compiles one grammar block (the first line's nonterminal is the root).
    pub fn from_raw_grammar<S: AsRef<str>>(lines: &[S]) -> Result<Self, GrammarError> {
        let rules = lines
            .iter()
            .enumerate()
            .map(|(i, l)| parse_rule(l.as_ref()).map_err(|e| e.at_line(i + 1)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(&rules)
    }
}

/// Builds the NFA for a whole definition file: every grammar block, token rule
/// and sentence becomes a fragment merged at the shared `START` root.
pub fn build_nfa<S: AsRef<str>>(lines: &[S]) -> Result<Automaton, GrammarError> {
    let mut nfa = Automaton::new();
    let mut block: Vec<Rule> = Vec::new();
    let mut block_start = 0usize;

    for (i, raw) in lines.iter().enumerate() {
        let line_no = i + 1;
        match Line::classify(raw.as_ref()).map_err(|e| e.at_line(line_no))? {
            Line::Expression(rule) => {
                if block.is_empty() {
                    block_start = line_no;
                }
                block.push(rule);
            }
            Line::Comment => continue,
            Line::Blank => flush_block(&mut nfa, &mut block, block_start)?,
            Line::TokenRule { token, literal } => {
                flush_block(&mut nfa, &mut block, block_start)?;
                let fragment = Automaton::from_token_rule(&token, &literal)
                    .map_err(|e| GrammarError::from(e).at_line(line_no))?;
                nfa.concat(&fragment)
                    .map_err(|e| GrammarError::from(e).at_line(line_no))?;
            }
            Line::Sentence(word) => {
                flush_block(&mut nfa, &mut block, block_start)?;
                let fragment = Automaton::from_token(&word)
                    .map_err(|e| GrammarError::from(e).at_line(line_no))?;
                nfa.concat(&fragment)
                    .map_err(|e| GrammarError::from(e).at_line(line_no))?;
            }
        }
    }
    flush_block(&mut nfa, &mut block, block_start)?;

    log::debug!("assembled nfa with {} states", nfa.len());
    Ok(nfa)
}

fn flush_block(
    nfa: &mut Automaton,
    block: &mut Vec<Rule>,
    line: usize,
) -> Result<(), GrammarError> {
    if block.is_empty() {
        return Ok(());
    }
    let fragment = Automaton::from_rules(block).map_err(|e| e.at_line(line))?;
    block.clear();
    nfa.concat(&fragment)
        .map_err(|e| GrammarError::from(e).at_line(line))
}
