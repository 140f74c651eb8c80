// src/grammar/parse.rs
use super::{Alternative, EPSILON, GrammarError, Rule};

#[inline]
fn is_non_terminal_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

#[inline]
fn is_terminal(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '<' | '>' | '|')
}

fn syntax(msg: impl Into<String>) -> GrammarError {
    GrammarError::Syntax(msg.into())
}

/// Splits `<NAME> ::= rest` into (`NAME`, `rest`) without validating either.
fn split_head(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix('<')?;
    let (name, rest) = rest.split_once('>')?;
    let body = rest.trim_start().strip_prefix("::=")?;
    Some((name, body))
}

/// True for lines shaped like `<NAME> ::= ...`. The body is not checked here;
/// [`parse_rule`] reports what is wrong with it.
pub fn is_expression(raw: &str) -> bool {
    split_head(raw).is_some()
}

pub fn is_sentence(raw: &str) -> bool {
    !is_expression(raw)
}

/// `<S> ::= a<A> | bc | ε`
pub fn parse_rule(raw: &str) -> Result<Rule, GrammarError> {
    let (name, body) =
        split_head(raw).ok_or_else(|| syntax(format!("`{}` is not `<NAME> ::= ...`", raw.trim())))?;
    if !is_non_terminal_name(name) {
        return Err(syntax(format!("nonterminal `<{name}>` must match [A-Z_]+")));
    }

    let mut alternatives = Vec::new();
    for alt in body.split('|') {
        let alt = alt.trim();
        // tolerate `a<A> |` and `| a<A>`
        if alt.is_empty() {
            continue;
        }
        alternatives.push(parse_alternative(name, alt)?);
    }
    if alternatives.is_empty() {
        return Err(syntax(format!("<{name}> has no alternatives")));
    }

    Ok(Rule {
        name: name.to_string(),
        alternatives,
    })
}

fn parse_alternative(rule: &str, alt: &str) -> Result<Alternative, GrammarError> {
    if alt == EPSILON {
        return Ok(Alternative::Epsilon);
    }

    let (terminals, tail) = match alt.split_once('<') {
        Some((prefix, tail)) => (prefix, Some(tail)),
        None => (alt, None),
    };

    if let Some(bad) = terminals.chars().find(|&c| !is_terminal(c)) {
        return Err(syntax(format!("<{rule}>: unexpected {bad:?} in `{alt}`")));
    }
    if terminals.contains(EPSILON) {
        return Err(syntax(format!(
            "<{rule}>: `{EPSILON}` must be an alternative on its own, found `{alt}`"
        )));
    }

    let non_terminal = match tail {
        None => None,
        Some(tail) => {
            let (name, suffix) = tail
                .split_once('>')
                .ok_or_else(|| syntax(format!("<{rule}>: unclosed `<` in `{alt}`")))?;
            if !is_non_terminal_name(name) {
                return Err(syntax(format!(
                    "<{rule}>: nonterminal `<{name}>` must match [A-Z_]+"
                )));
            }
            if !suffix.trim().is_empty() {
                return Err(syntax(format!(
                    "<{rule}>: terminals after <{name}> are not supported (`{alt}`)"
                )));
            }
            Some(name.to_string())
        }
    };

    if terminals.is_empty() {
        let name = non_terminal.unwrap_or_default();
        return Err(syntax(format!(
            "<{rule}>: unit production <{name}> needs an ε-move, which is not supported"
        )));
    }

    Ok(Alternative::Production {
        terminals: terminals.to_string(),
        non_terminal,
    })
}

/// `IF -> if` gives (`IF`, `if`). Anything else is not a token rule.
pub fn parse_token_rule(raw: &str) -> Option<(String, String)> {
    let (token, literal) = raw.split_once("->")?;
    let token = token.trim();
    let literal = literal.trim();
    let valid_token = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_token || literal.is_empty() {
        return None;
    }
    Some((token.to_string(), literal.to_string()))
}
