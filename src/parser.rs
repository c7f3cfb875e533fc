//! Grammar text parser.
//!
//! Reads grammars written one rule per line:
//!
//! ```text
//! # comment
//! S -> AB | BC
//! A -> BA | a
//! B -> b | ε
//! ```
//!
//! `→` may be used instead of `->`. The head of the first rule is the start
//! symbol and repeated heads merge their alternatives. An alternative that
//! is exactly the name of a rule head is that nonterminal; one that
//! contains whitespace is split on it (`NP -> the dog`); otherwise every
//! character is one symbol. `ε` and the empty alternative denote the empty
//! production.
//!
//! A symbol is a nonterminal if it is the head of some rule or starts with
//! an uppercase letter; everything else is a terminal.
//!
//! # Example
//!
//! ```rust
//! use chomsky_cyk::parser::parse_grammar_text;
//!
//! let parsed = parse_grammar_text("S -> aSb | ε").unwrap();
//!
//! assert_eq!(&*parsed.start, "S");
//! assert_eq!(parsed.grammar.len(), 2);
//! ```

use crate::grammar::Grammar;
use crate::symbol::{Nonterminal, Production, Symbol};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

/// Parser error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: missing `->` separator")]
    MissingArrow { line: usize },
    #[error("line {line}: more than one `->` separator")]
    MultipleArrows { line: usize },
    #[error("line {line}: empty nonterminal")]
    EmptyNonterminal { line: usize },
    #[error("line {line}: nonterminal `{name}` contains whitespace")]
    InvalidNonterminal { line: usize, name: String },
    #[error("no rules found")]
    NoRules,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed grammar together with its start symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGrammar {
    pub grammar: Grammar,
    pub start: Nonterminal,
}

/// One rule line split into its head and raw alternatives.
struct RuleLine<'a> {
    head: &'a str,
    alternatives: Vec<&'a str>,
}

fn split_line(line: &str, number: usize) -> ParseResult<Option<RuleLine<'_>>> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut parts = line.split('→').flat_map(|part| part.split("->"));
    let head = parts.next().unwrap_or_default().trim();
    let Some(body) = parts.next() else {
        return Err(ParseError::MissingArrow { line: number });
    };
    if parts.next().is_some() {
        return Err(ParseError::MultipleArrows { line: number });
    }

    if head.is_empty() {
        return Err(ParseError::EmptyNonterminal { line: number });
    }
    if head.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidNonterminal {
            line: number,
            name: head.to_string(),
        });
    }

    Ok(Some(RuleLine {
        head,
        alternatives: body.split('|').map(str::trim).collect(),
    }))
}

fn classify(name: &str, heads: &FxHashSet<&str>) -> Symbol {
    let uppercase = name.chars().next().map_or(false, char::is_uppercase);
    if uppercase || heads.contains(name) {
        Symbol::nonterminal(name)
    } else {
        Symbol::terminal(name)
    }
}

fn parse_alternative(text: &str, heads: &FxHashSet<&str>) -> Production {
    if heads.contains(text) {
        Production::new(vec![Symbol::nonterminal(text)])
    } else if text.chars().any(char::is_whitespace) {
        text.split_whitespace()
            .filter(|&token| token != "ε")
            .map(|token| classify(token, heads))
            .collect()
    } else {
        let mut buf = [0u8; 4];
        text.chars()
            .filter(|&c| c != 'ε')
            .map(|c| classify(c.encode_utf8(&mut buf), heads))
            .collect()
    }
}

/// Parse a grammar from an iterator of lines.
pub fn parse_grammar_lines<I, S>(lines: I) -> ParseResult<ParsedGrammar>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<S> = lines.into_iter().collect();

    let mut rules = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if let Some(rule) = split_line(line.as_ref(), index + 1)? {
            rules.push(rule);
        }
    }
    let Some(first) = rules.first() else {
        return Err(ParseError::NoRules);
    };
    let start: Nonterminal = first.head.into();

    let heads: FxHashSet<&str> = rules.iter().map(|rule| rule.head).collect();
    let mut grammar = Grammar::new();
    for rule in &rules {
        grammar.declare(rule.head);
        for alternative in &rule.alternatives {
            grammar.add_rule(rule.head, parse_alternative(alternative, &heads));
        }
    }

    debug!(
        start = %start,
        nonterminals = grammar.num_nonterminals(),
        productions = grammar.len(),
        "parsed grammar"
    );
    Ok(ParsedGrammar { grammar, start })
}

/// Parse a grammar from text, one rule per line.
pub fn parse_grammar_text(text: &str) -> ParseResult<ParsedGrammar> {
    parse_grammar_lines(text.lines())
}
