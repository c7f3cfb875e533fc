//! Language equivalence of CNF conversion.
//!
//! Converted grammars are checked against a brute-force derivability oracle
//! run on the original grammar, for every short word over the grammar's
//! terminals and for randomly generated grammars.

use crate::cnf::ConverterBuilder;
use crate::cyk::CykParser;
use crate::grammar::Grammar;
use crate::parser::parse_grammar_text;
use crate::symbol::{Nonterminal, Production, Symbol};
use proptest::prelude::*;
use rustc_hash::FxHashSet;
use std::rc::Rc;

/// Least-fixpoint derivability: `chart[i][j]` holds every nonterminal
/// deriving `tokens[i..j]`. Handles ε-productions, unit cycles and
/// productions of any length.
fn derivable(grammar: &Grammar, start: &str, tokens: &[Rc<str>]) -> bool {
    let n = tokens.len();
    let mut chart: Vec<Vec<FxHashSet<Nonterminal>>> = vec![vec![FxHashSet::default(); n + 1]; n + 1];

    loop {
        let mut changed = false;
        for (head, production) in grammar.iter() {
            for i in 0..=n {
                for j in i..=n {
                    if chart[i][j].contains(head) {
                        continue;
                    }
                    if matches_span(production, tokens, &chart, i, j) {
                        chart[i][j].insert(head.clone());
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            return chart[0][n].contains(start);
        }
    }
}

/// Check whether `production` derives `tokens[i..j]` given the current chart.
fn matches_span(
    production: &Production,
    tokens: &[Rc<str>],
    chart: &[Vec<FxHashSet<Nonterminal>>],
    i: usize,
    j: usize,
) -> bool {
    let mut positions: FxHashSet<usize> = std::iter::once(i).collect();
    for symbol in production {
        let mut next = FxHashSet::default();
        for &p in &positions {
            match symbol {
                Symbol::Terminal(t) => {
                    if p < j && tokens[p] == *t {
                        next.insert(p + 1);
                    }
                }
                Symbol::Nonterminal(name) => {
                    for q in p..=j {
                        if chart[p][q].contains(name) {
                            next.insert(q);
                        }
                    }
                }
            }
        }
        if next.is_empty() {
            return false;
        }
        positions = next;
    }
    positions.contains(&j)
}

/// Every word over `alphabet` with length `0..=max_len`.
fn words(alphabet: &[Rc<str>], max_len: usize) -> Vec<Vec<Rc<str>>> {
    let mut all = vec![Vec::new()];
    let mut frontier: Vec<Vec<Rc<str>>> = vec![Vec::new()];
    for _ in 0..max_len {
        let mut longer = Vec::new();
        for word in &frontier {
            for symbol in alphabet {
                let mut extended = word.clone();
                extended.push(symbol.clone());
                longer.push(extended);
            }
        }
        all.extend(longer.iter().cloned());
        frontier = longer;
    }
    all
}

fn tokens_of(word: &str) -> Vec<Rc<str>> {
    word.chars().map(|c| Rc::from(c.to_string())).collect()
}

fn converted(grammar: &Grammar, start: &Nonterminal, fresh_start: bool) -> CykParser {
    let mut converter = ConverterBuilder::new(grammar, start.clone())
        .fresh_start(fresh_start)
        .build();
    converter.convert().unwrap();
    let cnf = converter.grammar();
    assert!(cnf.is_cnf(), "not in CNF: {:?}", cnf.cnf_violations());
    CykParser::new(cnf, converter.start().clone())
}

/// Grammars with the longest word length to enumerate.
const FIXTURES: &[(&str, usize)] = &[
    ("S -> AB | BC\nA -> BA | a\nB -> CC | b\nC -> AB | a", 7),
    ("S -> aSb | ε", 8),
    ("S -> ASA | aB\nA -> B | S\nB -> b | ε", 6),
    ("S -> aSa | bSb | a | b | ε", 7),
    ("S -> SS | (S) | ε", 8),
    ("S -> A | B\nA -> B | a\nB -> A | b", 4),
    ("S -> abcS | ABC\nA -> a\nB -> b | ε\nC -> c", 6),
    ("E -> E+T | T\nT -> T*F | F\nF -> (E) | x", 4),
];

#[test]
fn test_conversion_preserves_language() {
    for &(text, max_len) in FIXTURES {
        let parsed = parse_grammar_text(text).unwrap();
        let alphabet: Vec<Rc<str>> = parsed.grammar.terminals().into_iter().collect();

        for fresh_start in [true, false] {
            let mut parser = converted(&parsed.grammar, &parsed.start, fresh_start);
            for word in words(&alphabet, max_len).iter().filter(|w| !w.is_empty()) {
                let expected = derivable(&parsed.grammar, &parsed.start, word);
                assert_eq!(
                    parser.parse_tokens(word),
                    expected,
                    "grammar {:?}, fresh start {}, word {:?}",
                    text,
                    fresh_start,
                    word
                );
            }
        }
    }
}

#[test]
fn test_empty_string_gap_is_pinned() {
    let mut nullable_fixtures = 0;
    for &(text, _) in FIXTURES {
        let parsed = parse_grammar_text(text).unwrap();
        if !derivable(&parsed.grammar, &parsed.start, &[]) {
            continue;
        }
        nullable_fixtures += 1;

        for fresh_start in [true, false] {
            let mut converter = ConverterBuilder::new(&parsed.grammar, parsed.start.clone())
                .fresh_start(fresh_start)
                .build();
            converter.convert().unwrap();

            assert!(converter.stats().start_nullable);
            assert!(!derivable(converter.grammar(), converter.start(), &[]));

            let mut parser = CykParser::new(converter.grammar(), converter.start().clone());
            assert!(!parser.parse(""));
        }
    }
    assert_eq!(nullable_fixtures, 3);
}

#[test]
fn test_cyk_agrees_with_oracle_on_cnf() {
    let parsed = parse_grammar_text(FIXTURES[2].0).unwrap();
    let mut converter = ConverterBuilder::new(&parsed.grammar, parsed.start.clone()).build();
    converter.convert().unwrap();

    let cnf = converter.grammar();
    let start = converter.start();
    let mut parser = CykParser::new(cnf, start.clone());
    for word in words(&tokens_of("ab"), 6).iter().filter(|w| !w.is_empty()) {
        assert_eq!(parser.parse_tokens(word), derivable(cnf, start, word));
    }
}

#[test]
fn test_oracle_sanity() {
    let parsed = parse_grammar_text("S -> aSb | ε").unwrap();
    let grammar = &parsed.grammar;

    assert!(derivable(grammar, "S", &[]));
    assert!(derivable(grammar, "S", &tokens_of("aabb")));
    assert!(!derivable(grammar, "S", &tokens_of("aab")));
    assert!(!derivable(grammar, "S", &tokens_of("ba")));
}

const HEADS: [&str; 4] = ["S", "A", "B", "C"];

fn symbol() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        prop::sample::select(HEADS.to_vec()).prop_map(|name| Symbol::nonterminal(name)),
        prop::sample::select(vec!["a", "b"]).prop_map(|name| Symbol::terminal(name)),
    ]
}

fn rule() -> impl Strategy<Value = (&'static str, Production)> {
    (
        prop::sample::select(HEADS.to_vec()),
        prop::collection::vec(symbol(), 0..5).prop_map(Production::new),
    )
}

fn random_grammar() -> impl Strategy<Value = Grammar> {
    prop::collection::vec(rule(), 1..10).prop_map(|rules| rules.into_iter().collect())
}

fn repeat(a: usize, b: usize) -> String {
    format!("{}{}", "a".repeat(a), "b".repeat(b))
}

proptest! {
    #[test]
    fn prop_anbn(n in 0usize..12, m in 0usize..12) {
        let parsed = parse_grammar_text("S -> aSb | ab").unwrap();
        let mut parser = converted(&parsed.grammar, &parsed.start, true);

        prop_assert_eq!(parser.parse(&repeat(n, m)), n == m && n > 0);
    }

    #[test]
    fn prop_palindromes(word in "[ab]{1,10}") {
        let parsed = parse_grammar_text("S -> aSa | bSb | a | b | ε").unwrap();
        let mut parser = converted(&parsed.grammar, &parsed.start, true);

        let reversed: String = word.chars().rev().collect();
        prop_assert_eq!(parser.parse(&word), word == reversed);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_random_grammar_converts_to_cnf(grammar in random_grammar(), fresh_start in any::<bool>()) {
        let mut converter = ConverterBuilder::new(&grammar, "S")
            .fresh_start(fresh_start)
            .build();
        converter.convert().unwrap();

        let cnf = converter.grammar();
        prop_assert!(cnf.is_cnf());
        prop_assert!(cnf.iter().all(|(_, p)| !p.is_epsilon() && p.as_unit().is_none()));
    }

    #[test]
    fn prop_random_grammar_keeps_language(grammar in random_grammar(), fresh_start in any::<bool>()) {
        let start: Nonterminal = "S".into();
        let mut parser = converted(&grammar, &start, fresh_start);

        for word in words(&tokens_of("ab"), 4).iter().filter(|w| !w.is_empty()) {
            prop_assert_eq!(parser.parse_tokens(word), derivable(&grammar, "S", word));
        }
    }
}
