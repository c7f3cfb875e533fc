//! Epsilon elimination.
//!
//! Nullable nonterminals are found as a least fixpoint. Every production is
//! then extended with all variants that drop some occurrences of nullable
//! symbols, and the ε-productions themselves are removed.
//!
//! The empty string is not re-admitted through the start symbol: a grammar
//! whose start symbol is nullable loses ε from its language.

use crate::grammar::Grammar;
use crate::symbol::{Nonterminal, Production, Symbol};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Compute the set of nonterminals that derive the empty string.
///
/// A nonterminal is nullable if one of its productions consists only of
/// nullable nonterminals (ε trivially qualifies). Passes repeat until one
/// adds nothing.
pub fn nullable(grammar: &Grammar) -> FxHashSet<Nonterminal> {
    let mut nullable = FxHashSet::default();
    loop {
        let mut changed = false;
        for (head, productions) in grammar.rules() {
            if nullable.contains(head) {
                continue;
            }
            let derives_empty = productions.iter().any(|production| {
                production.iter().all(|symbol| match symbol {
                    Symbol::Nonterminal(name) => nullable.contains(name),
                    Symbol::Terminal(_) => false,
                })
            });
            if derives_empty {
                nullable.insert(head.clone());
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

/// Enumerate the non-empty productions obtained by deleting any subset of
/// the nullable occurrences in `production`.
///
/// Each occurrence is an independent choice, so `AA` with `A` nullable
/// yields `AA` and `A` (the two single-`A` variants coincide). Variants
/// keeping more leading symbols come first, starting with the input itself.
pub fn expansions(production: &Production, nullable: &FxHashSet<Nonterminal>) -> IndexSet<Production> {
    let mut partial: IndexSet<Vec<Symbol>> = IndexSet::new();
    partial.insert(Vec::new());

    for symbol in production {
        let optional = matches!(symbol, Symbol::Nonterminal(name) if nullable.contains(name));
        let mut next = IndexSet::with_capacity(partial.len() * 2);
        for prefix in &partial {
            let mut kept = prefix.clone();
            kept.push(symbol.clone());
            next.insert(kept);
            if optional {
                next.insert(prefix.clone());
            }
        }
        partial = next;
    }

    partial
        .into_iter()
        .filter(|symbols| !symbols.is_empty())
        .map(Production::new)
        .collect()
}

/// Remove all ε-productions, compensating with the variants of every other
/// production. Returns the nullable set computed before the rewrite.
pub fn eliminate(grammar: &mut Grammar) -> FxHashSet<Nonterminal> {
    let nullable = nullable(grammar);

    let mut additions = Vec::new();
    let mut epsilon_heads = Vec::new();
    for (head, production) in grammar.iter() {
        if production.is_epsilon() {
            epsilon_heads.push(head.clone());
            continue;
        }
        for variant in expansions(production, &nullable) {
            if variant != *production {
                additions.push((head.clone(), variant));
            }
        }
    }

    let mut added = 0;
    for (head, variant) in additions {
        if grammar.add_rule(head, variant) {
            added += 1;
        }
    }
    for head in &epsilon_heads {
        grammar.remove_rule(head, &Production::epsilon());
    }

    debug!(
        nullable = nullable.len(),
        added,
        removed = epsilon_heads.len(),
        "eliminated epsilon productions"
    );
    nullable
}
