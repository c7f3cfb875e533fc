//! Unit production elimination.
//!
//! A unit production `A -> B` is replaced by copies of `B`'s productions.
//! Copies may themselves be unit productions, so passes repeat until a
//! pass neither copies nor removes anything.
//!
//! Every head remembers the unit targets it has expanded. A unit production
//! to a remembered target (or to the head itself) is never re-added, which
//! ends unit cycles. Instead, each pass copies again from all remembered
//! targets, so productions a target gains later still reach the head. At
//! the fixpoint every head holds all productions of its expanded targets.

use crate::grammar::Grammar;
use crate::symbol::{Nonterminal, Production};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Outcome of unit elimination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitOutcome {
    /// Passes run, including the final pass that found nothing
    pub passes: usize,
    /// Unit productions removed
    pub removed: usize,
    /// Productions copied into other rule sets
    pub copied: usize,
}

/// Remove all unit productions from `grammar`.
pub fn eliminate(grammar: &mut Grammar) -> UnitOutcome {
    let mut expanded: FxHashMap<Nonterminal, IndexSet<Nonterminal>> = FxHashMap::default();
    let mut outcome = UnitOutcome::default();

    loop {
        outcome.passes += 1;

        let mut removals: Vec<(Nonterminal, Production)> = Vec::new();
        let mut additions: Vec<(Nonterminal, Production)> = Vec::new();
        for (head, productions) in grammar.rules() {
            let done = expanded.get(head);
            let units = productions.iter().filter_map(Production::as_unit);
            let targets: Vec<&Nonterminal> = done.into_iter().flatten().chain(units).collect();

            for target in targets {
                for copy in grammar.productions(target) {
                    if productions.contains(copy) {
                        continue;
                    }
                    if let Some(next) = copy.as_unit() {
                        if next == head || done.map_or(false, |d| d.contains(next)) {
                            continue;
                        }
                    }
                    additions.push((head.clone(), copy.clone()));
                }
            }

            for production in productions {
                if production.as_unit().is_some() {
                    removals.push((head.clone(), production.clone()));
                }
            }
        }

        if removals.is_empty() && additions.is_empty() {
            break;
        }

        for (head, production) in &removals {
            grammar.remove_rule(head, production);
            if let Some(target) = production.as_unit() {
                expanded.entry(head.clone()).or_default().insert(target.clone());
            }
        }
        for (head, copy) in additions {
            if grammar.add_rule(head, copy) {
                outcome.copied += 1;
            }
        }
        outcome.removed += removals.len();
    }

    debug!(
        passes = outcome.passes,
        removed = outcome.removed,
        copied = outcome.copied,
        "eliminated unit productions"
    );
    outcome
}
