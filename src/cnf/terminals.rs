//! Replacement of terminals inside longer productions.
//!
//! In a production of length two or more, each terminal `a` is replaced by
//! a nonterminal `T` with the single rule `T -> a`. One wrapper is shared by
//! all occurrences of the same terminal across the grammar; wrappers are
//! allocated on first encounter.

use crate::cnf::fresh::FreshSymbols;
use crate::cnf::ConvertError;
use crate::grammar::Grammar;
use crate::symbol::{Nonterminal, Production, Symbol};
use indexmap::IndexMap;
use std::rc::Rc;
use tracing::debug;

/// Replace non-solitary terminals. Returns the terminal -> wrapper mapping
/// in allocation order.
pub fn replace(
    grammar: &mut Grammar,
    fresh: &mut FreshSymbols,
) -> Result<IndexMap<Rc<str>, Nonterminal>, ConvertError> {
    let offending: Vec<(Nonterminal, Production)> = grammar
        .iter()
        .filter(|(_, production)| production.len() >= 2 && production.has_terminal())
        .map(|(head, production)| (head.clone(), production.clone()))
        .collect();

    let mut wrappers: IndexMap<Rc<str>, Nonterminal> = IndexMap::new();
    for (head, production) in &offending {
        let mut symbols = Vec::with_capacity(production.len());
        for symbol in production {
            let Symbol::Terminal(terminal) = symbol else {
                symbols.push(symbol.clone());
                continue;
            };
            let wrapper = match wrappers.get(terminal) {
                Some(wrapper) => wrapper.clone(),
                None => {
                    let wrapper = fresh.allocate(grammar)?;
                    grammar.add_rule(wrapper.clone(), Production::new(vec![symbol.clone()]));
                    wrappers.insert(terminal.clone(), wrapper.clone());
                    wrapper
                }
            };
            symbols.push(Symbol::Nonterminal(wrapper));
        }
        grammar.replace_rule(head, production, Production::new(symbols));
    }

    debug!(
        rewritten = offending.len(),
        wrappers = wrappers.len(),
        "replaced nonsolitary terminals"
    );
    Ok(wrappers)
}
