//! Binarization of long productions.
//!
//! `H -> X1 X2 ... Xk` with `k > 2` becomes the right-leaning chain
//! `H -> X1 Y1`, `Y1 -> X2 Y2`, ..., `Y(k-2) -> X(k-1) Xk` over fresh
//! nonterminals `Yi`. The first link takes the place of the original
//! production.

use crate::cnf::fresh::FreshSymbols;
use crate::cnf::ConvertError;
use crate::grammar::Grammar;
use crate::symbol::{Nonterminal, Production, Symbol};
use tracing::debug;

/// Split every production longer than two symbols. Returns the number of
/// productions split.
pub fn binarize(grammar: &mut Grammar, fresh: &mut FreshSymbols) -> Result<usize, ConvertError> {
    let long: Vec<(Nonterminal, Production)> = grammar
        .iter()
        .filter(|(_, production)| production.len() > 2)
        .map(|(head, production)| (head.clone(), production.clone()))
        .collect();

    let mut links_added = 0;
    for (head, production) in &long {
        let symbols = production.symbols();
        let k = symbols.len();

        let mut links = Vec::with_capacity(k - 2);
        for _ in 0..k - 2 {
            links.push(fresh.allocate(grammar)?);
        }

        let first = Production::new(vec![
            symbols[0].clone(),
            Symbol::Nonterminal(links[0].clone()),
        ]);
        grammar.replace_rule(head, production, first);

        for (i, link) in links.iter().enumerate() {
            let tail = match links.get(i + 1) {
                Some(next) => Symbol::Nonterminal(next.clone()),
                None => symbols[k - 1].clone(),
            };
            grammar.add_rule(link.clone(), Production::new(vec![symbols[i + 1].clone(), tail]));
        }
        links_added += links.len();
    }

    debug!(split = long.len(), links = links_added, "binarized long productions");
    Ok(long.len())
}
