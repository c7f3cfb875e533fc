//! Grammar representation.
//!
//! A grammar maps each nonterminal to the productions defined for it. Both
//! levels keep insertion order so that conversion output is deterministic.

use crate::symbol::{Nonterminal, Production, Symbol};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::rc::Rc;

/// A context-free grammar: nonterminal -> ordered set of productions.
///
/// The productions of one nonterminal form an insertion-ordered set, so a
/// production is stored at most once per head. `add_rule` is idempotent and
/// `remove_rule` removes the single stored occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grammar {
    rules: IndexMap<Nonterminal, IndexSet<Production>>,
}

impl Grammar {
    /// Create a new empty grammar.
    pub fn new() -> Self {
        Grammar {
            rules: IndexMap::new(),
        }
    }

    /// The grammar used throughout the documentation and the CLI when no
    /// grammar is supplied. Its start symbol is `S`.
    ///
    /// ```text
    /// S -> AB | BC
    /// A -> BA | a
    /// B -> CC | b
    /// C -> AB | a
    /// ```
    pub fn example() -> Self {
        let mut grammar = Grammar::new();
        for (head, body) in [
            ("S", "AB"),
            ("S", "BC"),
            ("A", "BA"),
            ("A", "a"),
            ("B", "CC"),
            ("B", "b"),
            ("C", "AB"),
            ("C", "a"),
        ] {
            grammar.add_rule(head, Production::compact(body));
        }
        grammar
    }

    /// Append a production to a nonterminal's rule set, creating the entry
    /// if absent. Returns false if the production was already present.
    pub fn add_rule(&mut self, head: impl Into<Nonterminal>, production: Production) -> bool {
        self.rules.entry(head.into()).or_default().insert(production)
    }

    /// Remove one production from a nonterminal's rule set.
    ///
    /// The remaining productions keep their order. The (possibly empty) entry
    /// for `head` stays in the grammar. Returns false if nothing was removed.
    pub fn remove_rule(&mut self, head: &str, production: &Production) -> bool {
        self.rules
            .get_mut(head)
            .map_or(false, |productions| productions.shift_remove(production))
    }

    /// Rewrite `old` into `new` in place, keeping its position.
    ///
    /// If `new` is already present the two collapse into the earlier one.
    /// Returns false if `old` is not a production of `head`.
    pub fn replace_rule(&mut self, head: &str, old: &Production, new: Production) -> bool {
        let Some(productions) = self.rules.get_mut(head) else {
            return false;
        };
        if !productions.contains(old) {
            return false;
        }
        let mut new = Some(new);
        let rewritten: IndexSet<Production> = productions
            .drain(..)
            .map(|p| match new.take() {
                Some(replacement) if p == *old => replacement,
                pending => {
                    new = pending;
                    p
                }
            })
            .collect();
        *productions = rewritten;
        true
    }

    /// Make sure `head` has an entry, even without productions.
    pub fn declare(&mut self, head: impl Into<Nonterminal>) {
        self.rules.entry(head.into()).or_default();
    }

    /// Get the productions of a nonterminal (empty if it has no entry).
    pub fn productions(&self, head: &str) -> impl Iterator<Item = &Production> {
        self.rules.get(head).into_iter().flatten()
    }

    /// Get the rule set of a nonterminal.
    pub fn rule_set(&self, head: &str) -> Option<&IndexSet<Production>> {
        self.rules.get(head)
    }

    /// Check if `head -> production` is a rule.
    pub fn contains_rule(&self, head: &str, production: &Production) -> bool {
        self.rules
            .get(head)
            .map_or(false, |productions| productions.contains(production))
    }

    /// Check if `name` is used as a nonterminal, either as a key or on a
    /// right-hand side.
    pub fn contains_nonterminal(&self, name: &str) -> bool {
        self.rules.contains_key(name)
            || self
                .iter()
                .any(|(_, production)| production.nonterminals().any(|n| &**n == name))
    }

    /// Iterate over the nonterminals that have an entry, in insertion order.
    pub fn nonterminals(&self) -> impl Iterator<Item = &Nonterminal> {
        self.rules.keys()
    }

    /// Collect every terminal appearing in some production, in first-seen order.
    pub fn terminals(&self) -> IndexSet<Rc<str>> {
        self.iter()
            .flat_map(|(_, production)| production.iter())
            .filter_map(Symbol::as_terminal)
            .cloned()
            .collect()
    }

    /// Iterate over all `(head, production)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Nonterminal, &Production)> {
        self.rules
            .iter()
            .flat_map(|(head, productions)| productions.iter().map(move |p| (head, p)))
    }

    /// Iterate over nonterminals together with their rule sets.
    pub fn rules(&self) -> impl Iterator<Item = (&Nonterminal, &IndexSet<Production>)> {
        self.rules.iter()
    }

    /// Get the total number of productions.
    pub fn len(&self) -> usize {
        self.rules.values().map(IndexSet::len).sum()
    }

    /// Check if the grammar has no productions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of nonterminals with an entry.
    pub fn num_nonterminals(&self) -> usize {
        self.rules.len()
    }

    /// Collect the rules that are not of the form `A -> BC` or `A -> a`.
    pub fn cnf_violations(&self) -> Vec<(Nonterminal, Production)> {
        self.iter()
            .filter(|(_, production)| !production.is_cnf())
            .map(|(head, production)| (head.clone(), production.clone()))
            .collect()
    }

    /// Check if every production is in Chomsky Normal Form.
    pub fn is_cnf(&self) -> bool {
        self.iter().all(|(_, production)| production.is_cnf())
    }
}

impl<N: Into<Nonterminal>> FromIterator<(N, Production)> for Grammar {
    fn from_iter<I: IntoIterator<Item = (N, Production)>>(iter: I) -> Self {
        let mut grammar = Grammar::new();
        for (head, production) in iter {
            grammar.add_rule(head, production);
        }
        grammar
    }
}

impl fmt::Display for Grammar {
    /// One `A -> α | β` line per nonterminal, sorted by name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut heads: Vec<&Nonterminal> = self.rules.keys().collect();
        heads.sort();
        for head in heads {
            write!(f, "{} ->", head)?;
            for (i, production) in self.rules[head].iter().enumerate() {
                if i > 0 {
                    write!(f, " |")?;
                }
                write!(f, " {}", production)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
