//! Grammar symbols and productions.
//!
//! This module provides the vocabulary shared by the grammar model, the
//! CNF conversion pipeline and the CYK recognizer: symbols (nonterminals
//! and terminals) and productions (right-hand sides of rules).

use std::fmt;
use std::rc::Rc;

/// Name of a nonterminal.
pub type Nonterminal = Rc<str>;

/// A grammar symbol - either a nonterminal or a terminal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// A symbol expanded through productions
    Nonterminal(Nonterminal),
    /// A symbol of the recognized strings themselves
    Terminal(Rc<str>),
}

impl Symbol {
    /// Create a nonterminal symbol.
    pub fn nonterminal(name: impl Into<Rc<str>>) -> Self {
        Symbol::Nonterminal(name.into())
    }

    /// Create a terminal symbol.
    pub fn terminal(name: impl Into<Rc<str>>) -> Self {
        Symbol::Terminal(name.into())
    }

    /// Get the name of this symbol.
    pub fn name(&self) -> &str {
        match self {
            Symbol::Nonterminal(name) | Symbol::Terminal(name) => name,
        }
    }

    /// Check if this symbol is a nonterminal.
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }

    /// Check if this symbol is a terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Get the nonterminal name if this is a nonterminal.
    pub fn as_nonterminal(&self) -> Option<&Nonterminal> {
        match self {
            Symbol::Nonterminal(name) => Some(name),
            _ => None,
        }
    }

    /// Get the terminal name if this is a terminal.
    pub fn as_terminal(&self) -> Option<&Rc<str>> {
        match self {
            Symbol::Terminal(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One right-hand side alternative of a rule. The empty production is ε.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production(Vec<Symbol>);

impl Production {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Production(symbols)
    }

    /// The empty production (ε).
    pub fn epsilon() -> Self {
        Production(Vec::new())
    }

    /// Build a production from single-character notation.
    ///
    /// Every character is one symbol: uppercase letters are nonterminals,
    /// anything else is a terminal. `ε` characters are dropped, so `"ε"` and
    /// `""` both yield the empty production.
    ///
    /// ```
    /// use chomsky_cyk::symbol::{Production, Symbol};
    ///
    /// let p = Production::compact("aB");
    /// assert_eq!(p.symbols(), &[Symbol::terminal("a"), Symbol::nonterminal("B")]);
    /// assert!(Production::compact("ε").is_epsilon());
    /// ```
    pub fn compact(text: &str) -> Self {
        text.chars()
            .filter(|&c| c != 'ε')
            .map(|c| {
                let name: Rc<str> = c.to_string().into();
                if c.is_uppercase() {
                    Symbol::Nonterminal(name)
                } else {
                    Symbol::Terminal(name)
                }
            })
            .collect()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if this is the empty production.
    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.0.iter()
    }

    /// The target of a unit production (exactly one nonterminal).
    pub fn as_unit(&self) -> Option<&Nonterminal> {
        match self.0.as_slice() {
            [Symbol::Nonterminal(name)] => Some(name),
            _ => None,
        }
    }

    /// The terminal of a production consisting of exactly one terminal.
    pub fn as_terminal(&self) -> Option<&Rc<str>> {
        match self.0.as_slice() {
            [Symbol::Terminal(name)] => Some(name),
            _ => None,
        }
    }

    /// The pair of a production consisting of exactly two nonterminals.
    pub fn as_binary(&self) -> Option<(&Nonterminal, &Nonterminal)> {
        match self.0.as_slice() {
            [Symbol::Nonterminal(left), Symbol::Nonterminal(right)] => Some((left, right)),
            _ => None,
        }
    }

    /// Check if this production has one of the two CNF shapes (`A -> BC`, `A -> a`).
    pub fn is_cnf(&self) -> bool {
        self.as_terminal().is_some() || self.as_binary().is_some()
    }

    /// Check if any symbol is a terminal.
    pub fn has_terminal(&self) -> bool {
        self.0.iter().any(Symbol::is_terminal)
    }

    /// Iterate over the nonterminals referenced by this production.
    pub fn nonterminals(&self) -> impl Iterator<Item = &Nonterminal> {
        self.0.iter().filter_map(Symbol::as_nonterminal)
    }
}

impl std::ops::Index<usize> for Production {
    type Output = Symbol;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<Symbol> for Production {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Production(iter.into_iter().collect())
    }
}

impl IntoIterator for Production {
    type Item = Symbol;
    type IntoIter = std::vec::IntoIter<Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Production {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Production {
    /// Single-character symbols are written back to back (`AB`), longer
    /// names are separated by spaces (`NP VP`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "ε");
        }
        let compact = self.0.iter().all(|s| s.name().chars().count() == 1);
        for (i, symbol) in self.0.iter().enumerate() {
            if i > 0 && !compact {
                write!(f, " ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}
