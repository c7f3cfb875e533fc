//! Fresh nonterminal allocation.
//!
//! Names are `{prefix}{n}` for a per-instance counter `n`. The counter only
//! moves forward, so two calls never return the same name, and names
//! already used by the grammar are skipped.

use crate::cnf::ConvertError;
use crate::grammar::Grammar;
use crate::symbol::Nonterminal;
use tracing::trace;

/// Allocator for nonterminals that do not collide with a grammar's names.
#[derive(Clone, Debug)]
pub struct FreshSymbols {
    prefix: String,
    next: u32,
    limit: u32,
    allocated: u32,
}

impl FreshSymbols {
    /// Create an allocator drawing from `{prefix}0 .. {prefix}{u32::MAX - 1}`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_limit(prefix, u32::MAX)
    }

    /// Create an allocator drawing from `{prefix}0 .. {prefix}{limit - 1}`.
    pub fn with_limit(prefix: impl Into<String>, limit: u32) -> Self {
        FreshSymbols {
            prefix: prefix.into(),
            next: 0,
            limit,
            allocated: 0,
        }
    }

    /// Return a nonterminal not used anywhere in `grammar`.
    ///
    /// Fails with [`ConvertError::SymbolsExhausted`] once every identifier
    /// of the space has been tried.
    pub fn allocate(&mut self, grammar: &Grammar) -> Result<Nonterminal, ConvertError> {
        while self.next < self.limit {
            let candidate = format!("{}{}", self.prefix, self.next);
            self.next += 1;
            if !grammar.contains_nonterminal(&candidate) {
                self.allocated += 1;
                trace!(symbol = %candidate, "allocated fresh nonterminal");
                return Ok(candidate.into());
            }
        }
        Err(ConvertError::SymbolsExhausted {
            prefix: self.prefix.clone(),
            limit: self.limit,
        })
    }

    /// Number of names handed out so far.
    pub fn allocated(&self) -> u32 {
        self.allocated
    }

    /// Number of identifiers not yet tried.
    pub fn remaining(&self) -> u32 {
        self.limit - self.next
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for FreshSymbols {
    fn default() -> Self {
        Self::new("X")
    }
}
