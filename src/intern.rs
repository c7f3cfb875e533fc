//! Nonterminal interning for the recognizer.
//!
//! The CYK engine works on dense integer IDs instead of names:
//! comparison and hashing become O(1) and rewrite tables can be keyed by
//! plain `u32` pairs. Each parser owns its own table.

use crate::symbol::Nonterminal;
use rustc_hash::FxHashMap;

/// Interned nonterminal ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bidirectional map between nonterminal names and IDs
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    name_to_id: FxHashMap<Nonterminal, SymbolId>,
    id_to_name: Vec<Nonterminal>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name, returning its unique ID
    pub fn intern(&mut self, name: &Nonterminal) -> SymbolId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }

        let id = SymbolId(self.id_to_name.len() as u32);
        self.name_to_id.insert(name.clone(), id);
        self.id_to_name.push(name.clone());
        id
    }

    /// Look up the ID of a name without interning it
    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.name_to_id.get(name).copied()
    }

    /// Look up the name for an ID
    pub fn resolve(&self, id: SymbolId) -> &Nonterminal {
        &self.id_to_name[id.index()]
    }

    /// Number of interned names
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}
