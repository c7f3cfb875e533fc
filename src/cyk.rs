//! CYK recognizer for grammars in Chomsky Normal Form.
//!
//! Construction compiles the grammar once into two rewrite indexes:
//!
//! 1. **Lexical**: terminal -> heads of `A -> terminal`
//! 2. **Binary**: (left, right) -> heads of `A -> left right`
//!
//! Nonterminals are interned to dense [`SymbolId`]s, so filling a cell
//! costs one hash lookup per (left, right) pair instead of a scan over all
//! rules. Productions of any other shape are ignored; run the grammar
//! through [`CnfConverter`](crate::cnf::CnfConverter) first.

use crate::grammar::Grammar;
use crate::intern::{SymbolId, SymbolTable};
use crate::symbol::Nonterminal;
use crate::table::ParseTable;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Rewrite index for binary rules: (left, right) -> [parent]
#[derive(Clone, Debug, Default)]
pub struct BinaryRewrites {
    table: FxHashMap<(SymbolId, SymbolId), Vec<SymbolId>>,
}

impl BinaryRewrites {
    pub fn add(&mut self, parent: SymbolId, left: SymbolId, right: SymbolId) {
        self.table.entry((left, right)).or_default().push(parent);
    }

    #[inline(always)]
    pub fn lookup(&self, left: SymbolId, right: SymbolId) -> &[SymbolId] {
        self.table
            .get(&(left, right))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of binary rules.
    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Rewrite index for lexical rules: terminal -> [parent]
#[derive(Clone, Debug, Default)]
pub struct LexicalRewrites {
    table: FxHashMap<Rc<str>, Vec<SymbolId>>,
}

impl LexicalRewrites {
    pub fn add(&mut self, terminal: Rc<str>, parent: SymbolId) {
        self.table.entry(terminal).or_default().push(parent);
    }

    #[inline(always)]
    pub fn lookup(&self, terminal: &str) -> &[SymbolId] {
        self.table
            .get(terminal)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of lexical rules.
    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// CYK recognizer compiled from a CNF grammar.
///
/// ```
/// use chomsky_cyk::{CykParser, Grammar};
///
/// let mut parser = CykParser::new(&Grammar::example(), "S");
/// assert!(parser.parse("baaba"));
/// assert!(parser.table().contains(5, 0, "S"));
/// assert!(!parser.parse("baabz"));
/// ```
#[derive(Clone, Debug)]
pub struct CykParser {
    symbols: SymbolTable,
    lexical: LexicalRewrites,
    binary: BinaryRewrites,
    start: SymbolId,
    /// Table of the most recent `parse` call
    table: ParseTable,
}

impl CykParser {
    /// Compile `grammar` with the given start symbol. The grammar is only
    /// read; later changes to it do not affect the parser.
    pub fn new(grammar: &Grammar, start: impl Into<Nonterminal>) -> Self {
        let mut symbols = SymbolTable::new();
        let mut lexical = LexicalRewrites::default();
        let mut binary = BinaryRewrites::default();
        let mut ignored = 0;

        for (head, production) in grammar.iter() {
            if let Some(terminal) = production.as_terminal() {
                let parent = symbols.intern(head);
                lexical.add(terminal.clone(), parent);
            } else if let Some((left, right)) = production.as_binary() {
                let parent = symbols.intern(head);
                let left = symbols.intern(left);
                let right = symbols.intern(right);
                binary.add(parent, left, right);
            } else {
                ignored += 1;
            }
        }
        let start = symbols.intern(&start.into());

        debug!(
            nonterminals = symbols.len(),
            lexical = lexical.len(),
            binary = binary.len(),
            ignored,
            "compiled CYK grammar"
        );

        CykParser {
            symbols,
            lexical,
            binary,
            start,
            table: ParseTable::new(),
        }
    }

    pub fn start(&self) -> &Nonterminal {
        self.symbols.resolve(self.start)
    }

    /// Decide membership of `word`, treating every `char` as one terminal.
    pub fn parse(&mut self, word: &str) -> bool {
        let tokens: Vec<String> = word.chars().map(String::from).collect();
        self.parse_tokens(&tokens)
    }

    /// Decide membership of a token sequence, one terminal per token.
    ///
    /// The empty sequence is rejected without filling a table.
    pub fn parse_tokens<T: AsRef<str>>(&mut self, tokens: &[T]) -> bool {
        if tokens.is_empty() {
            self.table = ParseTable::new();
            trace!("empty input rejected");
            return false;
        }
        self.table = self.fill(tokens);
        let accepted = self.accepts(&self.table);
        trace!(tokens = tokens.len(), accepted, "parsed");
        accepted
    }

    /// Table of the most recent parse.
    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Fill the CYK table for `tokens` bottom-up by span length.
    pub fn fill<T: AsRef<str>>(&self, tokens: &[T]) -> ParseTable {
        let n = tokens.len();
        // cells[span - 1][start]
        let mut cells: Vec<Vec<Vec<SymbolId>>> =
            (1..=n).map(|span| vec![Vec::new(); n - span + 1]).collect();

        if let Some(base) = cells.first_mut() {
            for (i, token) in tokens.iter().enumerate() {
                base[i] = self.lexical.lookup(token.as_ref()).to_vec();
            }
        }

        let mut seen = vec![false; self.symbols.len()];
        for span in 2..=n {
            for i in 0..=n - span {
                let mut found = Vec::new();
                for k in 1..span {
                    let left_cell = &cells[k - 1][i];
                    let right_cell = &cells[span - k - 1][i + k];
                    for &left in left_cell {
                        for &right in right_cell {
                            for &parent in self.binary.lookup(left, right) {
                                if !seen[parent.index()] {
                                    seen[parent.index()] = true;
                                    found.push(parent);
                                }
                            }
                        }
                    }
                }
                for parent in &found {
                    seen[parent.index()] = false;
                }
                cells[span - 1][i] = found;
            }
        }

        ParseTable::from_cells(
            cells
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|cell| {
                            cell.into_iter()
                                .map(|id| self.symbols.resolve(id).clone())
                                .collect()
                        })
                        .collect()
                })
                .collect(),
        )
    }

    /// Check whether the start symbol covers the whole word of `table`.
    pub fn accepts(&self, table: &ParseTable) -> bool {
        table.word_len() > 0 && table.contains(table.word_len(), 0, self.start())
    }
}
