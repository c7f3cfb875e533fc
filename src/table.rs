//! CYK parse table.
//!
//! The table is triangular: for a word of length `n` there are `n` rows,
//! one per span length, and the row for span `L` has `n - L + 1` cells.
//! Cell `(L, i)` holds the nonterminals deriving `word[i..i + L]`.

use crate::symbol::Nonterminal;
use std::fmt;

/// The per-cell nonterminal sets of one CYK run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseTable {
    /// rows[span - 1][start] = sorted nonterminals
    rows: Vec<Vec<Vec<Nonterminal>>>,
}

impl ParseTable {
    /// Create the table for the empty word.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from unsorted cells indexed by `[span - 1][start]`.
    pub(crate) fn from_cells(mut rows: Vec<Vec<Vec<Nonterminal>>>) -> Self {
        for cell in rows.iter_mut().flatten() {
            cell.sort();
            cell.dedup();
        }
        ParseTable { rows }
    }

    /// Length of the word this table was filled for.
    pub fn word_len(&self) -> usize {
        self.rows.len()
    }

    /// Nonterminals deriving the `span` symbols starting at `start`, sorted
    /// by name. Out-of-range positions yield an empty slice.
    pub fn cell(&self, span: usize, start: usize) -> &[Nonterminal] {
        span.checked_sub(1)
            .and_then(|row| self.rows.get(row))
            .and_then(|row| row.get(start))
            .map(|cell| cell.as_slice())
            .unwrap_or(&[])
    }

    /// Check if `name` derives the `span` symbols starting at `start`.
    pub fn contains(&self, span: usize, start: usize, name: &str) -> bool {
        self.cell(span, start)
            .binary_search_by(|candidate| (**candidate).cmp(name))
            .is_ok()
    }

    /// Nonterminals deriving the whole word.
    pub fn root(&self) -> &[Nonterminal] {
        self.cell(self.word_len(), 0)
    }

    /// Iterate over `(span, cells)` rows by decreasing span.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[Vec<Nonterminal>])> {
        self.rows
            .iter()
            .enumerate()
            .rev()
            .map(|(row, cells)| (row + 1, cells.as_slice()))
    }

    /// Total number of (cell, nonterminal) entries.
    pub fn len(&self) -> usize {
        self.rows.iter().flatten().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ParseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (span, cells) in self.rows() {
            write!(f, "Length {}:", span)?;
            for cell in cells {
                write!(f, " [")?;
                for (i, name) in cell.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", name)?;
                }
                write!(f, "]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
