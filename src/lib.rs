//! Chomsky-CYK: context-free grammar normalization and recognition.
//!
//! This crate provides:
//! - A grammar model (nonterminals -> ordered sets of productions)
//! - A parser for `A -> α | β | ε` grammar text
//! - Conversion to Chomsky Normal Form through a fixed stage pipeline
//! - A CYK recognizer with indexed rewrite tables and an inspectable parse table
//! - Python bindings via PyO3 (feature `python`)
//!
//! ```
//! use chomsky_cyk::{convert, recognize, parser::parse_grammar_text};
//!
//! let parsed = parse_grammar_text("S -> aSb | ab").unwrap();
//! let (cnf, start) = convert(&parsed.grammar, parsed.start).unwrap();
//!
//! assert!(cnf.is_cnf());
//! assert!(recognize("aaabbb", &cnf, start.clone()).0);
//! assert!(!recognize("aabbb", &cnf, start).0);
//! ```

pub mod cnf;
pub mod cyk;
pub mod error;
pub mod grammar;
pub mod intern;
pub mod parser;
pub mod symbol;
pub mod table;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod equivalence_test;

// Re-exports for convenience
pub use cnf::{
    CnfConverter, ConversionStats, ConvertError, ConverterBuilder, ConverterConfig, FreshSymbols,
    Stage,
};
pub use cyk::CykParser;
pub use error::{Error, Result};
pub use grammar::Grammar;
pub use intern::{SymbolId, SymbolTable};
pub use parser::{parse_grammar_lines, parse_grammar_text, ParseError, ParsedGrammar};
pub use symbol::{Nonterminal, Production, Symbol};
pub use table::ParseTable;

/// Convert `grammar` to Chomsky Normal Form with the default configuration.
///
/// Returns the converted grammar and its start symbol. `grammar` is left
/// untouched.
pub fn convert(
    grammar: &Grammar,
    start: impl Into<Nonterminal>,
) -> std::result::Result<(Grammar, Nonterminal), ConvertError> {
    let mut converter = CnfConverter::new(grammar, start);
    converter.convert()?;
    Ok(converter.into_parts())
}

/// Decide membership of `word` in the language of a CNF grammar, one
/// terminal per `char`, and return the filled table.
pub fn recognize(word: &str, grammar: &Grammar, start: impl Into<Nonterminal>) -> (bool, ParseTable) {
    let mut parser = CykParser::new(grammar, start);
    let accepted = parser.parse(word);
    (accepted, parser.table().clone())
}
