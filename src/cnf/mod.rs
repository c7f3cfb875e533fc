//! Conversion of context-free grammars to Chomsky Normal Form.
//!
//! The converter clones its input and rewrites the clone through a fixed
//! pipeline of stages:
//!
//! ```text
//! Grammar + start
//!     │
//!     ▼ FreshStart        S0 -> S, S0 becomes the start symbol (optional)
//!     ▼ EliminateEpsilon  nullable fixpoint, drop ε-productions
//!     ▼ EliminateUnits    replace A -> B by B's productions
//!     ▼ ReplaceTerminals  a in long productions -> T, T -> a
//!     ▼ Binarize          H -> X1 X2 X3 -> H -> X1 Y, Y -> X2 X3
//!     │
//!     ▼
//! CNF grammar + start
//! ```
//!
//! Fresh nonterminals for the first, fourth and fifth stages come from one
//! [`FreshSymbols`] owned by the converter.
//!
//! A grammar whose start symbol derives ε loses the empty string: no stage
//! reinstates it. The converter logs a warning and sets
//! [`ConversionStats::start_nullable`] when that happens.

pub mod binarize;
pub mod epsilon;
pub mod fresh;
pub mod terminals;
pub mod unit;

pub use fresh::FreshSymbols;

use crate::grammar::Grammar;
use crate::symbol::{Nonterminal, Production, Symbol};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("no more nonterminal identifiers available ({prefix}0..{prefix}{limit} are all taken)")]
    SymbolsExhausted { prefix: String, limit: u32 },
}

/// One rewrite stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    FreshStart,
    EliminateEpsilon,
    EliminateUnits,
    ReplaceTerminals,
    Binarize,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 5] = [
        Stage::FreshStart,
        Stage::EliminateEpsilon,
        Stage::EliminateUnits,
        Stage::ReplaceTerminals,
        Stage::Binarize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::FreshStart => "fresh start symbol",
            Stage::EliminateEpsilon => "epsilon elimination",
            Stage::EliminateUnits => "unit elimination",
            Stage::ReplaceTerminals => "terminal replacement",
            Stage::Binarize => "binarization",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Whether to introduce a fresh start symbol before the other stages.
    pub fresh_start: bool,
    /// Prefix of generated nonterminal names.
    pub fresh_prefix: String,
    /// Size of the generated identifier space (None = `u32::MAX`).
    pub symbol_limit: Option<u32>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            fresh_start: true,
            fresh_prefix: "X".to_string(),
            symbol_limit: None,
        }
    }
}

/// Statistics about a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub nullable: usize,
    /// The start symbol derived ε, which the converted grammar no longer does.
    pub start_nullable: bool,
    pub unit_passes: usize,
    pub units_removed: usize,
    pub terminal_wrappers: usize,
    pub binarized: usize,
    pub fresh_symbols: u32,
}

/// CNF converter over a private copy of a grammar.
#[derive(Debug, Clone)]
pub struct CnfConverter {
    grammar: Grammar,
    start: Nonterminal,
    fresh: FreshSymbols,
    config: ConverterConfig,
    stats: ConversionStats,
}

impl CnfConverter {
    /// Create a converter with the default configuration. The grammar is
    /// cloned; `grammar` itself is never modified.
    pub fn new(grammar: &Grammar, start: impl Into<Nonterminal>) -> Self {
        Self::with_config(grammar, start, ConverterConfig::default())
    }

    /// Create a converter with custom configuration.
    pub fn with_config(
        grammar: &Grammar,
        start: impl Into<Nonterminal>,
        config: ConverterConfig,
    ) -> Self {
        let fresh = FreshSymbols::with_limit(
            config.fresh_prefix.clone(),
            config.symbol_limit.unwrap_or(u32::MAX),
        );
        CnfConverter {
            grammar: grammar.clone(),
            start: start.into(),
            fresh,
            config,
            stats: ConversionStats::default(),
        }
    }

    /// The stages `convert` runs, in order.
    pub fn stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|&stage| stage != Stage::FreshStart || self.config.fresh_start)
            .collect()
    }

    /// Run a single stage on the current grammar.
    pub fn run_stage(&mut self, stage: Stage) -> Result<(), ConvertError> {
        match stage {
            Stage::FreshStart => {
                let start = self.fresh.allocate(&self.grammar)?;
                self.grammar.add_rule(
                    start.clone(),
                    Production::new(vec![Symbol::Nonterminal(self.start.clone())]),
                );
                debug!(old = %self.start, new = %start, "introduced start symbol");
                self.start = start;
            }
            Stage::EliminateEpsilon => {
                let nullable = epsilon::eliminate(&mut self.grammar);
                self.stats.nullable = nullable.len();
                if nullable.contains(&self.start) {
                    self.stats.start_nullable = true;
                    warn!(
                        start = %self.start,
                        "start symbol derives the empty string; the converted grammar will reject it"
                    );
                }
            }
            Stage::EliminateUnits => {
                let outcome = unit::eliminate(&mut self.grammar);
                self.stats.unit_passes += outcome.passes;
                self.stats.units_removed += outcome.removed;
            }
            Stage::ReplaceTerminals => {
                let wrappers = terminals::replace(&mut self.grammar, &mut self.fresh)?;
                self.stats.terminal_wrappers += wrappers.len();
            }
            Stage::Binarize => {
                self.stats.binarized += binarize::binarize(&mut self.grammar, &mut self.fresh)?;
            }
        }
        self.stats.fresh_symbols = self.fresh.allocated();
        debug!(%stage, productions = self.grammar.len(), "stage complete");
        Ok(())
    }

    /// Run the whole pipeline. On error the grammar is left as the failing
    /// stage found it, partially rewritten.
    pub fn convert(&mut self) -> Result<(), ConvertError> {
        for stage in self.stages() {
            self.run_stage(stage)?;
        }
        debug!(
            start = %self.start,
            productions = self.grammar.len(),
            nonterminals = self.grammar.num_nonterminals(),
            "converted to CNF"
        );
        Ok(())
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn start(&self) -> &Nonterminal {
        &self.start
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Consume the converter, returning the grammar and start symbol.
    pub fn into_parts(self) -> (Grammar, Nonterminal) {
        (self.grammar, self.start)
    }
}

/// Builder for creating converters.
pub struct ConverterBuilder<'g> {
    grammar: &'g Grammar,
    start: Nonterminal,
    config: ConverterConfig,
}

impl<'g> ConverterBuilder<'g> {
    pub fn new(grammar: &'g Grammar, start: impl Into<Nonterminal>) -> Self {
        ConverterBuilder {
            grammar,
            start: start.into(),
            config: ConverterConfig::default(),
        }
    }

    pub fn config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn fresh_start(mut self, enabled: bool) -> Self {
        self.config.fresh_start = enabled;
        self
    }

    pub fn fresh_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.fresh_prefix = prefix.into();
        self
    }

    pub fn symbol_limit(mut self, limit: u32) -> Self {
        self.config.symbol_limit = Some(limit);
        self
    }

    pub fn build(self) -> CnfConverter {
        CnfConverter::with_config(self.grammar, self.start, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_of(rules: &[(&str, &str)]) -> Grammar {
        rules
            .iter()
            .map(|&(head, body)| (head, Production::compact(body)))
            .collect()
    }

    /// S -> ASA | aB, A -> B | S, B -> b | ε
    fn textbook() -> Grammar {
        grammar_of(&[
            ("S", "ASA"),
            ("S", "aB"),
            ("A", "B"),
            ("A", "S"),
            ("B", "b"),
            ("B", "ε"),
        ])
    }

    fn bodies(grammar: &Grammar, head: &str) -> Vec<String> {
        grammar.productions(head).map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_stage_order() {
        let grammar = Grammar::example();

        let converter = CnfConverter::new(&grammar, "S");
        assert_eq!(converter.stages(), Stage::ALL.to_vec());

        let converter = ConverterBuilder::new(&grammar, "S").fresh_start(false).build();
        assert_eq!(
            converter.stages(),
            vec![
                Stage::EliminateEpsilon,
                Stage::EliminateUnits,
                Stage::ReplaceTerminals,
                Stage::Binarize
            ]
        );
    }

    #[test]
    fn test_convert_textbook_grammar() {
        let grammar = textbook();
        let mut converter = CnfConverter::new(&grammar, "S");
        converter.convert().unwrap();

        let cnf = converter.grammar();
        assert!(cnf.is_cnf(), "violations: {:?}", cnf.cnf_violations());
        assert_eq!(&**converter.start(), "X0");
        // the fresh start symbol never appears on a right-hand side
        assert!(cnf
            .iter()
            .all(|(_, p)| p.nonterminals().all(|n| &**n != "X0")));

        let stats = converter.stats();
        assert_eq!(stats.nullable, 2);
        assert!(!stats.start_nullable);
        assert_eq!(stats.terminal_wrappers, 1);
        assert!(stats.binarized > 0);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let grammar = textbook();
        let mut converter = CnfConverter::new(&grammar, "S");
        converter.convert().unwrap();

        assert_eq!(grammar, textbook());
        assert_ne!(converter.grammar(), &grammar);
    }

    #[test]
    fn test_fresh_start_on_cnf_grammar() {
        let grammar = Grammar::example();
        let mut converter = CnfConverter::new(&grammar, "S");
        converter.convert().unwrap();

        let (cnf, start) = converter.into_parts();
        assert_eq!(&*start, "X0");
        assert_eq!(bodies(&cnf, "X0"), vec!["AB", "BC"]);
        assert_eq!(bodies(&cnf, "S"), vec!["AB", "BC"]);
        assert!(cnf.is_cnf());
    }

    #[test]
    fn test_stats_for_cnf_grammar() {
        let grammar = Grammar::example();
        let mut converter = CnfConverter::new(&grammar, "S");
        converter.convert().unwrap();

        assert_eq!(
            converter.stats(),
            &ConversionStats {
                nullable: 0,
                start_nullable: false,
                unit_passes: 2,
                units_removed: 1,
                terminal_wrappers: 0,
                binarized: 0,
                fresh_symbols: 1,
            }
        );
    }

    #[test]
    fn test_without_fresh_start_keeps_start() {
        let grammar = Grammar::example();
        let mut converter = ConverterBuilder::new(&grammar, "S").fresh_start(false).build();
        converter.convert().unwrap();

        assert_eq!(&**converter.start(), "S");
        assert_eq!(converter.grammar(), &grammar);
        assert_eq!(converter.stats().fresh_symbols, 0);
    }

    #[test]
    fn test_rerun_is_shape_stable() {
        let (once, start) = {
            let mut converter = CnfConverter::new(&textbook(), "S");
            converter.convert().unwrap();
            converter.into_parts()
        };

        // without a fresh start nothing changes
        let mut again = ConverterBuilder::new(&once, start.clone())
            .fresh_start(false)
            .build();
        again.convert().unwrap();
        assert_eq!(again.grammar(), &once);
        assert_eq!(again.start(), &start);

        // with a fresh start only a copy of the start symbol's rules appears
        let mut again = CnfConverter::new(&once, start.clone());
        again.convert().unwrap();
        let twice = again.grammar();
        assert!(twice.is_cnf());
        assert_ne!(again.start(), &start);
        assert_eq!(
            bodies(twice, again.start()),
            bodies(&once, &start)
        );
        assert_eq!(twice.len(), once.len() + once.productions(&start).count());
    }

    #[test]
    fn test_empty_string_gap_is_flagged() {
        let grammar = grammar_of(&[("S", "aSb"), ("S", "ε")]);
        let mut converter = CnfConverter::new(&grammar, "S");
        converter.convert().unwrap();

        assert!(converter.stats().start_nullable);
        assert!(converter.grammar().is_cnf());
        assert!(converter
            .grammar()
            .iter()
            .all(|(_, production)| !production.is_epsilon()));
    }

    #[test]
    fn test_run_stage_individually() {
        let grammar = textbook();
        let mut converter = ConverterBuilder::new(&grammar, "S").fresh_start(false).build();

        converter.run_stage(Stage::EliminateEpsilon).unwrap();
        assert!(converter.grammar().iter().all(|(_, p)| !p.is_epsilon()));
        assert!(converter.grammar().iter().any(|(_, p)| p.as_unit().is_some()));

        converter.run_stage(Stage::EliminateUnits).unwrap();
        assert!(converter.grammar().iter().all(|(_, p)| p.as_unit().is_none()));
        assert!(!converter.grammar().is_cnf());
    }

    #[test]
    fn test_custom_prefix() {
        let grammar = grammar_of(&[("S", "aSb"), ("S", "ab")]);
        let mut converter = ConverterBuilder::new(&grammar, "S").fresh_prefix("N").build();
        converter.convert().unwrap();

        assert_eq!(&**converter.start(), "N0");
        assert!(converter
            .grammar()
            .nonterminals()
            .filter(|n| &***n != "S")
            .all(|n| n.starts_with('N')));
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let grammar = textbook();
        let mut converter = ConverterBuilder::new(&grammar, "S").symbol_limit(1).build();

        let err = converter.convert().unwrap_err();
        assert_eq!(
            err,
            ConvertError::SymbolsExhausted {
                prefix: "X".to_string(),
                limit: 1
            }
        );
        assert!(err.to_string().starts_with("no more nonterminal identifiers available"));
    }
}
