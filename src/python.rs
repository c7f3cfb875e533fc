//! Python bindings.

use crate::cnf::ConverterBuilder;
use crate::cyk::CykParser;
use crate::grammar::Grammar;
use crate::parser::parse_grammar_text;
use crate::symbol::Nonterminal;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python wrapper for Grammar.
#[pyclass(name = "Grammar", unsendable)]
#[derive(Clone)]
struct PyGrammar {
    inner: Grammar,
    start: Option<Nonterminal>,
}

impl PyGrammar {
    fn parser(&self) -> PyResult<CykParser> {
        let start = self
            .start
            .clone()
            .ok_or_else(|| PyValueError::new_err("grammar has no rules"))?;
        Ok(CykParser::new(&self.inner, start))
    }
}

#[pymethods]
impl PyGrammar {
    #[new]
    #[pyo3(signature = (rules=None))]
    fn new(rules: Option<&str>) -> PyResult<Self> {
        let mut grammar = PyGrammar {
            inner: Grammar::new(),
            start: None,
        };
        if let Some(rules) = rules {
            grammar.add_rule(rules)?;
        }
        Ok(grammar)
    }

    /// Add rules written as `A -> α | β` lines. The first head ever added
    /// becomes the start symbol.
    fn add_rule(&mut self, rules: &str) -> PyResult<()> {
        let parsed = parse_grammar_text(rules).map_err(|e| PyValueError::new_err(e.to_string()))?;
        for (head, production) in parsed.grammar.iter() {
            self.inner.add_rule(head.clone(), production.clone());
        }
        self.start.get_or_insert(parsed.start);
        Ok(())
    }

    /// Return the grammar converted to Chomsky Normal Form.
    #[pyo3(signature = (fresh_start=true))]
    fn to_cnf(&self, fresh_start: bool) -> PyResult<PyGrammar> {
        let start = self
            .start
            .clone()
            .ok_or_else(|| PyValueError::new_err("grammar has no rules"))?;
        let mut converter = ConverterBuilder::new(&self.inner, start)
            .fresh_start(fresh_start)
            .build();
        converter
            .convert()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let (inner, start) = converter.into_parts();
        Ok(PyGrammar {
            inner,
            start: Some(start),
        })
    }

    /// Check whether `word` is derivable. Assumes CNF.
    fn accepts(&self, word: &str) -> PyResult<bool> {
        Ok(self.parser()?.parse(word))
    }

    /// Parse table of `word` as rows by decreasing span.
    fn table(&self, word: &str) -> PyResult<Vec<Vec<Vec<String>>>> {
        let mut parser = self.parser()?;
        parser.parse(word);
        Ok(parser
            .table()
            .rows()
            .map(|(_, cells)| {
                cells
                    .iter()
                    .map(|cell| cell.iter().map(|name| name.to_string()).collect())
                    .collect()
            })
            .collect())
    }

    #[getter]
    fn start(&self) -> Option<String> {
        self.start.as_ref().map(|s| s.to_string())
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "Grammar(start={:?}, productions={})",
            self.start.as_deref().unwrap_or(""),
            self.inner.len()
        )
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Python module definition.
#[pymodule]
fn chomsky_cyk(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyGrammar>()?;
    Ok(())
}
