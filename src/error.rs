//! Crate-level error type.

use crate::cnf::ConvertError;
use crate::parser::ParseError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error parsing grammar: {0}")]
    Parse(#[from] ParseError),
    #[error("error converting grammar: {0}")]
    Convert(#[from] ConvertError),
    #[error("error reading input: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
