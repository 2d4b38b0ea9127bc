//! Error kinds raised by conversion, solving, evaluation and clause-file ingestion.

use std::io;
use thiserror::Error;

/// A formula tree contained something the CNF converters cannot handle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConverterError {
    #[error("unexpected element in formula tree: {0}")]
    UnexpectedElement(String),
}

/// A SAT backend failed to produce an answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("SAT solver timed out")]
    Timeout,

    #[error("SAT backend failure: {0}")]
    Backend(String),

    #[error("SAT backend not available: {0}")]
    Unavailable(String),
}

/// Raised by operations that first convert a formula and then solve it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error(transparent)]
    Converter(#[from] ConverterError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Evaluating a formula under an assignment that does not cover all of its variables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("no value for variable {0}")]
    MissingVariable(String),
}

/// A DIMACS clause file did not match its declared shape.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("missing \"p cnf\" line")]
    MissingHeader,

    #[error("invalid \"p cnf\" line in line {line}: {text}")]
    InvalidHeader { line: usize, text: String },

    #[error("too high number in line {line}: {id}")]
    VariableOutOfRange { line: usize, id: u32 },

    #[error("too many lines found (current line {line})")]
    TooManyClauses { line: usize },

    #[error("reached end of file with too few lines found (expected {expected}, found {found})")]
    TooFewClauses { expected: usize, found: usize },

    #[error("error parsing number in line {line}: {reason}")]
    InvalidNumber { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
