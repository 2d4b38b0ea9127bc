//! Reasoning over propositional presence conditions.
//!
//! Formulas over named variables can be converted to clause form, handed to a
//! SAT backend, compared for logical equivalence and shortened by a chain of
//! rewrite passes without changing their meaning.
//!
//! ```
//! use presence_logic::formula::Formula;
//! use presence_logic::logic::{AwesomeSimplifier, Simplifier};
//!
//! let a = Formula::var("A");
//! let b = Formula::var("B");
//! let f = a.clone() | (a.clone() & b);
//! assert_eq!(AwesomeSimplifier::new().simplify(&f), a);
//! ```

#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate maplit;

pub mod cnf;
pub mod config;
pub mod error;
pub mod formula;
pub mod logic;
pub mod sat;

pub use crate::cnf::{Cnf, CnfVariable};
pub use crate::config::LogicConfig;
pub use crate::error::{CheckError, ConverterError, EvalError, FormatError, SolverError};
pub use crate::formula::Formula;
pub use crate::sat::SatSolver;
