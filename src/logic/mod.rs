//! Comparing and shortening formulas.
//!
//! Everything here preserves meaning: simplifiers only apply Boolean-algebra laws, and
//! [`FormulaEqualityChecker`] can be used to confirm that with a SAT query.

use crate::formula::Formula;

mod basic;
mod disjunction;
mod equality;
mod flat;
mod heuristic;
mod printer;
mod rules;
mod structure;
mod subtree;

pub use self::basic::BasicSimplifier;
pub use self::disjunction::{DisjunctionQueue, SimplifyingDisjunctionQueue};
pub use self::equality::FormulaEqualityChecker;
pub use self::flat::FlatteningSimplifier;
pub use self::heuristic::{move_negation_inwards, move_negation_outwards, AwesomeSimplifier};
pub use self::printer::FormulaTreePrinter;
pub use self::structure::{is_structurally_equal, terms_are_equal};
pub use self::subtree::{SubTreeGroupFinder, SubTreeSimplifier};

/// Rewrites a formula into a logically equivalent one.
pub trait Simplifier {
    fn simplify(&self, formula: &Formula) -> Formula;
}

/// Plain functions and closures can be injected wherever a simplifier is expected.
impl<F> Simplifier for F
    where F: Fn(&Formula) -> Formula
{
    fn simplify(&self, formula: &Formula) -> Formula {
        self(formula)
    }
}
