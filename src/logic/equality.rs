use crate::cnf::{CnfConverter, RecursiveReplacingConverter};
use crate::error::CheckError;
use crate::formula::Formula;
use crate::sat::{DpllSolver, SatSolver};

/// Decides whether two formulas have the same models.
///
/// `f1` and `f2` are equal iff `(f1 && !f2) || (!f1 && f2)` is unsatisfiable. The query is
/// always converted with the replacing strategy.
pub struct FormulaEqualityChecker<S = DpllSolver> {
    solver: S,
    converter: RecursiveReplacingConverter,
}

impl FormulaEqualityChecker<DpllSolver> {
    pub fn new() -> Self {
        FormulaEqualityChecker::with_solver(DpllSolver::new())
    }
}

impl Default for FormulaEqualityChecker<DpllSolver> {
    fn default() -> Self {
        FormulaEqualityChecker::new()
    }
}

impl<S: SatSolver> FormulaEqualityChecker<S> {
    pub fn with_solver(solver: S) -> Self {
        FormulaEqualityChecker {
            solver,
            converter: RecursiveReplacingConverter::new(),
        }
    }

    pub fn is_logically_equal(&mut self, f1: &Formula, f2: &Formula) -> Result<bool, CheckError> {
        let to_check = (f1.clone() & !f2.clone()) | (!f1.clone() & f2.clone());
        let cnf = self.converter.convert(&to_check)?;
        let equal = !self.solver.is_satisfiable(&cnf)?;
        debug!("{} == {}: {}", f1, f2, equal);
        Ok(equal)
    }
}
