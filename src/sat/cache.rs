use rustc_hash::FxHashMap;

use crate::cnf::Cnf;
use crate::error::SolverError;

use super::SatSolver;

/// Remembers the answer for every [`Cnf`] it has been asked about.
///
/// Lookups use the order-insensitive equality of [`Cnf`]. A bounded cache
/// stops accepting new entries once full; nothing is ever evicted, so size it for
/// the whole run.
pub struct CachedSatSolver<S> {
    real_solver: S,
    cache: FxHashMap<Cnf, bool>,
    /// `0` means unbounded.
    cache_size: usize,
}

impl<S: SatSolver> CachedSatSolver<S> {
    pub fn new(real_solver: S) -> Self {
        CachedSatSolver::with_capacity(real_solver, 0)
    }

    pub fn with_capacity(real_solver: S, cache_size: usize) -> Self {
        CachedSatSolver {
            real_solver,
            cache: FxHashMap::default(),
            cache_size,
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn into_inner(self) -> S {
        self.real_solver
    }
}

impl<S: SatSolver> SatSolver for CachedSatSolver<S> {
    fn is_satisfiable(&mut self, cnf: &Cnf) -> Result<bool, SolverError> {
        if let Some(&result) = self.cache.get(cnf) {
            trace!("cache hit ({} rows): {}", cnf.row_count(), result);
            return Ok(result);
        }

        let result = self.real_solver.is_satisfiable(cnf)?;
        if self.cache_size == 0 || self.cache.len() < self.cache_size {
            self.cache.insert(cnf.clone(), result);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::CachedSatSolver;
    use crate::cnf::{Cnf, CnfVariable};
    use crate::error::SolverError;
    use crate::sat::{DpllSolver, SatSolver};

    /// Counts how often it was consulted.
    struct Counting {
        inner: DpllSolver,
        calls: usize,
    }

    impl SatSolver for Counting {
        fn is_satisfiable(&mut self, cnf: &Cnf) -> Result<bool, SolverError> {
            self.calls += 1;
            self.inner.is_satisfiable(cnf)
        }
    }

    fn counting() -> Counting {
        Counting { inner: DpllSolver::new(), calls: 0 }
    }

    fn cnf_of(rows: Vec<Vec<CnfVariable>>) -> Cnf {
        rows.into_iter().collect()
    }

    fn sat() -> Cnf {
        cnf_of(vec![vec![CnfVariable::positive("A"), CnfVariable::negative("B")]])
    }

    fn unsat() -> Cnf {
        cnf_of(vec![vec![CnfVariable::positive("A")], vec![CnfVariable::negative("A")]])
    }

    #[test]
    fn repeated_query_is_answered_from_the_cache() {
        let mut solver = CachedSatSolver::new(counting());
        assert_eq!(solver.is_satisfiable(&sat()), Ok(true));
        assert_eq!(solver.is_satisfiable(&sat()), Ok(true));
        assert_eq!(solver.is_satisfiable(&unsat()), Ok(false));
        assert_eq!(solver.is_satisfiable(&unsat()), Ok(false));
        assert_eq!(solver.len(), 2);
        assert_eq!(solver.into_inner().calls, 2);
    }

    #[test]
    fn reordered_rows_hit_the_same_entry() {
        let mut solver = CachedSatSolver::new(counting());
        let a = cnf_of(vec![vec![CnfVariable::positive("A")], vec![CnfVariable::negative("B")]]);
        let b = cnf_of(vec![vec![CnfVariable::negative("B")], vec![CnfVariable::positive("A")]]);
        assert_eq!(solver.is_satisfiable(&a), Ok(true));
        assert_eq!(solver.is_satisfiable(&b), Ok(true));
        assert_eq!(solver.into_inner().calls, 1);
    }

    #[test]
    fn full_cache_refuses_new_entries() {
        let mut solver = CachedSatSolver::with_capacity(counting(), 1);
        assert_eq!(solver.is_satisfiable(&sat()), Ok(true));
        assert_eq!(solver.is_satisfiable(&unsat()), Ok(false));
        assert_eq!(solver.is_satisfiable(&unsat()), Ok(false));
        assert_eq!(solver.is_satisfiable(&sat()), Ok(true));
        assert_eq!(solver.len(), 1);
        assert_eq!(solver.into_inner().calls, 3);
    }
}
