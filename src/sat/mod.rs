//! Satisfiability of [`Cnf`] tables.
//!
//! [`SatSolver`] is the capability the rest of the crate consumes. The
//! provided implementation, [`SingleShotSolver`], numbers variables and hands
//! the numbered clause set to a [`SatBackend`] in one go. It can be built with
//! a *base* table whose numbering and clauses are fixed once and reused for
//! every later query.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cnf::Cnf;
use crate::error::SolverError;

mod cache;
#[cfg(feature = "cryptominisat")]
mod cryptominisat;
mod dpll;

pub use self::cache::CachedSatSolver;
#[cfg(feature = "cryptominisat")]
pub use self::cryptominisat::CryptoMiniSat;
pub use self::dpll::Dpll;

pub trait SatSolver {
    fn is_satisfiable(&mut self, cnf: &Cnf) -> Result<bool, SolverError>;
}

impl<S: SatSolver + ?Sized> SatSolver for Box<S> {
    fn is_satisfiable(&mut self, cnf: &Cnf) -> Result<bool, SolverError> {
        (**self).is_satisfiable(cnf)
    }
}

/// Decides a clause set given as DIMACS-style signed variable numbers (`1..=num_vars`).
///
/// A contradiction noticed while loading clauses is an ordinary `Ok(false)`.
pub trait SatBackend {
    fn solve<'a, I>(&mut self, num_vars: u32, clauses: I) -> Result<bool, SolverError>
        where I: IntoIterator<Item = &'a [i32]>;
}

#[derive(Debug, Clone, Default)]
struct Numbering {
    mapping: FxHashMap<Arc<str>, i32>,
    max_id: i32,
}

impl Numbering {
    fn id_for(&mut self, name: &str) -> i32 {
        if let Some(&id) = self.mapping.get(name) {
            return id;
        }
        self.max_id += 1;
        self.mapping.insert(Arc::from(name), self.max_id);
        self.max_id
    }

    fn number(&mut self, cnf: &Cnf) -> Vec<Vec<i32>> {
        // Sorted names keep the numbering independent of row order.
        for name in cnf.var_names() {
            self.id_for(name);
        }
        cnf.rows().iter()
            .map(|row| {
                row.iter()
                    .map(|v| {
                        let id = self.mapping[v.name()];
                        if v.is_negated() { -id } else { id }
                    })
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Base {
    numbering: Numbering,
    clauses: Vec<Vec<i32>>,
}

/// Numbers each query and passes it, together with the base clauses, to the backend.
#[derive(Debug, Clone)]
pub struct SingleShotSolver<B> {
    backend: B,
    base: Option<Base>,
}

impl<B: SatBackend> SingleShotSolver<B> {
    pub fn with_backend(backend: B) -> Self {
        SingleShotSolver { backend, base: None }
    }

    /// The clauses of `base` are conjoined with every later query.
    pub fn with_backend_and_base(backend: B, base: &Cnf) -> Self {
        let mut numbering = Numbering::default();
        let clauses = numbering.number(base);
        debug!("Base CNF with {} variables and {} clauses", numbering.max_id, clauses.len());
        SingleShotSolver {
            backend,
            base: Some(Base { numbering, clauses }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: SatBackend> SatSolver for SingleShotSolver<B> {
    fn is_satisfiable(&mut self, cnf: &Cnf) -> Result<bool, SolverError> {
        let result = match self.base {
            Some(ref mut base) => {
                let query = base.numbering.number(cnf);
                let clauses = base.clauses.iter().chain(query.iter()).map(|c| c.as_slice());
                self.backend.solve(base.numbering.max_id as u32, clauses)
            }
            None => {
                let mut numbering = Numbering::default();
                let query = numbering.number(cnf);
                self.backend.solve(numbering.max_id as u32, query.iter().map(|c| c.as_slice()))
            }
        };
        trace!("is_satisfiable ({} rows) => {:?}", cnf.row_count(), result);
        result
    }
}

/// The pure DPLL solver.
pub type DpllSolver = SingleShotSolver<Dpll>;

impl SingleShotSolver<Dpll> {
    pub fn new() -> Self {
        SingleShotSolver::with_backend(Dpll::new())
    }

    pub fn with_base(base: &Cnf) -> Self {
        SingleShotSolver::with_backend_and_base(Dpll::new(), base)
    }
}

impl Default for SingleShotSolver<Dpll> {
    fn default() -> Self {
        SingleShotSolver::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverType {
    Dpll,
    /// Only available with the `cryptominisat` feature.
    CryptoMiniSat,
}

impl Default for SolverType {
    fn default() -> Self {
        SolverType::Dpll
    }
}

impl fmt::Display for SolverType {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SolverType::Dpll => write!(fmt, "dpll"),
            SolverType::CryptoMiniSat => write!(fmt, "crypto_mini_sat"),
        }
    }
}

impl FromStr for SolverType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dpll" => Ok(SolverType::Dpll),
            "crypto_mini_sat" | "cryptominisat" => Ok(SolverType::CryptoMiniSat),
            other => Err(format!("unknown solver type: {}", other)),
        }
    }
}

/// Builds a solver of the given type.
///
/// `cache_size` wraps the solver in a [`CachedSatSolver`]: `None` means no cache,
/// `Some(0)` an unbounded one.
pub fn create_solver(kind: SolverType, base: Option<&Cnf>, cache_size: Option<usize>)
                     -> Result<Box<dyn SatSolver>, SolverError> {
    debug!("Creating SAT solver of type {} (base: {}, cache: {:?})", kind, base.is_some(), cache_size);
    let solver: Box<dyn SatSolver> = match kind {
        SolverType::Dpll => match base {
            Some(base) => Box::new(DpllSolver::with_base(base)),
            None => Box::new(DpllSolver::new()),
        },
        SolverType::CryptoMiniSat => create_cryptominisat(base)?,
    };
    Ok(match cache_size {
        Some(size) => Box::new(CachedSatSolver::with_capacity(solver, size)),
        None => solver,
    })
}

#[cfg(feature = "cryptominisat")]
fn create_cryptominisat(base: Option<&Cnf>) -> Result<Box<dyn SatSolver>, SolverError> {
    Ok(match base {
        Some(base) => Box::new(SingleShotSolver::with_backend_and_base(CryptoMiniSat::new(), base)),
        None => Box::new(SingleShotSolver::with_backend(CryptoMiniSat::new())),
    })
}

#[cfg(not(feature = "cryptominisat"))]
fn create_cryptominisat(_base: Option<&Cnf>) -> Result<Box<dyn SatSolver>, SolverError> {
    Err(SolverError::Unavailable("built without the cryptominisat feature".to_string()))
}
