use ::cryptominisat as cms;

use crate::error::SolverError;

use super::SatBackend;

/// Native CryptoMiniSat backend. A fresh solver is set up for every query.
#[derive(Clone, Debug, Default)]
pub struct CryptoMiniSat {
    max_time: Option<f64>,
}

impl CryptoMiniSat {
    pub fn new() -> Self {
        Default::default()
    }

    /// Gives up after `seconds`, reported as [`SolverError::Timeout`].
    pub fn with_max_time(seconds: f64) -> Self {
        CryptoMiniSat { max_time: Some(seconds) }
    }
}

impl SatBackend for CryptoMiniSat {
    fn solve<'a, I>(&mut self, num_vars: u32, clauses: I) -> Result<bool, SolverError>
        where I: IntoIterator<Item = &'a [i32]>
    {
        let mut solver = cms::Solver::new();
        if let Some(seconds) = self.max_time {
            solver.set_max_time(seconds);
        }
        let vars = (0..num_vars).map(|_| solver.new_var()).collect::<Vec<_>>();

        for clause in clauses {
            let mut cm_clause = Vec::with_capacity(clause.len());
            for &lit in clause {
                let v = *(lit.unsigned_abs() as usize).checked_sub(1)
                    .and_then(|idx| vars.get(idx))
                    .ok_or_else(|| SolverError::Backend(format!("variable {} out of range", lit)))?;
                cm_clause.push(if lit > 0 { v } else { !v });
            }
            if !solver.add_clause(&cm_clause) {
                debug!("CryptoMiniSat: contradiction while adding clauses");
                return Ok(false);
            }
        }

        match solver.solve() {
            cms::Lbool::True => Ok(true),
            cms::Lbool::False => Ok(false),
            cms::Lbool::Undef => Err(SolverError::Timeout),
        }
    }
}
