//! Selection of the CNF strategy and the SAT backend.

use serde::{Deserialize, Serialize};

use crate::cnf::{create_converter, Cnf, CnfConverter, CnfStrategy};
use crate::error::SolverError;
use crate::sat::{create_solver, SatSolver, SolverType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicConfig {
    pub cnf_strategy: CnfStrategy,
    pub solver: SolverType,
    /// Wrap every created solver in a cache.
    pub cache: bool,
    /// Maximum number of cached answers; `0` is unbounded.
    pub cache_size: usize,
}

impl Default for LogicConfig {
    fn default() -> Self {
        LogicConfig {
            cnf_strategy: CnfStrategy::Recursive,
            solver: SolverType::Dpll,
            cache: false,
            cache_size: 0,
        }
    }
}

impl LogicConfig {
    pub fn converter(&self) -> Box<dyn CnfConverter> {
        create_converter(self.cnf_strategy)
    }

    pub fn solver(&self, base: Option<&Cnf>) -> Result<Box<dyn SatSolver>, SolverError> {
        let cache_size = if self.cache { Some(self.cache_size) } else { None };
        create_solver(self.solver, base, cache_size)
    }
}

#[cfg(test)]
mod tests {
    use super::LogicConfig;
    use crate::cnf::{CnfStrategy, CnfVariable};
    use crate::formula::Formula;
    use crate::sat::SolverType;

    #[test]
    fn defaults() {
        let config = LogicConfig::default();
        assert_eq!(config.cnf_strategy, CnfStrategy::Recursive);
        assert_eq!(config.solver, SolverType::Dpll);
        assert!(!config.cache);
        assert_eq!(config.cache_size, 0);
    }

    #[test]
    fn reads_partial_json() {
        let config: LogicConfig =
            serde_json::from_str(r#"{"cnf_strategy": "recursive_replacing", "cache": true}"#).expect("parse");
        assert_eq!(config,
                   LogicConfig {
                       cnf_strategy: CnfStrategy::RecursiveReplacing,
                       cache: true,
                       ..LogicConfig::default()
                   });

        let text = serde_json::to_string(&config).expect("serialize");
        assert!(text.contains("\"solver\":\"dpll\""));
    }

    #[test]
    fn builds_working_components() {
        let _ = env_logger::try_init();
        let config = LogicConfig { cache: true, cache_size: 4, ..LogicConfig::default() };
        let f = Formula::var("A") & !Formula::var("A");
        let cnf = config.converter().convert(&f).expect("convert");
        let mut solver = config.solver(None).expect("solver");
        assert_eq!(solver.is_satisfiable(&cnf), Ok(false));

        let mut base = crate::cnf::Cnf::new();
        base.add_row(vec![CnfVariable::positive("A")]);
        let mut solver = config.solver(Some(&base)).expect("solver");
        assert_eq!(solver.is_satisfiable(&config.converter().convert(&!Formula::var("A")).expect("convert")),
                   Ok(false));
    }
}
