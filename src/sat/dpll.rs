use std::collections::{BTreeMap, BTreeSet};

use crate::error::SolverError;

use super::SatBackend;

// With reference to:
// * http://poincare.matf.bg.ac.rs/~filip/phd/sat-tutorial.pdf
//   (Formalization and Implementation of Modern SAT Solvers --Filip Marić)
// * https://en.wikipedia.org/wiki/DPLL_algorithm

// This is basically a naive implementation, and hence, rather inefficient.

#[derive(Copy, Clone, Debug, Default, PartialOrd, Ord, PartialEq, Eq)]
struct Var(u32);

#[derive(Clone, Debug, Default)]
struct Instance {
    clauses: BTreeSet<BTreeMap<Var, bool>>,
    model: BTreeMap<Var, bool>,
}

#[derive(Clone, Debug, Default)]
struct DpllLit {
    var: Var,
    val: bool,
}

#[derive(Default)]
struct PosNeg {
    pos: bool,
    neg: bool,
}

impl std::ops::Not for DpllLit {
    type Output = Self;
    fn not(self) -> Self {
        let DpllLit { var, val } = self;
        DpllLit { var, val: !val }
    }
}

impl Instance {
    /// Adds a clause; `false` if it contains both polarities of a variable and was skipped.
    fn add_clause(&mut self, clause: &[i32]) -> bool {
        let mut term = BTreeMap::new();
        for &lit in clause {
            let var = Var(lit.unsigned_abs());
            let val = lit > 0;
            if *term.entry(var).or_insert(val) != val {
                return false;
            }
        }
        self.clauses.insert(term);
        true
    }

    fn solve(&mut self) -> Option<BTreeMap<Var, bool>> {
        trace!("-> solve: {} clauses", self.clauses.len());
        if self.no_more_unresolved_clauses() {
            trace!("No clauses; satisfiable");
            return Some(self.model.clone());
        }

        if self.any_empty_clauses() {
            trace!("Found an empty clause; unsatisfiable");
            return None;
        }

        if let Some(lit) = self.find_unit_clause() {
            trace!("Unit clause! {:?}", lit);
            return self.solve_with_assignment(lit);
        }
        if let Some(lit) = self.find_pure_literal() {
            trace!("Pure literal! {:?}", lit);
            return self.solve_with_assignment(lit);
        }

        let candidate = self.choose_literal();

        self.solve_with_assignment(candidate.clone())
            .or_else(|| self.solve_with_assignment(!candidate))
    }

    fn solve_with_assignment(&self, lit: DpllLit) -> Option<BTreeMap<Var, bool>> {
        let mut child = self.clone();
        child.assign(lit);
        child.solve()
    }

    fn no_more_unresolved_clauses(&self) -> bool {
        self.clauses.is_empty()
    }

    fn any_empty_clauses(&self) -> bool {
        self.clauses.iter().any(|cl| cl.is_empty())
    }

    fn choose_literal(&self) -> DpllLit {
        // Only called once both the empty and the no-clause cases are ruled out.
        self.clauses.iter()
            .flat_map(|cl| cl)
            .map(|(&var, &val)| DpllLit { var, val })
            .next()
            .unwrap_or_default()
    }

    fn find_pure_literal(&self) -> Option<DpllLit> {
        let mut occurrences = BTreeMap::new();
        for (var, &val) in self.clauses.iter().flat_map(|cl| cl) {
            let entry = occurrences.entry(var).or_insert_with(PosNeg::default);
            if val {
                entry.pos = true
            } else {
                entry.neg = true
            };
        }
        occurrences.into_iter().filter_map(|(var, pn)| pn.as_pure_for(var)).next()
    }

    fn find_unit_clause(&self) -> Option<DpllLit> {
        self.clauses.iter()
            .filter(|cl| cl.len() == 1)
            .flat_map(|cl| cl.iter().next())
            .map(|(&var, &val)| DpllLit { var, val })
            .next()
    }

    fn assign(&mut self, lit: DpllLit) {
        let to_update = self.clauses.iter()
            .filter(|cl| cl.contains_key(&lit.var))
            .cloned()
            .collect::<Vec<_>>();
        for mut cl in to_update {
            self.clauses.remove(&cl);
            let val = cl.remove(&lit.var);
            // A clause satisfied by the assignment disappears; otherwise it loses the literal.
            if val != Some(lit.val) {
                self.clauses.insert(cl);
            }
        }
        self.model.insert(lit.var, lit.val);
    }
}

impl PosNeg {
    fn as_pure_for(self, var: &Var) -> Option<DpllLit> {
        if self.pos ^ self.neg {
            Some(DpllLit { var: *var, val: self.pos })
        } else {
            None
        }
    }
}

/// A pure-Rust DPLL backend: unit propagation, pure literal elimination and chronological
/// backtracking over a fresh copy of the clause set for every query.
#[derive(Clone, Debug, Default)]
pub struct Dpll {
    _private: (),
}

impl Dpll {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SatBackend for Dpll {
    fn solve<'a, I>(&mut self, num_vars: u32, clauses: I) -> Result<bool, SolverError>
        where I: IntoIterator<Item = &'a [i32]>
    {
        let mut instance = Instance::default();
        let mut tautologies = 0;
        for clause in clauses {
            if !instance.add_clause(clause) {
                tautologies += 1;
            }
        }
        debug!("DPLL: {} variables, {} clauses ({} tautologies skipped)",
               num_vars, instance.clauses.len(), tautologies);
        let model = instance.solve();
        debug!("DPLL model: {:?}", model);
        Ok(model.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::{Dpll, Instance, Var};
    use crate::sat::SatBackend;
    use quickcheck::quickcheck;
    use std::collections::{BTreeMap, BTreeSet};

    fn solve(clauses: &[&[i32]]) -> bool {
        let num_vars = clauses.iter().flat_map(|c| c.iter()).map(|l| l.unsigned_abs()).max().unwrap_or(0);
        Dpll::new().solve(num_vars, clauses.iter().cloned()).expect("solve")
    }

    #[test]
    fn trivial_instances() {
        assert!(solve(&[]));
        assert!(!solve(&[&[]]));
        assert!(solve(&[&[1, -2], &[2]]));
        assert!(!solve(&[&[1], &[-1]]));
    }

    #[test]
    fn tautologies_are_skipped_not_misread() {
        // (a | !a) & !a is satisfiable; dropping a polarity of the first clause would make it not.
        assert!(solve(&[&[1, -1], &[-1]]));
        assert!(solve(&[&[1, -1, 2], &[-1], &[-2]]));
    }

    #[test]
    fn pigeonhole_two_into_one() {
        // Two pigeons, one hole.
        assert!(!solve(&[&[1], &[2], &[-1, -2]]));
    }

    fn brute_force(clauses: &BTreeSet<BTreeMap<u8, bool>>) -> bool {
        let vars = clauses.iter().flat_map(|cl| cl.keys().cloned()).collect::<BTreeSet<_>>()
            .into_iter().collect::<Vec<_>>();
        (0u64..1 << vars.len()).any(|bits| {
            clauses.iter().all(|cl| {
                cl.iter().any(|(v, &val)| {
                    let idx = vars.iter().position(|x| x == v).unwrap_or(0);
                    ((bits >> idx) & 1 == 1) == val
                })
            })
        })
    }

    fn check_assignments_prop(clauses: BTreeSet<BTreeMap<u8, bool>>) -> bool {
        let clauses = clauses.into_iter()
            .map(|cl| cl.into_iter().map(|(v, val)| (v % 10, val)).collect::<BTreeMap<_, _>>())
            .collect::<BTreeSet<_>>();
        let mut instance = Instance::default();
        for cl in clauses.iter() {
            let lits = cl.iter()
                .map(|(&v, &val)| if val { v as i32 + 1 } else { -(v as i32 + 1) })
                .collect::<Vec<_>>();
            instance.add_clause(&lits);
        }

        match instance.solve() {
            Some(model) => {
                clauses.iter().all(|cl| {
                    cl.iter().any(|(&v, val)| {
                        model.get(&Var(v as u32 + 1)).map(|m| m == val).unwrap_or(false)
                    })
                })
            }
            None => !brute_force(&clauses),
        }
    }

    #[test]
    fn check_assignments() {
        let _ = env_logger::try_init();
        quickcheck(check_assignments_prop as fn(BTreeSet<BTreeMap<u8, bool>>) -> bool);
    }
}
