use std::collections::VecDeque;

use crate::cnf::{CnfConverter, RecursiveReplacingConverter};
use crate::error::CheckError;
use crate::formula::Formula;
use crate::sat::{DpllSolver, SatSolver};

/// Collects formulas and ORs them together as a balanced tree.
///
/// A `true` input makes the whole disjunction `true`; `false` inputs are ignored. Exact
/// duplicates are dropped. An empty queue yields `true`.
#[derive(Debug, Clone, Default)]
pub struct DisjunctionQueue {
    queue: Vec<Formula>,
    is_true: bool,
}

impl DisjunctionQueue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, formula: Formula) {
        match formula {
            Formula::True => self.is_true = true,
            Formula::False => (),
            _ if self.is_true || self.queue.contains(&formula) => (),
            _ => self.queue.push(formula),
        }
    }

    pub fn add_all<I: IntoIterator<Item = Formula>>(&mut self, formulas: I) {
        for f in formulas {
            self.add(f);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn reset(&mut self) {
        self.queue.clear();
        self.is_true = false;
    }

    /// The disjunction of everything added since the last reset. Resets the queue.
    pub fn disjunction(&mut self) -> Formula {
        let result = if self.is_true {
            Formula::True
        } else {
            balanced_or(self.queue.drain(..)).unwrap_or(Formula::True)
        };
        self.reset();
        result
    }
}

/// ORs neighbouring pairs until a single formula is left.
fn balanced_or<I: IntoIterator<Item = Formula>>(terms: I) -> Option<Formula> {
    let mut level = terms.into_iter().collect::<VecDeque<_>>();
    while level.len() > 1 {
        let mut next = VecDeque::with_capacity((level.len() + 1) / 2);
        while let Some(left) = level.pop_front() {
            match level.pop_front() {
                Some(right) => next.push_back(left | right),
                None => next.push_back(left),
            }
        }
        level = next;
    }
    level.pop_front()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relevancy {
    /// Everything the new formula allows is already allowed.
    Previous,
    /// The new formula allows everything accumulated so far.
    Current,
    Both,
}

/// A [`DisjunctionQueue`] that drops formulas implied by what was already accumulated.
///
/// Implication is decided with two SAT queries per formula. If a query fails the formula
/// is kept, so no model is ever lost.
pub struct SimplifyingDisjunctionQueue<S = DpllSolver> {
    queue: DisjunctionQueue,
    solver: S,
    converter: RecursiveReplacingConverter,
}

impl SimplifyingDisjunctionQueue<DpllSolver> {
    pub fn new() -> Self {
        SimplifyingDisjunctionQueue::with_solver(DpllSolver::new())
    }
}

impl Default for SimplifyingDisjunctionQueue<DpllSolver> {
    fn default() -> Self {
        SimplifyingDisjunctionQueue::new()
    }
}

impl<S: SatSolver> SimplifyingDisjunctionQueue<S> {
    pub fn with_solver(solver: S) -> Self {
        SimplifyingDisjunctionQueue {
            queue: DisjunctionQueue::new(),
            solver,
            converter: RecursiveReplacingConverter::new(),
        }
    }

    pub fn add(&mut self, formula: Formula) {
        self.queue.add(formula)
    }

    pub fn add_all<I: IntoIterator<Item = Formula>>(&mut self, formulas: I) {
        self.queue.add_all(formulas)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn reset(&mut self) {
        self.queue.reset()
    }

    /// The disjunction of everything added since the last reset, without implied terms.
    ///
    /// `context` names what the condition belongs to; it is only used in log messages.
    /// Resets the queue.
    pub fn disjunction(&mut self, context: Option<&str>) -> Formula {
        if self.queue.is_true {
            self.queue.reset();
            return Formula::True;
        }

        let mut pending = self.queue.queue.drain(..).collect::<Vec<_>>().into_iter();
        self.queue.reset();
        let mut previous = match pending.next() {
            Some(first) => first,
            None => return Formula::True,
        };

        let mut kept = DisjunctionQueue::new();
        kept.add(previous.clone());
        for current in pending {
            match self.relevancy(&previous, &current, context) {
                Relevancy::Previous => trace!("dropping implied {}", current),
                Relevancy::Current => {
                    trace!("{} implies everything so far", current);
                    kept.reset();
                    kept.add(current.clone());
                    previous = current;
                }
                Relevancy::Both => {
                    kept.add(current.clone());
                    previous = previous | current;
                }
            }
        }

        kept.disjunction()
    }

    fn relevancy(&mut self, previous: &Formula, current: &Formula, context: Option<&str>) -> Relevancy {
        match self.check_relevancy(previous, current) {
            Ok(relevancy) => relevancy,
            Err(e) => {
                match context {
                    Some(name) => warn!("Error while creating disjunction for conditions of {}: {}", name, e),
                    None => warn!("Error while creating disjunction: {}", e),
                }
                Relevancy::Both
            }
        }
    }

    fn check_relevancy(&mut self, previous: &Formula, current: &Formula) -> Result<Relevancy, CheckError> {
        let new_models = self.converter.convert(&(!previous.clone() & current.clone()))?;
        if !self.solver.is_satisfiable(&new_models)? {
            return Ok(Relevancy::Previous);
        }
        let lost_models = self.converter.convert(&(previous.clone() & !current.clone()))?;
        if !self.solver.is_satisfiable(&lost_models)? {
            return Ok(Relevancy::Current);
        }
        Ok(Relevancy::Both)
    }
}
