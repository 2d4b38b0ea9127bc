//! Clause tables in conjunctive normal form.
//!
//! A [`Cnf`] is a list of rows; each row is a disjunction of [`CnfVariable`]
//! literals and the rows are conjoined. Neither the order of rows nor the
//! order of literals inside a row carries meaning, so equality and hashing
//! treat both as unordered multisets. This is what makes a `Cnf` usable as a
//! cache key (see [`crate::sat::CachedSatSolver`]).

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::sync::Arc;

use rustc_hash::FxHasher;

use crate::formula::Formula;

mod convert;
pub mod dimacs;

pub use self::convert::{create_converter, CnfConverter, CnfStrategy, RecursiveConverter,
                        RecursiveReplacingConverter, PSEUDO_FALSE, PSEUDO_TRUE};

/// A single literal: a variable name plus a negation flag (`true` if negated).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CnfVariable {
    name: Arc<str>,
    negated: bool,
}

impl CnfVariable {
    pub fn new<S: AsRef<str>>(negated: bool, name: S) -> CnfVariable {
        CnfVariable {
            name: Arc::from(name.as_ref()),
            negated,
        }
    }

    pub fn positive<S: AsRef<str>>(name: S) -> CnfVariable {
        CnfVariable::new(false, name)
    }

    pub fn negative<S: AsRef<str>>(name: S) -> CnfVariable {
        CnfVariable::new(true, name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    fn as_formula(&self) -> Formula {
        let var = Formula::var(&*self.name);
        if self.negated { !var } else { var }
    }
}

impl fmt::Display for CnfVariable {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}{}", if self.negated { "!" } else { "" }, self.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cnf {
    table: Vec<Vec<CnfVariable>>,
}

impl Cnf {
    pub fn new() -> Cnf {
        Default::default()
    }

    pub fn with_capacity(rows: usize) -> Cnf {
        Cnf { table: Vec::with_capacity(rows) }
    }

    pub fn add_row<R: Into<Vec<CnfVariable>>>(&mut self, row: R) {
        self.table.push(row.into());
    }

    /// Panics if `row` is out of range; check [`Cnf::row_count`] first.
    pub fn row(&self, row: usize) -> &[CnfVariable] {
        &self.table[row]
    }

    /// Panics if either index is out of range.
    pub fn element(&self, row: usize, number: usize) -> &CnfVariable {
        &self.table[row][number]
    }

    pub fn rows(&self) -> &[Vec<CnfVariable>] {
        &self.table
    }

    pub fn row_count(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Every variable name mentioned in any row, in sorted order.
    pub fn var_names(&self) -> BTreeSet<&str> {
        self.table.iter().flat_map(|row| row.iter()).map(|v| v.name()).collect()
    }

    /// A new table holding the rows of `self` followed by the rows of `other`, i.e. their conjunction.
    pub fn combine(&self, other: &Cnf) -> Cnf {
        let mut result = Cnf::with_capacity(self.row_count() + other.row_count());
        result.table.extend(self.table.iter().cloned());
        result.table.extend(other.table.iter().cloned());
        result
    }

    /// In-place variant of [`Cnf::combine`].
    pub fn append(&mut self, other: Cnf) {
        self.table.extend(other.table);
    }

    /// This table as a conjunction of disjunctions. An empty table is `True`.
    pub fn as_formula(&self) -> Formula {
        let rows = self.table.iter()
            .map(|row| Formula::disjunction_of(row.iter().map(CnfVariable::as_formula)).unwrap_or(Formula::False));
        Formula::conjunction_of(rows).unwrap_or(Formula::True)
    }

    fn normalized(&self) -> Vec<Vec<&CnfVariable>> {
        let mut rows = self.table.iter()
            .map(|row| {
                let mut row = row.iter().collect::<Vec<_>>();
                row.sort();
                row
            })
            .collect::<Vec<_>>();
        rows.sort();
        rows
    }
}

impl PartialEq for Cnf {
    fn eq(&self, other: &Cnf) -> bool {
        self.row_count() == other.row_count() && self.normalized() == other.normalized()
    }
}

impl Eq for Cnf {}

impl Hash for Cnf {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Sums are commutative, so neither row order nor literal order affects the result.
        let mut hash: u64 = 3244324;
        for row in self.table.iter() {
            let mut line_hash: u64 = 675433;
            for variable in row {
                line_hash = line_hash.wrapping_add(variable.content_hash());
            }
            hash = hash.wrapping_add(line_hash.wrapping_mul(5434543));
        }
        state.write_u64(hash.wrapping_mul(573495334));
    }
}

impl FromIterator<Vec<CnfVariable>> for Cnf {
    fn from_iter<I: IntoIterator<Item = Vec<CnfVariable>>>(iter: I) -> Cnf {
        Cnf { table: iter.into_iter().collect() }
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for row in self.table.iter() {
            let literals = row.iter().map(|v| v.to_string()).collect::<Vec<_>>();
            writeln!(fmt, "[{}]", literals.join(", "))?;
        }
        Ok(())
    }
}
