use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConverterError;
use crate::formula::Formula;

use super::{Cnf, CnfVariable};

// With reference to:
// * https://www.cs.jhu.edu/~jason/tutorials/convert-to-CNF.html

/// Stands in for `true` once constants have been replaced.
pub const PSEUDO_TRUE: &str = "PSEUDO_TRUE";
/// Stands in for `false` once constants have been replaced.
pub const PSEUDO_FALSE: &str = "PSEUDO_FALSE";

pub trait CnfConverter {
    fn convert(&mut self, formula: &Formula) -> Result<Cnf, ConverterError>;
}

/// Which [`CnfConverter`] to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CnfStrategy {
    /// Plain distribution; logically equivalent, worst-case exponential.
    Recursive,
    /// Introduces auxiliary variables for disjunctions of complex operands; equisatisfiable.
    RecursiveReplacing,
}

impl Default for CnfStrategy {
    fn default() -> Self {
        CnfStrategy::Recursive
    }
}

impl fmt::Display for CnfStrategy {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CnfStrategy::Recursive => write!(fmt, "recursive"),
            CnfStrategy::RecursiveReplacing => write!(fmt, "recursive_replacing"),
        }
    }
}

impl FromStr for CnfStrategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recursive" => Ok(CnfStrategy::Recursive),
            "recursive_replacing" => Ok(CnfStrategy::RecursiveReplacing),
            other => Err(format!("unknown CNF strategy: {}", other)),
        }
    }
}

pub fn create_converter(strategy: CnfStrategy) -> Box<dyn CnfConverter> {
    match strategy {
        CnfStrategy::Recursive => Box::new(RecursiveConverter::new()),
        CnfStrategy::RecursiveReplacing => Box::new(RecursiveReplacingConverter::new()),
    }
}

/// The conversion rules shared by both strategies. Only the handling of
/// disjunctions differs between them.
trait RecursiveRules {
    fn convert_tree(&mut self, tree: &Formula) -> Result<Cnf, ConverterError> {
        match *tree {
            Formula::Variable(ref name) => Ok(unit(CnfVariable::positive(&**name))),
            Formula::Negation(ref inner) => self.handle_not(inner),
            Formula::Conjunction(ref l, ref r) => {
                // CONVERT(P) ^ CONVERT(Q) is simply all rows of both.
                let mut result = self.convert_tree(l)?;
                result.append(self.convert_tree(r)?);
                Ok(result)
            }
            Formula::Disjunction(ref l, ref r) => self.handle_or(l, r),
            Formula::True | Formula::False => {
                Err(ConverterError::UnexpectedElement(format!("constant {} in tree", tree)))
            }
        }
    }

    fn handle_not(&mut self, inner: &Formula) -> Result<Cnf, ConverterError> {
        match *inner {
            Formula::Variable(ref name) => Ok(unit(CnfVariable::negative(&**name))),
            // ~~P
            Formula::Negation(ref nested) => self.convert_tree(nested),
            // ~(P v Q) => ~P ^ ~Q
            Formula::Disjunction(ref p, ref q) => {
                self.convert_tree(&(!(**p).clone() & !(**q).clone()))
            }
            // ~(P ^ Q) => ~P v ~Q
            Formula::Conjunction(ref p, ref q) => {
                self.convert_tree(&(!(**p).clone() | !(**q).clone()))
            }
            Formula::True | Formula::False => {
                Err(ConverterError::UnexpectedElement(format!("constant {} in negation", inner)))
            }
        }
    }

    fn handle_or(&mut self, left: &Formula, right: &Formula) -> Result<Cnf, ConverterError> {
        let left = self.convert_tree(left)?;
        let right = self.convert_tree(right)?;
        Ok(distribute(&left, &right))
    }
}

fn unit(literal: CnfVariable) -> Cnf {
    let mut cnf = Cnf::with_capacity(1);
    cnf.add_row(vec![literal]);
    cnf
}

/// `(P1 ^ ... ^ Pm) v (Q1 ^ ... ^ Qn)` as `(P1 v Q1) ^ (P1 v Q2) ^ ... ^ (Pm v Qn)`.
fn distribute(left: &Cnf, right: &Cnf) -> Cnf {
    let mut result = Cnf::with_capacity(left.row_count() * right.row_count());
    for p in left.rows() {
        for q in right.rows() {
            let mut row = Vec::with_capacity(p.len() + q.len());
            row.extend(p.iter().cloned());
            row.extend(q.iter().cloned());
            result.add_row(row);
        }
    }
    result
}

fn replace_constants(tree: &Formula) -> Formula {
    match *tree {
        Formula::True => Formula::var(PSEUDO_TRUE),
        Formula::False => Formula::var(PSEUDO_FALSE),
        Formula::Variable(_) => tree.clone(),
        Formula::Negation(ref inner) => !replace_constants(inner),
        Formula::Conjunction(ref l, ref r) => replace_constants(l) & replace_constants(r),
        Formula::Disjunction(ref l, ref r) => replace_constants(l) | replace_constants(r),
    }
}

/// Entry point shared by both converters: replaces constants by pseudo variables
/// (forced by two unit rows placed first) and runs the recursive rules.
fn convert_with<R: RecursiveRules>(rules: &mut R, formula: &Formula) -> Result<Cnf, ConverterError> {
    if formula.contains_constants() {
        let mut result = Cnf::new();
        result.add_row(vec![CnfVariable::negative(PSEUDO_FALSE)]);
        result.add_row(vec![CnfVariable::positive(PSEUDO_TRUE)]);
        result.append(rules.convert_tree(&replace_constants(formula))?);
        Ok(result)
    } else {
        rules.convert_tree(formula)
    }
}

/// Textbook conversion by distributing disjunctions over conjunctions.
#[derive(Debug, Clone, Default)]
pub struct RecursiveConverter;

impl RecursiveConverter {
    pub fn new() -> Self {
        RecursiveConverter
    }
}

impl RecursiveRules for RecursiveConverter {}

impl CnfConverter for RecursiveConverter {
    fn convert(&mut self, formula: &Formula) -> Result<Cnf, ConverterError> {
        trace!("convert: {}", formula);
        convert_with(self, formula)
    }
}

/// Introduces new variables to keep the clause count down.
///
/// For `P v Q` where both `P` and `Q` are complex (contain more than one
/// variable), a fresh `Z` is introduced and `(!Z v P) ^ (Z v Q)` is converted
/// instead. That is satisfiable exactly when `P v Q` is, and bounds the growth
/// to quadratic rather than exponential. The result is equisatisfiable, not
/// equivalent. Fresh variables are named `temp_<n>`, counting per instance.
#[derive(Debug, Clone)]
pub struct RecursiveReplacingConverter {
    unique_counter: usize,
}

impl Default for RecursiveReplacingConverter {
    fn default() -> Self {
        RecursiveReplacingConverter { unique_counter: 1 }
    }
}

impl RecursiveReplacingConverter {
    pub fn new() -> Self {
        Default::default()
    }

    fn fresh_variable(&mut self) -> Formula {
        let var = Formula::var(format!("temp_{}", self.unique_counter));
        self.unique_counter += 1;
        var
    }
}

/// A formula is complex if it contains more than one variable.
fn is_complex(tree: &Formula) -> Result<bool, ConverterError> {
    match *tree {
        Formula::Variable(_) => Ok(false),
        Formula::Negation(ref inner) => is_complex(inner),
        Formula::Conjunction(..) | Formula::Disjunction(..) => Ok(true),
        Formula::True | Formula::False => {
            Err(ConverterError::UnexpectedElement(format!("constant {} in tree", tree)))
        }
    }
}

impl RecursiveRules for RecursiveReplacingConverter {
    fn handle_or(&mut self, left: &Formula, right: &Formula) -> Result<Cnf, ConverterError> {
        if is_complex(left)? && is_complex(right)? {
            let z = self.fresh_variable();
            let replaced = (!z.clone() | left.clone()) & (z | right.clone());
            self.convert_tree(&replaced)
        } else {
            let left = self.convert_tree(left)?;
            let right = self.convert_tree(right)?;
            Ok(distribute(&left, &right))
        }
    }
}

impl CnfConverter for RecursiveReplacingConverter {
    fn convert(&mut self, formula: &Formula) -> Result<Cnf, ConverterError> {
        trace!("convert (replacing): {}", formula);
        convert_with(self, formula)
    }
}
