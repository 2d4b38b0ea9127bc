//! The propositional formula model.
//!
//! A `Formula` is an immutable binary tree. Sub-trees are reference counted, so
//! cloning a formula or any of its children is cheap and the value can be shared
//! between threads freely. `&&` and `||` are stored as binary nodes; the flat
//! n-ary view that the simplifiers work on is derived by
//! [`Formula::conjunction_terms`] and [`Formula::disjunction_terms`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use crate::error::EvalError;

#[cfg(test)]
pub(crate) mod arbitrary;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formula {
    True,
    False,
    Variable(Arc<str>),
    Negation(Arc<Formula>),
    Conjunction(Arc<Formula>, Arc<Formula>),
    Disjunction(Arc<Formula>, Arc<Formula>),
}

/// Anything that can answer the value of a named variable.
pub trait Environment {
    fn value(&self, name: &str) -> Option<bool>;
}

impl Environment for BTreeMap<String, bool> {
    fn value(&self, name: &str) -> Option<bool> {
        self.get(name).cloned()
    }
}

impl<'a> Environment for BTreeMap<&'a str, bool> {
    fn value(&self, name: &str) -> Option<bool> {
        self.get(name).cloned()
    }
}

impl Environment for HashMap<String, bool> {
    fn value(&self, name: &str) -> Option<bool> {
        self.get(name).cloned()
    }
}

impl<'a> Environment for HashMap<&'a str, bool> {
    fn value(&self, name: &str) -> Option<bool> {
        self.get(name).cloned()
    }
}

impl Formula {
    pub fn var<S: AsRef<str>>(name: S) -> Formula {
        Formula::Variable(Arc::from(name.as_ref()))
    }

    pub fn constant(value: bool) -> Formula {
        if value {
            Formula::True
        } else {
            Formula::False
        }
    }

    pub fn negation(inner: Formula) -> Formula {
        Formula::Negation(Arc::new(inner))
    }

    pub fn and(left: Formula, right: Formula) -> Formula {
        Formula::Conjunction(Arc::new(left), Arc::new(right))
    }

    pub fn or(left: Formula, right: Formula) -> Formula {
        Formula::Disjunction(Arc::new(left), Arc::new(right))
    }

    /// Folds `terms` into a left-associated conjunction. `None` if there are no terms.
    pub fn conjunction_of<I>(terms: I) -> Option<Formula>
        where I: IntoIterator<Item = Formula>
    {
        terms.into_iter().fold(None, |acc, x| Some(acc.map(|acc| Formula::and(acc, x.clone())).unwrap_or(x)))
    }

    /// Folds `terms` into a left-associated disjunction. `None` if there are no terms.
    pub fn disjunction_of<I>(terms: I) -> Option<Formula>
        where I: IntoIterator<Item = Formula>
    {
        terms.into_iter().fold(None, |acc, x| Some(acc.map(|acc| Formula::or(acc, x.clone())).unwrap_or(x)))
    }

    pub fn is_true(&self) -> bool {
        match *self {
            Formula::True => true,
            _ => false,
        }
    }

    pub fn is_false(&self) -> bool {
        match *self {
            Formula::False => true,
            _ => false,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.is_true() || self.is_false()
    }

    pub fn as_variable(&self) -> Option<&str> {
        match *self {
            Formula::Variable(ref name) => Some(&**name),
            _ => None,
        }
    }

    pub fn as_negation(&self) -> Option<&Formula> {
        match *self {
            Formula::Negation(ref inner) => Some(&**inner),
            _ => None,
        }
    }

    /// The variable wrapped by `!VAR`, if this is exactly that.
    pub fn as_negated_variable(&self) -> Option<&str> {
        self.as_negation().and_then(|inner| inner.as_variable())
    }

    pub fn is_conjunction(&self) -> bool {
        match *self {
            Formula::Conjunction(..) => true,
            _ => false,
        }
    }

    pub fn is_disjunction(&self) -> bool {
        match *self {
            Formula::Disjunction(..) => true,
            _ => false,
        }
    }

    /// Whether `self` and `other` are the same node: the same variant sharing the same children.
    ///
    /// Rewriters hand back their input unchanged when nothing applies; this lets callers detect
    /// that without walking both trees.
    pub fn same_instance(&self, other: &Formula) -> bool {
        match (self, other) {
            (&Formula::Negation(ref a), &Formula::Negation(ref b)) => Arc::ptr_eq(a, b),
            (&Formula::Conjunction(ref l1, ref r1), &Formula::Conjunction(ref l2, ref r2)) |
            (&Formula::Disjunction(ref l1, ref r1), &Formula::Disjunction(ref l2, ref r2)) => {
                Arc::ptr_eq(l1, l2) && Arc::ptr_eq(r1, r2)
            }
            (&Formula::Variable(ref a), &Formula::Variable(ref b)) => a == b,
            (&Formula::True, &Formula::True) | (&Formula::False, &Formula::False) => true,
            _ => false,
        }
    }

    /// All operands of a chain of conjunctions, left to right. A formula that is not a
    /// conjunction is its own single term.
    pub fn conjunction_terms(&self) -> Vec<Formula> {
        self.flatten(Formula::is_conjunction)
    }

    /// All operands of a chain of disjunctions, left to right. A formula that is not a
    /// disjunction is its own single term.
    pub fn disjunction_terms(&self) -> Vec<Formula> {
        self.flatten(Formula::is_disjunction)
    }

    fn flatten(&self, same_operator: fn(&Formula) -> bool) -> Vec<Formula> {
        let mut terms = Vec::new();
        let mut stack = vec![self];
        while let Some(f) = stack.pop() {
            match *f {
                Formula::Conjunction(ref l, ref r) |
                Formula::Disjunction(ref l, ref r) if same_operator(f) => {
                    stack.push(r);
                    stack.push(l);
                }
                _ => terms.push(f.clone()),
            }
        }
        terms
    }

    pub fn contains_constants(&self) -> bool {
        match *self {
            Formula::True | Formula::False => true,
            Formula::Variable(_) => false,
            Formula::Negation(ref inner) => inner.contains_constants(),
            Formula::Conjunction(ref l, ref r) |
            Formula::Disjunction(ref l, ref r) => l.contains_constants() || r.contains_constants(),
        }
    }

    /// Names of all variables in the formula.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables<'a>(&'a self, vars: &mut BTreeSet<&'a str>) {
        match *self {
            Formula::True | Formula::False => (),
            Formula::Variable(ref name) => {
                vars.insert(&**name);
            }
            Formula::Negation(ref inner) => inner.collect_variables(vars),
            Formula::Conjunction(ref l, ref r) |
            Formula::Disjunction(ref l, ref r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            }
        }
    }

    pub fn eval<E: Environment>(&self, env: &E) -> Result<bool, EvalError> {
        match *self {
            Formula::True => Ok(true),
            Formula::False => Ok(false),
            Formula::Variable(ref name) => {
                env.value(name).ok_or_else(|| EvalError::MissingVariable(name.to_string()))
            }
            Formula::Negation(ref inner) => inner.eval(env).map(|v| !v),
            Formula::Conjunction(ref l, ref r) => Ok(l.eval(env)? & r.eval(env)?),
            Formula::Disjunction(ref l, ref r) => Ok(l.eval(env)? | r.eval(env)?),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Formula::True => write!(fmt, "1"),
            Formula::False => write!(fmt, "0"),
            Formula::Variable(ref name) => write!(fmt, "{}", name),
            Formula::Negation(ref inner) => write!(fmt, "!{}", inner),
            Formula::Conjunction(ref l, ref r) => write!(fmt, "({} && {})", l, r),
            Formula::Disjunction(ref l, ref r) => write!(fmt, "({} || {})", l, r),
        }
    }
}

impl BitOr for Formula {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        Formula::or(self, other)
    }
}

impl BitAnd for Formula {
    type Output = Self;
    fn bitand(self, other: Self) -> Self {
        Formula::and(self, other)
    }
}

impl Not for Formula {
    type Output = Self;
    fn not(self) -> Self {
        Formula::negation(self)
    }
}

impl<'a> From<&'a str> for Formula {
    fn from(name: &'a str) -> Formula {
        Formula::var(name)
    }
}
