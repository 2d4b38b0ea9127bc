//! The Boolean-algebra laws shared by both rewrite simplifiers.
//!
//! Every law is phrased for an operator `op` and its dual, so one implementation
//! covers `||` and `&&`. Terms are compared structurally.

use crate::formula::Formula;

use super::structure::{is_structurally_equal, is_sub_multiset, position_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    And,
    Or,
}

impl Op {
    pub(crate) fn of(f: &Formula) -> Option<Op> {
        match *f {
            Formula::Conjunction(..) => Some(Op::And),
            Formula::Disjunction(..) => Some(Op::Or),
            _ => None,
        }
    }

    pub(crate) fn dual(self) -> Op {
        match self {
            Op::And => Op::Or,
            Op::Or => Op::And,
        }
    }

    /// The flat operand list of `f` under this operator.
    pub(crate) fn terms(self, f: &Formula) -> Vec<Formula> {
        match self {
            Op::And => f.conjunction_terms(),
            Op::Or => f.disjunction_terms(),
        }
    }

    pub(crate) fn join(self, left: Formula, right: Formula) -> Formula {
        match self {
            Op::And => Formula::and(left, right),
            Op::Or => Formula::or(left, right),
        }
    }

    pub(crate) fn fold<I: IntoIterator<Item = Formula>>(self, terms: I) -> Option<Formula> {
        match self {
            Op::And => Formula::conjunction_of(terms),
            Op::Or => Formula::disjunction_of(terms),
        }
    }

    /// `true` for `||`, `false` for `&&`.
    pub(crate) fn absorbing(self) -> Formula {
        Formula::constant(self == Op::Or)
    }

    /// `false` for `||`, `true` for `&&`.
    pub(crate) fn neutral(self) -> Formula {
        Formula::constant(self == Op::And)
    }
}

/// What to do with two operands of the same `op` node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rewrite {
    Keep,
    DropLeft,
    DropRight,
    /// The whole node becomes the absorbing constant.
    Collapse,
    ReplaceLeft(Formula),
    ReplaceRight(Formula),
}

/// `!f`, cancelling a double negation.
pub(crate) fn negate(f: Formula) -> Formula {
    match f {
        Formula::Negation(inner) => (*inner).clone(),
        other => Formula::negation(other),
    }
}

pub(crate) fn is_complement(a: &Formula, b: &Formula) -> bool {
    match (a.as_negation(), b.as_negation()) {
        (Some(inner), _) if is_structurally_equal(inner, b) => true,
        (_, Some(inner)) => is_structurally_equal(a, inner),
        _ => false,
    }
}

pub(crate) fn rewrite_pair(op: Op, left: &Formula, right: &Formula) -> Rewrite {
    if is_structurally_equal(left, right) {
        trace!("idempotence: {}", left);
        return Rewrite::DropRight;
    }
    if is_complement(left, right) {
        trace!("complementation: {} {:?} {}", left, op, right);
        return Rewrite::Collapse;
    }

    // A || (A && B) -> A
    let dual = op.dual();
    let left_terms = dual.terms(left);
    let right_terms = dual.terms(right);
    if is_sub_multiset(&left_terms, &right_terms) {
        return Rewrite::DropRight;
    }
    if is_sub_multiset(&right_terms, &left_terms) {
        return Rewrite::DropLeft;
    }

    // A || (!A && B) -> A || B
    if let Some(rest) = without_complement_of(dual, left, &right_terms) {
        return Rewrite::ReplaceRight(rest);
    }
    if let Some(rest) = without_complement_of(dual, right, &left_terms) {
        return Rewrite::ReplaceLeft(rest);
    }

    // A || !(A || B) -> A || !B
    // A || !(!A || B) -> A
    match de_morgan(op, left, right) {
        Some(Some(replacement)) => return Rewrite::ReplaceRight(replacement),
        Some(None) => return Rewrite::DropRight,
        None => (),
    }
    match de_morgan(op, right, left) {
        Some(Some(replacement)) => return Rewrite::ReplaceLeft(replacement),
        Some(None) => return Rewrite::DropLeft,
        None => (),
    }

    Rewrite::Keep
}

fn without_complement_of(dual: Op, term: &Formula, others: &[Formula]) -> Option<Formula> {
    if others.len() < 2 {
        return None;
    }
    let idx = others.iter().position(|o| is_complement(term, o))?;
    let rest = others.iter()
        .enumerate()
        .filter(|&(i, _)| i != idx)
        .map(|(_, o)| o.clone());
    dual.fold(rest)
}

/// Matches `term` against `other = !(d1 op d2 op ...)`.
///
/// `Some(Some(r))` replaces `other` with `r`; `Some(None)` drops `other`.
fn de_morgan(op: Op, term: &Formula, other: &Formula) -> Option<Option<Formula>> {
    let inner = other.as_negation()?;
    if Op::of(inner) != Some(op) {
        return None;
    }
    let inner_terms = op.terms(inner);
    if let Some(idx) = position_of(&inner_terms, term) {
        let rest = inner_terms.iter()
            .enumerate()
            .filter(|&(i, _)| i != idx)
            .map(|(_, t)| t.clone());
        return op.fold(rest).map(|rest| Some(negate(rest)));
    }
    if inner_terms.iter().any(|t| is_complement(t, term)) {
        return Some(None);
    }
    None
}
