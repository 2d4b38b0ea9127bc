use crate::formula::Formula;

/// Whether `f1` and `f2` are equal up to reordering and re-nesting of `&&` and `||` chains.
///
/// `A || (B || C)`, `(A || B) || C` and `(C || A) || B` are all structurally equal; no other
/// Boolean law is applied, so `A || A` is not structurally equal to `A`.
pub fn is_structurally_equal(f1: &Formula, f2: &Formula) -> bool {
    match (f1, f2) {
        (&Formula::True, &Formula::True) | (&Formula::False, &Formula::False) => true,
        (&Formula::Variable(ref a), &Formula::Variable(ref b)) => a == b,
        (&Formula::Negation(ref a), &Formula::Negation(ref b)) => is_structurally_equal(a, b),
        (&Formula::Conjunction(..), &Formula::Conjunction(..)) => {
            terms_are_equal(&f1.conjunction_terms(), &f2.conjunction_terms())
        }
        (&Formula::Disjunction(..), &Formula::Disjunction(..)) => {
            terms_are_equal(&f1.disjunction_terms(), &f2.disjunction_terms())
        }
        _ => false,
    }
}

/// Multiset comparison of two term lists, pairing each left term with one unused right term.
pub fn terms_are_equal(left: &[Formula], right: &[Formula]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut used = vec![false; right.len()];
    left.iter().all(|l| {
        let found = right.iter().enumerate().position(|(i, r)| !used[i] && is_structurally_equal(l, r));
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

/// Index of the first term in `terms` structurally equal to `f`.
pub(crate) fn position_of(terms: &[Formula], f: &Formula) -> Option<usize> {
    terms.iter().position(|t| is_structurally_equal(t, f))
}

/// Whether every term of `sub` has its own structurally equal partner in `sup`.
pub(crate) fn is_sub_multiset(sub: &[Formula], sup: &[Formula]) -> bool {
    if sub.len() > sup.len() {
        return false;
    }
    let mut used = vec![false; sup.len()];
    sub.iter().all(|s| {
        match sup.iter().enumerate().position(|(i, t)| !used[i] && is_structurally_equal(s, t)) {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
