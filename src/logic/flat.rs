use crate::formula::Formula;

use super::rules::{rewrite_pair, Op, Rewrite};
use super::structure::position_of;
use super::Simplifier;

/// Local rewriting on flattened `&&`/`||` chains.
///
/// Unlike [`BasicSimplifier`](super::BasicSimplifier), every pair of terms of a chain is
/// tested, not only the two children of a binary node, and terms common to every operand
/// are factored out. This is the simplifier the higher-level passes build on.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatteningSimplifier;

impl FlatteningSimplifier {
    pub fn new() -> Self {
        FlatteningSimplifier
    }

    fn visit(&self, f: &Formula) -> Formula {
        match *f {
            Formula::True | Formula::False | Formula::Variable(_) => f.clone(),
            Formula::Negation(ref inner) => {
                let simplified = self.visit(inner);
                match simplified {
                    Formula::Negation(ref nested) => (**nested).clone(),
                    Formula::True => Formula::False,
                    Formula::False => Formula::True,
                    _ if simplified.same_instance(inner) => f.clone(),
                    _ => Formula::negation(simplified),
                }
            }
            Formula::Conjunction(..) => self.visit_chain(Op::And, f),
            Formula::Disjunction(..) => self.visit_chain(Op::Or, f),
        }
    }

    fn visit_chain(&self, op: Op, f: &Formula) -> Formula {
        let mut terms = Vec::new();
        for term in op.terms(f) {
            let simplified = self.visit(&term);
            if simplified == op.absorbing() {
                return op.absorbing();
            }
            if simplified != op.neutral() {
                terms.extend(op.terms(&simplified));
            }
        }

        let mut li = 0;
        'scan: while li < terms.len() {
            let mut ri = li + 1;
            while ri < terms.len() {
                let (slot, replacement) = match rewrite_pair(op, &terms[li], &terms[ri]) {
                    Rewrite::Keep => {
                        ri += 1;
                        continue;
                    }
                    Rewrite::DropRight => {
                        terms.remove(ri);
                        continue;
                    }
                    Rewrite::DropLeft => {
                        terms.remove(li);
                        continue 'scan;
                    }
                    Rewrite::Collapse => return op.absorbing(),
                    Rewrite::ReplaceLeft(replacement) => (li, replacement),
                    Rewrite::ReplaceRight(replacement) => (ri, replacement),
                };

                let replacement = self.visit(&replacement);
                trace!("replacing {} with {}", terms[slot], replacement);
                terms.remove(slot);
                if replacement == op.absorbing() {
                    return op.absorbing();
                }
                if replacement != op.neutral() {
                    let spliced = op.terms(&replacement);
                    terms.splice(slot..slot, spliced);
                }
                li = 0;
                continue 'scan;
            }
            li += 1;
        }

        if let Some(factored) = factor_out(op, &terms) {
            trace!("factored {:?} chain into {}", op, factored);
            return self.visit(&factored);
        }

        op.fold(terms).unwrap_or_else(|| op.neutral())
    }
}

/// `(A && B) || (A && C) -> A && (B || C)`, and the dual.
///
/// Only applies when there are at least two terms and every one of them is a chain of
/// the dual operator. `None` if no term is common to all of them.
fn factor_out(op: Op, terms: &[Formula]) -> Option<Formula> {
    let dual = op.dual();
    if terms.len() < 2 || terms.iter().any(|t| Op::of(t) != Some(dual)) {
        return None;
    }

    let mut lists = terms.iter().map(|t| dual.terms(t)).collect::<Vec<_>>();
    let candidates = lists[0].clone();
    let mut common = Vec::new();
    for candidate in candidates {
        let positions = lists.iter()
            .map(|list| position_of(list, &candidate))
            .collect::<Option<Vec<_>>>();
        if let Some(positions) = positions {
            for (list, pos) in lists.iter_mut().zip(positions) {
                list.remove(pos);
            }
            common.push(candidate);
        }
    }
    if common.is_empty() {
        return None;
    }

    if lists.iter().any(|list| list.is_empty()) {
        return dual.fold(common);
    }
    let remainders = lists.into_iter().filter_map(|list| dual.fold(list));
    let rest = op.fold(remainders)?;
    dual.fold(common.into_iter().chain(Some(rest)))
}

impl Simplifier for FlatteningSimplifier {
    fn simplify(&self, formula: &Formula) -> Formula {
        self.visit(formula)
    }
}

#[cfg(test)]
mod tests {
    use super::FlatteningSimplifier;
    use crate::formula::Formula;
    use crate::logic::{is_structurally_equal, FormulaEqualityChecker, Simplifier};
    use quickcheck::quickcheck;

    fn var(name: &str) -> Formula {
        Formula::var(name)
    }

    fn simplify(f: &Formula) -> Formula {
        FlatteningSimplifier::new().simplify(f)
    }

    #[test]
    fn laws() {
        let a = var("A");
        let b = var("B");
        assert_eq!(simplify(&(a.clone() | (a.clone() & b.clone()))), a);
        assert_eq!(simplify(&(a.clone() & (a.clone() | b.clone()))), a);
        assert_eq!(simplify(&(a.clone() | !a.clone())), Formula::True);
        assert_eq!(simplify(&(a.clone() & !a.clone())), Formula::False);
    }

    #[test]
    fn pairs_are_found_anywhere_in_the_chain() {
        let a = var("A");
        let b = var("B");
        let c = var("C");
        let f = ((a.clone() | b.clone()) | c.clone()) | (!b.clone() & var("D"));
        assert_eq!(simplify(&((a.clone() | b.clone()) | (c.clone() | !a.clone()))), Formula::True);
        assert_eq!(simplify(&((b.clone() | c.clone()) | (a.clone() | b.clone()))),
                   (b.clone() | c.clone()) | a.clone());
        assert_eq!(simplify(&f), ((a.clone() | b.clone()) | c.clone()) | var("D"));
    }

    #[test]
    fn constants_in_chains() {
        let a = var("A");
        let b = var("B");
        assert_eq!(simplify(&((a.clone() | Formula::False) | b.clone())), a.clone() | b.clone());
        assert_eq!(simplify(&((a.clone() & Formula::True) & Formula::False)), Formula::False);
        assert_eq!(simplify(&(Formula::False | Formula::False)), Formula::False);
        assert_eq!(simplify(&(Formula::True & Formula::True)), Formula::True);
    }

    #[test]
    fn negated_absorption_restarts_the_scan() {
        let a = var("A");
        let b = var("B");
        let c = var("C");
        // !A || (A && B) || !B -> !A || B || !B -> true
        assert_eq!(simplify(&((!a.clone() | (a.clone() & b.clone())) | !b.clone())), Formula::True);
        assert_eq!(simplify(&(!a.clone() & ((a.clone() | b.clone()) | c.clone()))),
                   !a.clone() & (b.clone() | c.clone()));
    }

    #[test]
    fn factors_out_common_terms() {
        let a = var("A");
        let b = var("B");
        let c = var("C");
        assert_eq!(simplify(&((a.clone() & b.clone()) | (a.clone() & c.clone()))),
                   a.clone() & (b.clone() | c.clone()));
        assert_eq!(simplify(&((b.clone() | a.clone()) & (c.clone() | a.clone()))),
                   a.clone() | (b.clone() & c.clone()));
    }

    #[test]
    fn structurally_equal_complex_terms_are_merged() {
        let x = var("A") & var("B");
        let y = var("B") & var("A");
        let f = (x.clone() | var("C")) | y;
        assert!(is_structurally_equal(&simplify(&f), &(x | var("C"))));
    }

    fn verify_sound_prop(input: Formula) -> bool {
        let simplified = simplify(&input);
        FormulaEqualityChecker::new().is_logically_equal(&input, &simplified).unwrap_or(false)
    }

    #[test]
    fn verify_sound() {
        let _ = env_logger::try_init();
        quickcheck(verify_sound_prop as fn(Formula) -> bool);
    }

    fn verify_idempotent_prop(input: Formula) -> bool {
        let once = simplify(&input);
        is_structurally_equal(&simplify(&once), &once)
    }

    #[test]
    fn verify_idempotent() {
        quickcheck(verify_idempotent_prop as fn(Formula) -> bool);
    }
}
