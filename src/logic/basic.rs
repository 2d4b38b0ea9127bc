use crate::formula::Formula;

use super::rules::{rewrite_pair, Op, Rewrite};
use super::Simplifier;

/// Local rewriting on the binary tree.
///
/// Each `&&`/`||` node is simplified bottom-up by testing its two simplified children
/// against each other. A node that nothing applies to is returned as the same instance,
/// see [`Formula::same_instance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSimplifier;

impl BasicSimplifier {
    pub fn new() -> Self {
        BasicSimplifier
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
            Formula::Conjunction(ref l, ref r) => self.visit_operator(Op::And, f, l, r),
            Formula::Disjunction(ref l, ref r) => self.visit_operator(Op::Or, f, l, r),
        }
    }

    fn visit_operator(&self, op: Op, f: &Formula, l0: &Formula, r0: &Formula) -> Formula {
        let left = self.visit(l0);
        let right = self.visit(r0);

        if left == op.neutral() {
            return right;
        }
        if right == op.neutral() {
            return left;
        }
        if left == op.absorbing() || right == op.absorbing() {
            return op.absorbing();
        }

        match rewrite_pair(op, &left, &right) {
            Rewrite::DropRight => return left,
            Rewrite::DropLeft => return right,
            Rewrite::Collapse => return op.absorbing(),
            Rewrite::ReplaceRight(replacement) => return self.visit(&op.join(left, replacement)),
            Rewrite::ReplaceLeft(replacement) => return self.visit(&op.join(replacement, right)),
            Rewrite::Keep => (),
        }

        // A || (C || (A && B)) -> A || C
        if let Some(result) = self.nested_absorption(op, &left, &right)
            .or_else(|| self.nested_absorption(op, &right, &left)) {
            return result;
        }

        if left.same_instance(l0) && right.same_instance(r0) {
            f.clone()
        } else {
            op.join(left, right)
        }
    }

    /// Removes the terms of a nested `op` chain in `chain` that `term` absorbs.
    fn nested_absorption(&self, op: Op, term: &Formula, chain: &Formula) -> Option<Formula> {
        if Op::of(chain) != Some(op) {
            return None;
        }
        let terms = op.terms(chain);
        let kept = terms.iter()
            .filter(|t| rewrite_pair(op, term, t) != Rewrite::DropRight)
            .cloned()
            .collect::<Vec<_>>();
        if kept.len() == terms.len() {
            return None;
        }
        trace!("nested absorption of {} in {}", term, chain);
        let result = match op.fold(kept) {
            Some(rest) => op.join(term.clone(), rest),
            None => term.clone(),
        };
        Some(self.visit(&result))
    }
}

impl Simplifier for BasicSimplifier {
    /// Visits until nothing changes. Every rewrite removes a node, so this terminates.
    fn simplify(&self, formula: &Formula) -> Formula {
        let mut current = formula.clone();
        loop {
            let next = self.visit(&current);
            if next.same_instance(&current) {
                return next;
            }
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BasicSimplifier;
    use crate::formula::Formula;
    use crate::logic::{is_structurally_equal, FormulaEqualityChecker, Simplifier};
    use quickcheck::quickcheck;

    fn var(name: &str) -> Formula {
        Formula::var(name)
    }

    fn simplify(f: &Formula) -> Formula {
        BasicSimplifier::new().simplify(f)
    }

    #[test]
    fn constants() {
        let a = var("A");
        assert_eq!(simplify(&(a.clone() | Formula::False)), a);
        assert_eq!(simplify(&(Formula::True & a.clone())), a);
        assert_eq!(simplify(&(a.clone() | Formula::True)), Formula::True);
        assert_eq!(simplify(&(Formula::False & a.clone())), Formula::False);
        assert_eq!(simplify(&!Formula::True), Formula::False);
        assert_eq!(simplify(&!(a.clone() & Formula::False)), Formula::True);
    }

    #[test]
    fn absorption_and_complementation() {
        let a = var("A");
        let b = var("B");
        assert_eq!(simplify(&(a.clone() | (a.clone() & b.clone()))), a);
        assert_eq!(simplify(&(a.clone() & (a.clone() | b.clone()))), a);
        assert_eq!(simplify(&(a.clone() | !a.clone())), Formula::True);
        assert_eq!(simplify(&(a.clone() & !a.clone())), Formula::False);
        assert_eq!(simplify(&(a.clone() | a.clone())), a);
    }

    #[test]
    fn absorption_looks_into_nested_conjunctions() {
        let a = var("A");
        let b = var("B");
        let c = var("C");
        assert_eq!(simplify(&(a.clone() | (b.clone() & (c.clone() & a.clone())))), a);
    }

    #[test]
    fn nested_absorption() {
        let a = var("A");
        let b = var("B");
        let c = var("C");
        assert_eq!(simplify(&(a.clone() | (c.clone() | (a.clone() & b.clone())))), a.clone() | c.clone());
        assert_eq!(simplify(&((c.clone() & (a.clone() | b.clone())) & a.clone())), a.clone() & c.clone());
    }

    #[test]
    fn negated_de_morgan_pattern() {
        let a = var("A");
        let b = var("B");
        assert_eq!(simplify(&(!a.clone() | !(!a.clone() | b.clone()))), !a.clone() | !b.clone());
    }

    #[test]
    fn double_negation() {
        let a = var("A");
        assert_eq!(simplify(&!!a.clone()), a);
        assert_eq!(simplify(&!!!a.clone()), !a.clone());
    }

    #[test]
    fn unchanged_formula_is_the_same_instance() {
        let f = (var("A") | var("B")) & !var("C");
        assert!(simplify(&f).same_instance(&f));
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
    fn constant_only_sub_trees() {
        let t = Formula::True;
        assert_eq!(simplify(&(!t.clone() & !!t.clone())), Formula::False);
        assert_eq!(simplify(&(t.clone() & t.clone())), Formula::True);
        assert_eq!(simplify(&((var("A") & !!t.clone()) | !t.clone())), var("A"));
    }

    #[test]
    fn repeated_absorption() {
        let f = var("A") & (var("A") | (var("A") & var("B")));
        assert_eq!(simplify(&f), var("A"));
    }

    #[test]
    fn verify_idempotent() {
        let t = Formula::True;
        for f in &[!t.clone() & !!t.clone(), t.clone() & t.clone(), (var("A") & !!t.clone()) | !t.clone()] {
            assert!(verify_idempotent_prop(f.clone()), "{}", f);
        }
        quickcheck(verify_idempotent_prop as fn(Formula) -> bool);
    }
}
