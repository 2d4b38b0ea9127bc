use std::sync::Arc;

use crate::formula::Formula;

use super::basic::BasicSimplifier;
use super::flat::FlatteningSimplifier;
use super::rules::{negate, Op};
use super::subtree::SubTreeSimplifier;
use super::Simplifier;

/// Chains all rewrite passes and repeats them while the printed formula keeps getting shorter.
///
/// One round runs, in order:
///
/// 1. the constant-pruning simplifier given at construction (a [`BasicSimplifier`] by default),
/// 2. negations moved inwards onto the leaves,
/// 3. the [`FlatteningSimplifier`],
/// 4. the [`SubTreeSimplifier`],
/// 5. negations moved outwards where every term of a chain is negated,
/// 6. the [`SubTreeSimplifier`] again.
///
/// The rounds are not monotone, so the shortest formula seen in any round is returned.
pub struct AwesomeSimplifier {
    constant_pruner: Arc<dyn Simplifier + Send + Sync>,
    flattening: FlatteningSimplifier,
    sub_tree: SubTreeSimplifier,
}

impl Default for AwesomeSimplifier {
    fn default() -> Self {
        AwesomeSimplifier::with_constant_pruner(Arc::new(BasicSimplifier::new()))
    }
}

impl AwesomeSimplifier {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_constant_pruner(constant_pruner: Arc<dyn Simplifier + Send + Sync>) -> Self {
        AwesomeSimplifier {
            constant_pruner,
            flattening: FlatteningSimplifier::new(),
            sub_tree: SubTreeSimplifier::new(),
        }
    }

    fn round(&self, formula: &Formula) -> Formula {
        let formula = self.constant_pruner.simplify(formula);
        trace!("1) pruned constants: {}", formula);
        let formula = move_negation_inwards(&formula);
        trace!("2) negations inwards: {}", formula);
        let formula = self.flattening.simplify(&formula);
        trace!("3) flattened: {}", formula);
        let formula = self.sub_tree.simplify(&formula);
        trace!("4) sub-trees: {}", formula);
        let formula = move_negation_outwards(&formula);
        trace!("5) negations outwards: {}", formula);
        let formula = self.sub_tree.simplify(&formula);
        trace!("6) sub-trees: {}", formula);
        formula
    }
}

impl Simplifier for AwesomeSimplifier {
    fn simplify(&self, formula: &Formula) -> Formula {
        let mut shortest = formula.clone();
        let mut shortest_length = formula.to_string().len();

        let mut current = formula.clone();
        let mut current_length = shortest_length;
        let mut iteration = 0;
        loop {
            iteration += 1;
            let previous_length = current_length;
            current = self.round(&current);
            current_length = current.to_string().len();
            info!("Simplification round {}: length {} -> {}", iteration, previous_length, current_length);

            if current_length < shortest_length {
                shortest_length = current_length;
                shortest = current.clone();
            }
            if current_length >= previous_length {
                break;
            }
        }
        shortest
    }
}

/// Applies De Morgan until negations only wrap leaves. Double negations are removed.
pub fn move_negation_inwards(f: &Formula) -> Formula {
    match *f {
        Formula::True | Formula::False | Formula::Variable(_) => f.clone(),
        Formula::Conjunction(ref l, ref r) => Formula::and(move_negation_inwards(l), move_negation_inwards(r)),
        Formula::Disjunction(ref l, ref r) => Formula::or(move_negation_inwards(l), move_negation_inwards(r)),
        Formula::Negation(ref inner) => {
            match **inner {
                Formula::Negation(ref nested) => move_negation_inwards(nested),
                Formula::Conjunction(ref l, ref r) => {
                    Formula::or(move_negation_inwards(&negate((**l).clone())),
                                move_negation_inwards(&negate((**r).clone())))
                }
                Formula::Disjunction(ref l, ref r) => {
                    Formula::and(move_negation_inwards(&negate((**l).clone())),
                                 move_negation_inwards(&negate((**r).clone())))
                }
                _ => f.clone(),
            }
        }
    }
}

/// `!A || !B || !C -> !(A && B && C)`, and the dual, for every chain whose terms are all negated.
pub fn move_negation_outwards(f: &Formula) -> Formula {
    match *f {
        Formula::True | Formula::False | Formula::Variable(_) => f.clone(),
        Formula::Negation(ref inner) => Formula::negation(move_negation_outwards(inner)),
        Formula::Conjunction(..) => chain_outwards(Op::And, f),
        Formula::Disjunction(..) => chain_outwards(Op::Or, f),
    }
}

fn chain_outwards(op: Op, f: &Formula) -> Formula {
    let terms = op.terms(f).iter().map(move_negation_outwards).collect::<Vec<_>>();
    let inners = terms.iter().map(Formula::as_negation).collect::<Option<Vec<_>>>();
    let result = match inners {
        Some(inners) => op.dual().fold(inners.into_iter().cloned()).map(Formula::negation),
        None => op.fold(terms),
    };
    result.unwrap_or_else(|| f.clone())
}
