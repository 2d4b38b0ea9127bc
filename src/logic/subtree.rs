use std::hash::{BuildHasherDefault, Hash, Hasher};

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::formula::Formula;

use super::flat::FlatteningSimplifier;
use super::structure::is_structurally_equal;
use super::Simplifier;

const NEGATION_FACTOR: u64 = 123;
const DISJUNCTION_FACTOR: u64 = 213;
const CONJUNCTION_FACTOR: u64 = 4564;
const COLLISION_FACTOR: u64 = 23;

const MAX_ITERATIONS: usize = 50;

const PLACEHOLDER: &str = "__TMP_REPLACE__";

type Buckets = IndexMap<u64, Vec<Formula>, BuildHasherDefault<FxHasher>>;

/// Finds groups of structurally equal sub-trees.
///
/// Leaves are never grouped. Every `!`, `&&` and `||` node, the whole formula included,
/// ends up in exactly one group.
#[derive(Debug, Default)]
pub struct SubTreeGroupFinder {
    groups: Buckets,
}

impl SubTreeGroupFinder {
    pub fn new() -> Self {
        Default::default()
    }

    /// All groups, singletons included, in order of first appearance in a post-order walk.
    pub fn find_groups(&mut self, formula: &Formula) -> Vec<Vec<Formula>> {
        self.visit(formula);
        self.groups.drain(..).map(|(_, group)| group).collect()
    }

    fn visit(&mut self, f: &Formula) -> u64 {
        match *f {
            Formula::True | Formula::False | Formula::Variable(_) => leaf_hash(f),
            Formula::Negation(ref inner) => {
                let hash = self.visit(inner).wrapping_mul(NEGATION_FACTOR);
                self.add_sub_tree(f, hash);
                hash
            }
            Formula::Disjunction(ref l, ref r) => {
                let hash = self.visit(l).wrapping_add(self.visit(r)).wrapping_mul(DISJUNCTION_FACTOR);
                self.add_sub_tree(f, hash);
                hash
            }
            Formula::Conjunction(ref l, ref r) => {
                let hash = self.visit(l).wrapping_add(self.visit(r)).wrapping_mul(CONJUNCTION_FACTOR);
                self.add_sub_tree(f, hash);
                hash
            }
        }
    }

    pub(crate) fn add_sub_tree(&mut self, sub_tree: &Formula, mut hash: u64) {
        loop {
            let group = self.groups.entry(hash).or_insert_with(Vec::new);
            if group.first().map_or(true, |first| is_structurally_equal(first, sub_tree)) {
                group.push(sub_tree.clone());
                return;
            }
            trace!("hash collision for {}", sub_tree);
            // the increment keeps a zero hash from mapping onto itself
            hash = hash.wrapping_mul(COLLISION_FACTOR).wrapping_add(1);
        }
    }
}

/// Never zero, so that sub-trees built only from constants do not all share hash `0`.
fn leaf_hash(f: &Formula) -> u64 {
    let mut hasher = FxHasher::default();
    f.hash(&mut hasher);
    hasher.finish() | 1
}

/// Replaces every occurrence of a member of `targets` with `replacement`.
///
/// Sub-trees that contain no occurrence are shared with `f`, not rebuilt.
fn replace_all(f: &Formula, targets: &[Formula], replacement: &Formula) -> Formula {
    if targets.iter().any(|t| t == f) {
        return replacement.clone();
    }
    match *f {
        Formula::True | Formula::False | Formula::Variable(_) => f.clone(),
        Formula::Negation(ref inner) => {
            let nested = replace_all(inner, targets, replacement);
            if nested.same_instance(inner) {
                f.clone()
            } else {
                Formula::negation(nested)
            }
        }
        Formula::Conjunction(ref l, ref r) | Formula::Disjunction(ref l, ref r) => {
            let left = replace_all(l, targets, replacement);
            let right = replace_all(r, targets, replacement);
            if left.same_instance(l) && right.same_instance(r) {
                f.clone()
            } else if f.is_conjunction() {
                Formula::and(left, right)
            } else {
                Formula::or(left, right)
            }
        }
    }
}

/// Exposes laws hidden behind repeated complex sub-trees.
///
/// Each group of repeated sub-trees is replaced by a single placeholder variable, the result
/// is run through the [`FlatteningSimplifier`], and the placeholder is put back. This lets
/// `X || (X && Y) -> X` fire when `X` is not a plain variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubTreeSimplifier {
    simplifier: FlatteningSimplifier,
}

impl SubTreeSimplifier {
    pub fn new() -> Self {
        Default::default()
    }

    fn placeholder(formula: &Formula) -> Formula {
        let vars = formula.variables();
        let mut name = PLACEHOLDER.to_string();
        while vars.contains(name.as_str()) {
            name.push('_');
        }
        Formula::var(name)
    }
}

impl Simplifier for SubTreeSimplifier {
    fn simplify(&self, formula: &Formula) -> Formula {
        let mut finder = SubTreeGroupFinder::new();
        let mut formula = formula.clone();
        let replacement = SubTreeSimplifier::placeholder(&formula);

        let mut iteration = 0;
        loop {
            if iteration == MAX_ITERATIONS {
                warn!("Stopping sub-tree simplification after {} iterations", MAX_ITERATIONS);
                break;
            }
            iteration += 1;

            let mut groups = finder.find_groups(&formula)
                .into_iter()
                .filter(|group| group.len() > 1)
                .map(|group| (group[0].to_string().len(), group))
                .collect::<Vec<_>>();
            // Largest sub-trees first; this converges in fewer iterations than ordering by group size.
            groups.sort_by(|a, b| b.0.cmp(&a.0));
            debug!("Sub-tree iteration {}: {} repeated groups", iteration, groups.len());

            let mut changed = false;
            for (_, group) in groups {
                let with_replacement = replace_all(&formula, &group, &replacement);
                let simplified = self.simplifier.simplify(&with_replacement);
                if !is_structurally_equal(&with_replacement, &simplified) {
                    trace!("group {} simplified to {}", group[0], simplified);
                    formula = replace_all(&simplified, &[replacement.clone()], &group[0]);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        formula
    }
}

#[cfg(test)]
mod tests {
    use super::{SubTreeGroupFinder, SubTreeSimplifier};
    use crate::formula::Formula;
    use crate::logic::{is_structurally_equal, FormulaEqualityChecker, Simplifier};
    use quickcheck::quickcheck;

    fn var(name: &str) -> Formula {
        Formula::var(name)
    }

    fn repeated(groups: &[Vec<Formula>]) -> Vec<Vec<Formula>> {
        groups.iter().filter(|g| g.len() > 1).cloned().collect()
    }

    #[test]
    fn finds_one_group_per_node() {
        let f = (var("A") & var("B")) | !var("C");
        let groups = SubTreeGroupFinder::new().find_groups(&f);
        assert_eq!(groups,
                   vec![vec![var("A") & var("B")], vec![!var("C")], vec![f.clone()]]);
    }

    #[test]
    fn groups_structurally_equal_sub_trees() {
        let x = var("A") & var("B");
        let y = var("B") & var("A");
        let f = (x.clone() | var("C")) & (var("D") | y.clone());
        let groups = SubTreeGroupFinder::new().find_groups(&f);
        assert_eq!(repeated(&groups), vec![vec![x, y]]);
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn conjunction_and_disjunction_of_the_same_children_differ() {
        let f = (var("A") & var("B")) | (var("A") | var("B"));
        let groups = SubTreeGroupFinder::new().find_groups(&f);
        assert!(repeated(&groups).is_empty());
    }

    #[test]
    fn hash_collisions_are_resolved() {
        let mut finder = SubTreeGroupFinder::new();
        let x = var("A") & var("B");
        let y = var("C") | var("D");
        finder.add_sub_tree(&x, 42);
        finder.add_sub_tree(&y, 42);
        finder.add_sub_tree(&(var("B") & var("A")), 42);
        assert_eq!(finder.find_groups(&var("E")),
                   vec![vec![x, var("B") & var("A")], vec![y]]);
    }

    #[test]
    fn constant_only_sub_trees() {
        let t = Formula::True;
        let f = !t.clone() & !!t.clone();
        let groups = SubTreeGroupFinder::new().find_groups(&f);
        assert_eq!(groups, vec![vec![!t.clone(), !t.clone()], vec![!!t.clone()], vec![f.clone()]]);
        assert_eq!(SubTreeSimplifier::new().simplify(&f), Formula::False);
    }

    #[test]
    fn zero_hash_collisions_are_resolved() {
        let mut finder = SubTreeGroupFinder::new();
        let x = !Formula::True;
        let y = Formula::True & Formula::True;
        finder.add_sub_tree(&x, 0);
        finder.add_sub_tree(&y, 0);
        finder.add_sub_tree(&x, 0);
        assert_eq!(finder.find_groups(&var("E")), vec![vec![x.clone(), x], vec![y]]);
    }

    #[test]
    fn finder_is_reusable() {
        let mut finder = SubTreeGroupFinder::new();
        let f = !var("A");
        assert_eq!(finder.find_groups(&f).len(), 1);
        assert_eq!(finder.find_groups(&f).len(), 1);
    }

    #[test]
    fn absorbs_repeated_complex_sub_trees() {
        let x = var("A") | var("B");
        let f = x.clone() | (x.clone() & var("C"));
        assert!(is_structurally_equal(&SubTreeSimplifier::new().simplify(&f), &x));

        let g = !x.clone() & (x.clone() | var("D"));
        assert!(is_structurally_equal(&SubTreeSimplifier::new().simplify(&g), &(!x & var("D"))));
    }

    #[test]
    fn leaves_irreducible_formulas_alone() {
        let f = (var("A") & var("B")) | (var("C") & var("D"));
        assert_eq!(SubTreeSimplifier::new().simplify(&f), f);
    }

    #[test]
    fn placeholder_does_not_clash() {
        let f = var("__TMP_REPLACE__") | var("A");
        assert_eq!(SubTreeSimplifier::placeholder(&f), var("__TMP_REPLACE___"));
    }

    fn verify_sound_prop(input: Formula) -> bool {
        let simplified = SubTreeSimplifier::new().simplify(&input);
        FormulaEqualityChecker::new().is_logically_equal(&input, &simplified).unwrap_or(false)
    }

    #[test]
    fn verify_sound() {
        let _ = env_logger::try_init();
        quickcheck(verify_sound_prop as fn(Formula) -> bool);
    }

    fn verify_idempotent_prop(input: Formula) -> bool {
        let simplifier = SubTreeSimplifier::new();
        let once = simplifier.simplify(&input);
        is_structurally_equal(&simplifier.simplify(&once), &once)
    }

    #[test]
    fn verify_idempotent() {
        let t = Formula::True;
        for f in &[!t.clone() & !!t.clone(), t.clone() & t.clone(), (var("A") & !!t.clone()) | !t.clone()] {
            assert!(verify_sound_prop(f.clone()), "{}", f);
            assert!(verify_idempotent_prop(f.clone()), "{}", f);
        }
        quickcheck(verify_idempotent_prop as fn(Formula) -> bool);
    }
}
