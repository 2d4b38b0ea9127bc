//! Random formulas over a small alphabet, for property tests.

use super::Formula;
use quickcheck::{Arbitrary, Gen};

pub const VARIABLES: &[&str] = &["A", "B", "C", "D"];

const MAX_DEPTH: usize = 4;

fn leaf(g: &mut Gen) -> Formula {
    match u8::arbitrary(g) % 8 {
        0 => Formula::True,
        1 => Formula::False,
        _ => Formula::var(*g.choose(VARIABLES).unwrap_or(&"A")),
    }
}

fn gen_formula(g: &mut Gen, depth: usize) -> Formula {
    if depth == 0 {
        return leaf(g);
    }
    match u8::arbitrary(g) % 7 {
        0 | 1 => leaf(g),
        2 => !gen_formula(g, depth - 1),
        3 | 4 => gen_formula(g, depth - 1) & gen_formula(g, depth - 1),
        _ => gen_formula(g, depth - 1) | gen_formula(g, depth - 1),
    }
}

impl Arbitrary for Formula {
    fn arbitrary(g: &mut Gen) -> Formula {
        let depth = g.size().min(MAX_DEPTH);
        gen_formula(g, depth)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Formula>> {
        let children = match *self {
            Formula::True | Formula::False => vec![],
            Formula::Variable(_) => vec![Formula::True, Formula::False],
            Formula::Negation(ref inner) => vec![(**inner).clone()],
            Formula::Conjunction(ref l, ref r) |
            Formula::Disjunction(ref l, ref r) => vec![(**l).clone(), (**r).clone()],
        };
        Box::new(children.into_iter())
    }
}
