use crate::formula::Formula;

/// Renders the binary tree of a formula, one node per line, children indented with tabs.
///
/// ```text
///         A
///     ||
///         B
/// &&
///     !(
///         C
///     )
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormulaTreePrinter {
    indent: String,
}

impl FormulaTreePrinter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn print(&mut self, formula: &Formula) -> String {
        let mut out = String::new();
        self.visit(formula, &mut out);
        out
    }

    fn visit(&mut self, f: &Formula, out: &mut String) {
        match *f {
            Formula::True => self.line(out, "true"),
            Formula::False => self.line(out, "false"),
            Formula::Variable(ref name) => self.line(out, name),
            Formula::Negation(ref inner) => {
                self.line(out, "!(\n");
                self.nested(inner, out);
                out.push('\n');
                self.line(out, ")");
            }
            Formula::Conjunction(ref l, ref r) => self.operator(l, "&&", r, out),
            Formula::Disjunction(ref l, ref r) => self.operator(l, "||", r, out),
        }
    }

    fn operator(&mut self, left: &Formula, symbol: &str, right: &Formula, out: &mut String) {
        self.nested(left, out);
        out.push('\n');
        self.line(out, symbol);
        out.push('\n');
        self.nested(right, out);
    }

    fn nested(&mut self, f: &Formula, out: &mut String) {
        self.indent.push('\t');
        self.visit(f, out);
        self.indent.pop();
    }

    fn line(&self, out: &mut String, text: &str) {
        out.push_str(&self.indent);
        out.push_str(text);
    }
}
