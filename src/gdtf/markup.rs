use super::values::escape;

/// Line-oriented markup builder: one element tag per line, two-space indent
/// per depth level. Attribute values are escaped on the way in.
#[derive(Debug, Default)]
pub struct Markup {
    lines: Vec<String>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a pre-formed line (declarations).
    pub fn raw(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    pub fn open(&mut self, depth: usize, tag: &str, attrs: &[(&str, &str)]) {
        let line = Self::start_tag(depth, tag, attrs, ">");
        self.lines.push(line);
    }

    pub fn empty(&mut self, depth: usize, tag: &str, attrs: &[(&str, &str)]) {
        let line = Self::start_tag(depth, tag, attrs, "/>");
        self.lines.push(line);
    }

    pub fn close(&mut self, depth: usize, tag: &str) {
        self.lines.push(format!("{}</{tag}>", indent(depth)));
    }

    /// Lines joined with `\n`, no trailing newline.
    pub fn finish(self) -> String {
        self.lines.join("\n")
    }

    fn start_tag(depth: usize, tag: &str, attrs: &[(&str, &str)], end: &str) -> String {
        let mut line = format!("{}<{tag}", indent(depth));
        for (name, value) in attrs {
            line.push(' ');
            line.push_str(name);
            line.push_str("=\"");
            line.push_str(&escape(value));
            line.push('"');
        }
        line.push_str(end);
        line
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nests_with_two_space_indent() {
        let mut out = Markup::new();
        out.raw(r#"<?xml version="1.0"?>"#);
        out.open(0, "Root", &[("Name", "a")]);
        out.empty(1, "Leaf", &[]);
        out.close(0, "Root");
        assert_eq!(
            out.finish(),
            "<?xml version=\"1.0\"?>\n<Root Name=\"a\">\n  <Leaf/>\n</Root>"
        );
    }

    #[test]
    fn escapes_attribute_values() {
        let mut out = Markup::new();
        out.empty(0, "Slot", &[("Name", "Red & \"Blue\"")]);
        assert_eq!(out.finish(), "<Slot Name=\"Red &amp; &quot;Blue&quot;\"/>");
    }
}
