const INDENT: &str = "  ";

/// Accumulates indented lines of PHP source.
#[derive(Debug, Default)]
pub(crate) struct SourceWriter {
    buf: String,
    indent: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Default::default()
    }

    /// Writes a single line at the current indentation. Empty lines are never indented.
    pub fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        let line = line.as_ref();
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(line);
        }
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        debug_assert!(self.indent > 0, "unbalanced dedent");
        self.indent = self.indent.saturating_sub(1);
        self
    }

    pub fn finish(self) -> String {
        debug_assert_eq!(self.indent, 0, "unbalanced indent");
        self.buf
    }
}

#[test]
fn write_indented() {
    let mut w = SourceWriter::new();
    w.line("a {").indent().line("b;").blank().dedent().line("}");
    assert_eq!(w.finish(), "a {\n  b;\n\n}\n");
}
