//! Indented text output.
//!
//! `CodeWriter` is the output buffer every emitter writes through. Nested
//! members are rendered to strings first and spliced in with
//! [`CodeWriter::write_block`], which re-indents every line.

const INDENT: &str = "    ";

/// Line-oriented output buffer with an indentation level.
#[derive(Debug, Default)]
pub struct CodeWriter {
    indent: usize,
    output: String,
}

impl CodeWriter {
    pub fn new() -> Self {
        CodeWriter {
            indent: 0,
            output: String::with_capacity(1024),
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a line at the current indentation.
    pub fn writeln(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str(INDENT);
            }
            self.output.push_str(line);
        }
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Write multi-line text, indenting each line.
    pub fn write_block(&mut self, text: &str) {
        for line in text.lines() {
            self.writeln(line);
        }
    }

    /// Write `blocks` separated by one empty line.
    pub fn write_blocks<S: AsRef<str>>(&mut self, blocks: &[S]) {
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.write_block(block.as_ref());
        }
    }

    /// Take the generated output, without the trailing newline.
    pub fn finish(mut self) -> String {
        while self.output.ends_with('\n') {
            self.output.pop();
        }
        self.output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn indent_and_dedent() {
        let mut writer = CodeWriter::new();
        writer.writeln("a {");
        writer.indent();
        writer.writeln("b");
        writer.dedent();
        writer.writeln("}");

        assert_eq!(writer.finish(), "a {\n    b\n}");
    }

    #[test]
    fn blank_lines_carry_no_indentation() {
        let mut writer = CodeWriter::new();
        writer.indent();
        writer.write_block("x\n\ny");

        assert_eq!(writer.finish(), "    x\n\n    y");
    }

    #[test]
    fn blocks_are_separated_by_one_empty_line() {
        let mut writer = CodeWriter::new();
        writer.write_blocks(&["one", "two\nlines"]);

        assert_eq!(writer.finish(), "one\n\ntwo\nlines");
    }
}
