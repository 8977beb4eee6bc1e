//! Line-oriented source printer.

const INDENT: &str = "    ";

/// Accumulates generated source one line at a time at the current
/// indentation depth.
#[derive(Debug, Default)]
pub struct Source {
    text: String,
    depth: usize,
}

impl Source {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one indented line.
    pub fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        let line = line.as_ref();
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.text.push_str(INDENT);
            }
            self.text.push_str(line);
        }
        self.text.push('\n');
        self
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn unindent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Appends another source's lines at the current depth.
    pub fn append(&mut self, other: &Source) -> &mut Self {
        for line in other.text.lines() {
            self.line(line);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consumes the printer, returning the text with exactly one trailing newline.
    pub fn finish(self) -> String {
        let mut text = self.text.trim_end().to_owned();
        text.push('\n');
        text
    }
}
