/*!
 A small line buffer that tracks indentation, used to render decoded graphs as trees.
*/

/// Each level of indentation is this many spaces
const INDENT: &str = "  ";

/// Accumulates indented lines of text
#[derive(Debug, Default)]
pub struct Printer {
    buffer: String,
    depth: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `text` at the current indentation; each line of multi-line text is indented
    pub fn print(&mut self, text: impl AsRef<str>) {
        for line in text.as_ref().lines() {
            for _ in 0..self.depth {
                self.buffer.push_str(INDENT);
            }
            self.buffer.push_str(line);
            self.buffer.push('\n');
        }
    }

    pub fn increase_indent(&mut self) {
        self.depth += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Consume the printer, dropping the final newline
    pub fn into_string(mut self) -> String {
        if self.buffer.ends_with('\n') {
            self.buffer.pop();
        }
        self.buffer
    }
}
