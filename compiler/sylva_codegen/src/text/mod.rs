//! Indentation-aware line buffer for generated source.
//!
//! A [`TextBlock`] is a list of lines plus a current indentation level.
//! Appended lines are prefixed with the indentation in effect at the time
//! they are appended; empty lines are never indented.


use std::fmt;

/// Block of source lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    lines: Vec<String>,
    indent_level: usize,
    indent_size: usize,
    indent_char: char,
    end_line: String,
}

impl Default for TextBlock {
    fn default() -> Self {
        TextBlock {
            lines: Vec::new(),
            indent_level: 0,
            indent_size: 4,
            indent_char: ' ',
            end_line: "\n".to_owned(),
        }
    }
}

impl TextBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent with `size` copies of `ch` per level.
    #[must_use]
    pub fn with_indent(mut self, size: usize, ch: char) -> Self {
        self.indent_size = size;
        self.indent_char = ch;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: usize) -> Self {
        self.indent_level = level;
        self
    }

    #[must_use]
    pub fn with_end_line(mut self, end_line: impl Into<String>) -> Self {
        self.end_line = end_line.into();
        self
    }

    /// Append one line at the current indentation.
    pub fn append(&mut self, line: impl AsRef<str>) -> &mut Self {
        let line = line.as_ref();
        if line.is_empty() {
            self.lines.push(String::new());
        } else {
            let mut indented = self.indent_str();
            indented.push_str(line);
            self.lines.push(indented);
        }
        self
    }

    /// Append every line of `text`, splitting on newlines.
    pub fn append_text(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.append(line);
        }
        self
    }

    /// Append each line, keeping its own relative indentation.
    pub fn extend<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.append(line);
        }
        self
    }

    /// Append each line after removing the whitespace prefix common to all
    /// non-blank lines.
    pub fn extend_dedented<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<S> = lines.into_iter().collect();
        let common = lines
            .iter()
            .map(AsRef::as_ref)
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.len() - line.trim_start().len())
            .min()
            .unwrap_or(0);
        for line in &lines {
            let line = line.as_ref();
            self.append(line.get(common..).unwrap_or("").trim_end());
        }
        self
    }

    /// Append another block's lines, re-indented at the current level.
    pub fn extend_block(&mut self, other: &TextBlock) -> &mut Self {
        self.extend(other.lines.iter())
    }

    pub fn empty_line(&mut self, count: usize) -> &mut Self {
        self.lines.extend(std::iter::repeat_with(String::new).take(count));
        self
    }

    pub fn indent(&mut self, steps: usize) -> &mut Self {
        self.indent_level += steps;
        self
    }

    /// Decrease the indentation; saturates at zero.
    pub fn dedent(&mut self, steps: usize) -> &mut Self {
        if steps > self.indent_level {
            tracing::warn!(steps, level = self.indent_level, "dedent below column zero");
        }
        self.indent_level = self.indent_level.saturating_sub(steps);
        self
    }

    /// Run `f` one level deeper.
    pub fn indented(&mut self, f: impl FnOnce(&mut TextBlock)) -> &mut Self {
        self.indent(1);
        f(self);
        self.dedent(1);
        self
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Prefix applied to lines appended now.
    pub fn indent_str(&self) -> String {
        std::iter::repeat(self.indent_char)
            .take(self.indent_level * self.indent_size)
            .collect()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines joined with the end-of-line string.
    pub fn text(&self) -> String {
        self.lines.join(&self.end_line)
    }
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
