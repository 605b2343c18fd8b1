//! Line/column cursor over the text being compiled.

use std::io;

use crate::consts::STDIN_NAME;

/// A named source buffer with a character-level cursor.
///
/// Columns count characters, not bytes: the operator set contains multi-byte
/// symbols (`×`, `÷`) and diagnostics underline by column.
#[derive(Debug, Clone)]
pub struct SourceHandle {
    name: String,
    lines: Vec<String>,
    current: Vec<char>,
    line_index: usize,
    pos: usize,
}

impl SourceHandle {
    /// Wrap already-loaded source text.
    pub fn new<N: Into<String>>(name: N, contents: &str) -> Self {
        let lines: Vec<String> = contents.lines().map(str::to_owned).collect();
        let current = lines.first().map(|line| line.chars().collect()).unwrap_or_default();

        Self {
            name: name.into(),
            lines,
            current,
            line_index: 0,
            pos: 0,
        }
    }

    /// Read a whole source from `reader`. Interactive embedders pass their
    /// line buffer here; file-driven ones pass an open file.
    pub fn from_reader<N, R>(name: N, mut reader: R) -> io::Result<Self>
    where
        N: Into<String>,
        R: io::Read,
    {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;

        Ok(Self::new(name, &contents))
    }

    /// Source for a nameless interactive line.
    pub fn from_line(contents: &str) -> Self {
        Self::new(STDIN_NAME, contents)
    }

    /// The source name. May be a relative path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based number of the current line.
    pub fn line_number(&self) -> usize {
        self.line_index + 1
    }

    /// Character position inside the current line.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether every line has been consumed.
    pub fn is_eof(&self) -> bool {
        self.line_index >= self.lines.len()
    }

    /// Whether the cursor ran past the end of the current line.
    pub fn is_eol(&self) -> bool {
        self.pos >= self.current.len()
    }

    /// The character under the cursor.
    ///
    /// Callers guard with [`is_eol`](Self::is_eol).
    pub fn current_char(&self) -> char {
        self.current[self.pos]
    }

    /// Character at an arbitrary position of the current line.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.current.get(pos).copied()
    }

    /// The line at `index` (0-based), as written.
    pub fn get_line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Advance the cursor by one character.
    pub(crate) fn bump(&mut self) {
        self.pos += 1;
    }

    /// Move to the next line and reset the column.
    pub(crate) fn advance_line(&mut self) {
        self.line_index += 1;
        self.pos = 0;
        self.current = self
            .lines
            .get(self.line_index)
            .map(|line| line.chars().collect())
            .unwrap_or_default();
    }

    /// Snapshot for diagnostics: current line content, its 1-based number,
    /// the given start column and the cursor column.
    pub(crate) fn freeze(&self, spos: usize) -> (String, usize, usize, usize) {
        let content = self
            .lines
            .get(self.line_index)
            .cloned()
            .unwrap_or_default();

        (content, self.line_number(), spos, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_lines_and_columns() {
        let mut file = SourceHandle::new("test.vism", "ab\ncd");
        assert_eq!(file.line_number(), 1);
        assert_eq!(file.current_char(), 'a');

        file.bump();
        assert_eq!(file.current_char(), 'b');
        file.bump();
        assert!(file.is_eol());

        file.advance_line();
        assert_eq!(file.line_number(), 2);
        assert_eq!(file.current_char(), 'c');

        file.advance_line();
        assert!(file.is_eof());
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let mut file = SourceHandle::from_line("×y");
        assert_eq!(file.current_char(), '×');
        file.bump();
        assert_eq!(file.current_char(), 'y');
        assert_eq!(file.pos(), 1);
    }

    #[test]
    fn empty_source_is_immediately_eof() {
        assert!(SourceHandle::from_line("").is_eof());
    }

    #[test]
    fn from_reader_loads_everything() {
        let file = SourceHandle::from_reader("r", "a\nb".as_bytes()).unwrap();
        assert_eq!(file.get_line(1), "b");
    }
}
