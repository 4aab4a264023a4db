//! Document model - the text buffer the multi-edit engine works on
//!
//! Everything here is a host collaborator from the engine's point of view:
//! text storage, the regex search primitive, boundary classification at a
//! position and the [`TextChange`] notification every edit produces.

use std::ops::Range;
use std::path::PathBuf;

use regex::Regex;
use ropey::Rope;

use crate::syntax::LanguageId;

/// A single replacement of `removed` chars at `start` by `inserted` chars.
///
/// Every buffer mutation yields one of these; span trackers consume it to
/// keep their offsets valid (see [`crate::multiedit::Span::track`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    /// Char offset where the change begins
    pub start: usize,
    /// Number of chars removed at `start`
    pub removed: usize,
    /// Number of chars inserted at `start` (after the removal)
    pub inserted: usize,
}

impl TextChange {
    pub const fn insertion(at: usize, len: usize) -> Self {
        Self {
            start: at,
            removed: 0,
            inserted: len,
        }
    }

    pub const fn deletion(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            removed: range.end - range.start,
            inserted: 0,
        }
    }

    /// End of the removed range in pre-change coordinates
    pub const fn removed_end(&self) -> usize {
        self.start + self.removed
    }

    pub const fn is_noop(&self) -> bool {
        self.removed == 0 && self.inserted == 0
    }

    /// Map a single offset through this change. An offset equal to `start`
    /// stays in front of the inserted text.
    pub fn map_offset(&self, offset: usize) -> usize {
        let after_delete = if offset <= self.start {
            offset
        } else if offset >= self.removed_end() {
            offset - self.removed
        } else {
            self.start
        };
        if after_delete > self.start || (after_delete == self.start && offset > self.start) {
            after_delete + self.inserted
        } else {
            after_delete
        }
    }
}

/// Document state - the text buffer and associated file metadata
#[derive(Debug, Clone)]
pub struct Document {
    /// The text buffer
    pub buffer: Rope,
    /// Path to the file on disk (None for scratch buffers)
    pub file_path: Option<PathBuf>,
    /// Whether the buffer has unsaved changes
    pub is_modified: bool,
    /// Detected language, used for syntactic scope lookup
    pub language: LanguageId,
    /// Document revision counter (incremented on each edit)
    pub revision: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document with initial text
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            file_path: None,
            is_modified: false,
            language: LanguageId::PlainText,
            revision: 0,
        }
    }

    /// Load a document from a file path
    pub fn from_file(path: PathBuf) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(&path)?;
        let language = LanguageId::from_path(&path);
        Ok(Self {
            buffer: Rope::from(content),
            file_path: Some(path),
            is_modified: false,
            language,
            revision: 0,
        })
    }

    /// Full text as a String (may be expensive for large buffers)
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Total length in chars
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Get the number of lines in the document
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines().max(1)
    }

    /// Get a line's content without the trailing newline
    pub fn get_line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.buffer.len_lines() {
            return None;
        }
        let line = self.buffer.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Length of a line in chars, excluding the line break
    pub fn line_length(&self, line_idx: usize) -> usize {
        if line_idx >= self.buffer.len_lines() {
            return 0;
        }
        let line = self.buffer.line(line_idx);
        let mut len = line.len_chars();
        while len > 0 && matches!(line.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        len
    }

    /// Char offset of the first char on a line
    pub fn line_start(&self, line_idx: usize) -> usize {
        if line_idx >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        self.buffer.line_to_char(line_idx)
    }

    /// Char range of a line, excluding the line break
    pub fn line_range(&self, line_idx: usize) -> Range<usize> {
        let start = self.line_start(line_idx);
        start..start + self.line_length(line_idx)
    }

    /// Line containing a char offset
    pub fn line_of(&self, offset: usize) -> usize {
        self.buffer.char_to_line(offset.min(self.buffer.len_chars()))
    }

    /// Convert (line, column) to a char offset, clamping the column to the line
    pub fn cursor_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        self.line_start(line) + column.min(self.line_length(line))
    }

    /// Convert a char offset to (line, column)
    pub fn offset_to_cursor(&self, offset: usize) -> (usize, usize) {
        let clamped = offset.min(self.buffer.len_chars());
        let line = self.buffer.char_to_line(clamped);
        (line, clamped - self.buffer.line_to_char(line))
    }

    /// Column of the first non-blank character on a line
    pub fn first_non_whitespace_column(&self, line_idx: usize) -> usize {
        self.get_line(line_idx)
            .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
            .unwrap_or(0)
    }

    /// Column just after the last non-blank character on a line
    pub fn last_non_whitespace_column(&self, line_idx: usize) -> usize {
        self.get_line(line_idx)
            .map(|line| line.trim_end().chars().count())
            .unwrap_or(0)
    }

    /// Whether a line is empty or only whitespace
    pub fn is_blank_line(&self, line_idx: usize) -> bool {
        self.get_line(line_idx)
            .map(|line| line.trim().is_empty())
            .unwrap_or(true)
    }

    /// Character at a char offset
    pub fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.buffer.len_chars()).then(|| self.buffer.char(offset))
    }

    /// Character immediately before a char offset
    pub fn char_before(&self, offset: usize) -> Option<char> {
        if offset == 0 || offset > self.buffer.len_chars() {
            return None;
        }
        Some(self.buffer.char(offset - 1))
    }

    /// Text in a char range (clamped to the buffer)
    pub fn slice(&self, range: Range<usize>) -> String {
        let len = self.buffer.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return String::new();
        }
        self.buffer.slice(start..end).to_string()
    }

    /// Maximal run of chars satisfying `pred` around `offset`.
    ///
    /// Looks at the char under `offset` first, then the one before it, so a
    /// cursor sitting just past a word still grabs that word.
    pub fn run_at(&self, offset: usize, pred: impl Fn(char) -> bool) -> Option<Range<usize>> {
        let anchor = match self.char_at(offset) {
            Some(ch) if pred(ch) => offset,
            _ => match self.char_before(offset) {
                Some(ch) if pred(ch) => offset - 1,
                _ => return None,
            },
        };

        let mut start = anchor;
        while start > 0 && pred(self.buffer.char(start - 1)) {
            start -= 1;
        }
        let mut end = anchor + 1;
        while end < self.buffer.len_chars() && pred(self.buffer.char(end)) {
            end += 1;
        }
        Some(start..end)
    }

    /// Replace a char range with new text, returning the change notification
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> TextChange {
        let len = self.buffer.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        if start < end {
            self.buffer.remove(start..end);
        }
        if !text.is_empty() {
            self.buffer.insert(start, text);
        }

        let change = TextChange {
            start,
            removed: end - start,
            inserted: text.chars().count(),
        };
        if !change.is_noop() {
            self.is_modified = true;
            self.revision = self.revision.wrapping_add(1);
        }
        change
    }

    /// Insert text at a char offset
    pub fn insert(&mut self, offset: usize, text: &str) -> TextChange {
        self.replace(offset..offset, text)
    }

    /// Delete a char range
    pub fn delete(&mut self, range: Range<usize>) -> TextChange {
        self.replace(range, "")
    }

    /// Text-search primitive: every non-overlapping, non-empty match of
    /// `regex` lying entirely inside `range`, in position order. The search
    /// is bounded at `range.end`, so a match that would run past it is cut
    /// back to its longest prefix that fits.
    ///
    /// `accept` sees each candidate as a char range; a rejected candidate
    /// resumes the scan one char after its start, so a rejected long match
    /// cannot hide a valid shorter one.
    pub fn find_matches(
        &self,
        regex: &Regex,
        range: Range<usize>,
        mut accept: impl FnMut(usize, usize) -> bool,
    ) -> Vec<(usize, usize)> {
        let len = self.buffer.len_chars();
        let start_char = range.start.min(len);
        let end_char = range.end.clamp(start_char, len);

        // The regex sees text before the range but nothing past its end
        let end_byte = self.buffer.char_to_byte(end_char);
        let haystack = self.buffer.slice(..end_char).to_string();
        let mut pos = self.buffer.char_to_byte(start_char);
        let mut results = Vec::new();

        while pos < end_byte {
            let Some(m) = regex.find_at(&haystack, pos) else {
                break;
            };
            if m.start() == m.end() {
                pos = next_char_boundary(&haystack, m.start());
                continue;
            }

            let start = self.buffer.byte_to_char(m.start());
            let end = self.buffer.byte_to_char(m.end());
            if accept(start, end) {
                results.push((start, end));
                pos = m.end();
            } else {
                pos = next_char_boundary(&haystack, m.start());
            }
        }
        results
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn next_char_boundary(text: &str, byte: usize) -> usize {
    byte + text[byte..]
        .chars()
        .next()
        .map(|c| c.len_utf8())
        .unwrap_or(1)
}
