//! Scope resolution - the outer bound all discovery respects

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::error::MultiEditError;
use super::region::Span;
use crate::model::{Document, EditorState};
use crate::syntax;

/// Char range that discovery may not leave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub start: usize,
    pub end: usize,
}

impl Scope {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// The whole document
    pub fn whole(document: &Document) -> Self {
        Self::new(0, document.len_chars())
    }

    /// Lines `first..=last` (0-indexed), clamped to the document
    pub fn lines(document: &Document, first: usize, last: usize) -> Result<Self, MultiEditError> {
        let count = document.line_count();
        if first > last || first >= count {
            return Err(MultiEditError::InvalidScope(format!(
                "line range {}..{} outside document ({} lines)",
                first + 1,
                last + 1,
                count
            )));
        }
        let last = last.min(count - 1);
        let end = if last + 1 < count {
            document.line_start(last + 1)
        } else {
            document.len_chars()
        };
        Ok(Self::new(document.line_start(first), end))
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, span: &Span) -> bool {
        span.within(&self.range())
    }
}

/// Which scope to search in, as configured or requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeSpec {
    /// Whole document
    #[default]
    Buffer,
    /// Lines currently visible
    Viewport,
    /// Line under the cursor
    Line,
    /// Blank-line delimited paragraph around the cursor
    Paragraph,
    /// Innermost `{ ... }` block, from the start of the line that opens it
    Block,
    /// Innermost `( ... )` group
    Expression,
    /// Enclosing function (tree-sitter where available, else `Block`)
    Function,
}

impl ScopeSpec {
    pub fn name(&self) -> &'static str {
        match self {
            ScopeSpec::Buffer => "buffer",
            ScopeSpec::Viewport => "viewport",
            ScopeSpec::Line => "line",
            ScopeSpec::Paragraph => "paragraph",
            ScopeSpec::Block => "block",
            ScopeSpec::Expression => "expression",
            ScopeSpec::Function => "function",
        }
    }
}

/// Resolve a scope around the editor's cursor.
///
/// Fails with [`MultiEditError::InvalidScope`] when the unit does not exist
/// at point; callers abort session start in that case.
pub fn resolve(
    document: &Document,
    editor: &EditorState,
    spec: ScopeSpec,
) -> Result<Scope, MultiEditError> {
    let cursor = editor.cursor_offset(document);
    let missing = || MultiEditError::InvalidScope(format!("no {} at point", spec.name()));

    let scope = match spec {
        ScopeSpec::Buffer => Scope::whole(document),
        ScopeSpec::Viewport => {
            let top = editor.viewport.top_line.min(document.line_count() - 1);
            let bottom = editor.viewport.bottom_line().max(top + 1);
            Scope::lines(document, top, bottom - 1)?
        }
        ScopeSpec::Line => {
            let range = document.line_range(document.line_of(cursor));
            Scope::new(range.start, range.end)
        }
        ScopeSpec::Paragraph => paragraph_at(document, cursor).ok_or_else(missing)?,
        ScopeSpec::Block => block_at(document, cursor).ok_or_else(missing)?,
        ScopeSpec::Expression => {
            let (open, close) = enclosing_pair(document, cursor, '(', ')').ok_or_else(missing)?;
            Scope::new(open, close + 1)
        }
        ScopeSpec::Function => syntax::enclosing_function(document, cursor)
            .map(|range| Scope::new(range.start, range.end))
            .or_else(|| block_at(document, cursor))
            .ok_or_else(missing)?,
    };

    tracing::debug!(
        target: "scope",
        scope = spec.name(),
        start = scope.start,
        end = scope.end,
        "resolved"
    );
    Ok(scope)
}

fn paragraph_at(document: &Document, offset: usize) -> Option<Scope> {
    let line = document.line_of(offset);
    if document.is_blank_line(line) {
        return None;
    }
    let mut first = line;
    while first > 0 && !document.is_blank_line(first - 1) {
        first -= 1;
    }
    let mut last = line;
    while last + 1 < document.line_count() && !document.is_blank_line(last + 1) {
        last += 1;
    }
    Some(Scope::new(
        document.line_start(first),
        document.line_range(last).end,
    ))
}

fn block_at(document: &Document, offset: usize) -> Option<Scope> {
    let (open, close) = enclosing_pair(document, offset, '{', '}')?;
    let start = document.line_start(document.line_of(open));
    Some(Scope::new(start, close + 1))
}

/// Offsets of the innermost `open`/`close` pair enclosing `offset`.
/// A cursor on either delimiter belongs to that pair.
fn enclosing_pair(
    document: &Document,
    offset: usize,
    open: char,
    close: char,
) -> Option<(usize, usize)> {
    let rope = &document.buffer;
    let len = rope.len_chars();

    let open_at = if document.char_at(offset) == Some(open) {
        offset
    } else {
        let mut depth = 0usize;
        let mut found = None;
        for i in (0..offset.min(len)).rev() {
            let ch = rope.char(i);
            if ch == close {
                depth += 1;
            } else if ch == open {
                if depth == 0 {
                    found = Some(i);
                    break;
                }
                depth -= 1;
            }
        }
        found?
    };

    let mut depth = 0usize;
    for i in open_at + 1..len {
        let ch = rope.char(i);
        if ch == open {
            depth += 1;
        } else if ch == close {
            if depth == 0 {
                return Some((open_at, i));
            }
            depth -= 1;
        }
    }
    None
}
