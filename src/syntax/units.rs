//! Syntactic unit lookup backed by tree-sitter

use std::ops::Range;

use tree_sitter::Parser;

use crate::model::Document;

/// Char range of the innermost function node enclosing `offset`.
///
/// Returns `None` for languages without a grammar, when parsing fails, or
/// when no function node contains the offset.
pub fn enclosing_function(doc: &Document, offset: usize) -> Option<Range<usize>> {
    let ts_lang = doc.language.ts_language()?;
    let kinds = doc.language.function_kinds();

    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&ts_lang) {
        tracing::warn!(
            "Failed to set {} grammar: {}",
            doc.language.display_name(),
            e
        );
        return None;
    }

    let source = doc.text();
    let tree = parser.parse(&source, None)?;
    let byte = doc.buffer.char_to_byte(offset.min(doc.len_chars()));

    let mut node = tree.root_node().descendant_for_byte_range(byte, byte)?;
    loop {
        if kinds.contains(&node.kind()) {
            let start = doc.buffer.byte_to_char(node.start_byte());
            let end = doc.buffer.byte_to_char(node.end_byte());
            tracing::debug!(target: "scope", kind = node.kind(), start, end, "function unit");
            return Some(start..end);
        }
        node = node.parent()?;
    }
}
