//! Language identification and detection
//!
//! Maps file extensions to language IDs and to the tree-sitter grammar used
//! for syntactic scope lookup.

use std::path::Path;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    Rust,
    JavaScript,
    Python,
}

impl LanguageId {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => LanguageId::Rust,
            "js" | "mjs" | "cjs" | "jsx" => LanguageId::JavaScript,
            "py" | "pyi" => LanguageId::Python,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Rust => "Rust",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::Python => "Python",
        }
    }

    /// Tree-sitter grammar, if the language has one
    pub fn ts_language(&self) -> Option<tree_sitter::Language> {
        match self {
            LanguageId::PlainText => None,
            LanguageId::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
            LanguageId::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            LanguageId::Python => Some(tree_sitter_python::LANGUAGE.into()),
        }
    }

    /// Node kinds that count as a "function" scope unit
    pub fn function_kinds(&self) -> &'static [&'static str] {
        match self {
            LanguageId::PlainText => &[],
            LanguageId::Rust => &["function_item"],
            LanguageId::JavaScript => &[
                "function_declaration",
                "function_expression",
                "generator_function_declaration",
                "arrow_function",
                "method_definition",
            ],
            LanguageId::Python => &["function_definition"],
        }
    }
}
