//! Syntax support for scope resolution
//!
//! - Language detection from file extensions
//! - Tree-sitter lookup of the function enclosing a position, used by the
//!   `function` scope unit

mod languages;
mod units;

pub use languages::LanguageId;
pub use units::enclosing_function;
