//! Utility modules

pub mod text;

pub use text::{is_blank, is_punctuation, is_symbol_char, is_word_char};
