//! Character classification used for seed extraction and boundary checks

/// Check if a character is a punctuation/symbol boundary (not whitespace)
pub fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '/' | ':'
            | ','
            | '.'
            | '-'
            | '('
            | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | ';'
            | '"'
            | '\''
            | '<'
            | '>'
            | '='
            | '+'
            | '*'
            | '&'
            | '|'
            | '!'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '~'
            | '`'
            | '\\'
            | '?'
    )
}

/// Horizontal whitespace only. Newlines never belong to a whitespace seed.
pub fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Word constituent (alphanumeric, any script)
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

/// Symbol constituent: word characters plus `_`
pub fn is_symbol_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
