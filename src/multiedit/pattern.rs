//! Pattern derivation - turning a seed into something to search for

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use super::error::MultiEditError;
use super::region::Span;
use crate::config::MultieditConfig;
use crate::model::Document;
use crate::util::{is_blank, is_punctuation, is_symbol_char, is_word_char};

/// Which characters count as "inside a word" for anchor checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constituent {
    Word,
    Symbol,
}

impl Constituent {
    pub fn includes(self, ch: char) -> bool {
        match self {
            Constituent::Word => is_word_char(ch),
            Constituent::Symbol => is_symbol_char(ch),
        }
    }
}

/// Where a pattern's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    /// Explicit (visual) selection, used verbatim
    Selection,
    Whitespace,
    Punctuation,
    Symbol,
    Word,
    /// Ex-style regular expression
    Regexp,
}

/// What to derive a pattern from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// Explicit char range; an empty range falls back to the point
    Selection(Range<usize>),
    /// Char offset of the cursor
    Point(usize),
}

/// Derivation policy, taken from the user configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveOptions {
    pub match_whitespace: bool,
    pub match_punctuation: bool,
    pub use_symbols: bool,
    pub smart_boundaries: bool,
    pub case_sensitive: bool,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self::from(&MultieditConfig::default())
    }
}

impl From<&MultieditConfig> for DeriveOptions {
    fn from(config: &MultieditConfig) -> Self {
        Self {
            match_whitespace: config.match_whitespace,
            match_punctuation: config.match_punctuation,
            use_symbols: config.use_symbols,
            smart_boundaries: config.smart_match_boundaries,
            case_sensitive: config.case_sensitive,
        }
    }
}

/// A search pattern, derived once per session activation.
///
/// Anchors require the match to sit on a boundary: the char before (for
/// `anchor_start`) or after (for `anchor_end`) must not be a constituent.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub literal_text: String,
    pub anchor_start: bool,
    pub anchor_end: bool,
    pub kind: SeedKind,
    constituent: Constituent,
    regex: Regex,
}

impl Pattern {
    /// Pattern matching `text` literally
    pub fn literal(
        text: &str,
        kind: SeedKind,
        anchors: (bool, bool),
        constituent: Constituent,
        case_sensitive: bool,
    ) -> Result<Self, MultiEditError> {
        if text.is_empty() {
            return Err(MultiEditError::NoMatchable);
        }
        let regex = build_regex(&regex::escape(text), case_sensitive)?;
        Ok(Self {
            literal_text: text.to_string(),
            anchor_start: anchors.0,
            anchor_end: anchors.1,
            kind,
            constituent,
            regex,
        })
    }

    /// Pattern from a user-supplied regular expression (never anchored)
    pub fn regexp(source: &str, case_sensitive: bool) -> Result<Self, MultiEditError> {
        if source.is_empty() {
            return Err(MultiEditError::NoMatchable);
        }
        let regex = build_regex(source, case_sensitive)?;
        Ok(Self {
            literal_text: source.to_string(),
            anchor_start: false,
            anchor_end: false,
            kind: SeedKind::Regexp,
            constituent: Constituent::Word,
            regex,
        })
    }

    /// Whether this pattern only ever matches blanks (subject to the indent policy)
    pub fn is_whitespace(&self) -> bool {
        self.kind != SeedKind::Regexp && self.literal_text.chars().all(is_blank)
    }

    /// Regex source suitable for the host's search history
    pub fn search_pattern(&self) -> String {
        if self.kind == SeedKind::Regexp {
            return self.literal_text.clone();
        }
        let mut out = String::new();
        if self.anchor_start {
            out.push_str(r"\b");
        }
        out.push_str(&regex::escape(&self.literal_text));
        if self.anchor_end {
            out.push_str(r"\b");
        }
        out
    }

    /// Whether a raw match at `[start, end)` satisfies the anchors
    pub fn accepts(&self, document: &Document, start: usize, end: usize) -> bool {
        if self.anchor_start {
            if let Some(ch) = document.char_before(start) {
                if self.constituent.includes(ch) {
                    return false;
                }
            }
        }
        if self.anchor_end {
            if let Some(ch) = document.char_at(end) {
                if self.constituent.includes(ch) {
                    return false;
                }
            }
        }
        true
    }

    /// Every non-overlapping anchored match inside `range`, in position order
    pub fn find_all(&self, document: &Document, range: Range<usize>) -> Vec<Span> {
        document
            .find_matches(&self.regex, range, |start, end| {
                self.accepts(document, start, end)
            })
            .into_iter()
            .map(|(start, end)| Span::new(start, end))
            .collect()
    }

    /// The match inside `range` whose text covers `pos`
    pub fn match_covering(
        &self,
        document: &Document,
        pos: usize,
        range: Range<usize>,
    ) -> Option<Span> {
        self.find_all(document, range)
            .into_iter()
            .find(|span| span.contains(pos))
    }
}

fn build_regex(source: &str, case_sensitive: bool) -> Result<Regex, MultiEditError> {
    RegexBuilder::new(source)
        .case_insensitive(!case_sensitive)
        .multi_line(true)
        .build()
        .map_err(|e| MultiEditError::InvalidPattern(e.to_string()))
}

/// Derive a pattern and the initial region span from a seed.
///
/// Without an explicit selection the rules apply in order: whitespace run,
/// punctuation run, symbol, word. Word and symbol seeds are anchored; with
/// smart boundaries each anchor is only kept when the char next to the seed
/// is not alphanumeric.
pub fn derive(
    document: &Document,
    seed: Seed,
    options: &DeriveOptions,
) -> Result<(Pattern, Span), MultiEditError> {
    let pos = match seed {
        Seed::Selection(range) if range.start < range.end => {
            let text = document.slice(range.clone());
            let pattern = Pattern::literal(
                &text,
                SeedKind::Selection,
                (false, false),
                Constituent::Word,
                options.case_sensitive,
            )?;
            return Ok((pattern, Span::from(range)));
        }
        Seed::Selection(range) => range.start,
        Seed::Point(pos) => pos,
    };

    let under = document.char_at(pos);

    if options.match_whitespace && under.is_some_and(is_blank) {
        return derive_run(document, pos, is_blank, SeedKind::Whitespace, options);
    }
    if options.match_punctuation && under.is_some_and(is_punctuation) {
        return derive_run(document, pos, is_punctuation, SeedKind::Punctuation, options);
    }

    let (kind, constituent) = if options.use_symbols {
        (SeedKind::Symbol, Constituent::Symbol)
    } else {
        (SeedKind::Word, Constituent::Word)
    };
    let run = document
        .run_at(pos, |ch| constituent.includes(ch))
        .ok_or(MultiEditError::NoMatchable)?;

    let anchors = if options.smart_boundaries {
        (
            document
                .char_before(run.start)
                .map_or(true, |ch| !ch.is_alphanumeric()),
            document
                .char_at(run.end)
                .map_or(true, |ch| !ch.is_alphanumeric()),
        )
    } else {
        (true, true)
    };

    let text = document.slice(run.clone());
    let pattern = Pattern::literal(&text, kind, anchors, constituent, options.case_sensitive)?;
    tracing::debug!(
        target: "session",
        text = %pattern.literal_text,
        ?kind,
        anchor_start = pattern.anchor_start,
        anchor_end = pattern.anchor_end,
        "derived pattern"
    );
    Ok((pattern, Span::from(run)))
}

fn derive_run(
    document: &Document,
    pos: usize,
    pred: fn(char) -> bool,
    kind: SeedKind,
    options: &DeriveOptions,
) -> Result<(Pattern, Span), MultiEditError> {
    let run = document.run_at(pos, pred).ok_or(MultiEditError::NoMatchable)?;
    let text = document.slice(run.clone());
    let pattern = Pattern::literal(
        &text,
        kind,
        (false, false),
        Constituent::Word,
        options.case_sensitive,
    )?;
    Ok((pattern, Span::from(run)))
}
