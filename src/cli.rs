//! Command-line argument parsing for the multiedit driver
//!
//! Supports:
//! - Placing the cursor (the seed) at a line/column
//! - Ex-style regexp or literal patterns over an optional line range
//! - Scope selection, bulk replacement and in-place writing

use clap::Parser;
use std::path::PathBuf;

use crate::messages::{Msg, SessionMsg};
use crate::multiedit::ScopeSpec;

/// Edit every occurrence of a word at once
#[derive(Parser, Debug)]
#[command(name = "multiedit", version, about = "Edit every occurrence of a word at once")]
pub struct CliArgs {
    /// File to operate on
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Put the cursor on line N (1-indexed)
    #[arg(long, value_name = "N")]
    pub line: Option<usize>,

    /// Put the cursor on column N (used with --line)
    #[arg(long, value_name = "N")]
    pub column: Option<usize>,

    /// Match this regular expression instead of the text at the cursor
    #[arg(short = 'e', long, value_name = "RE")]
    pub regexp: Option<String>,

    /// Treat --regexp as literal text
    #[arg(short = 'F', long, requires = "regexp")]
    pub literal: bool,

    /// Restrict matching to lines A through B (1-indexed, inclusive)
    #[arg(long, value_name = "A:B", value_parser = parse_line_range)]
    pub lines: Option<(usize, usize)>,

    /// Scope to search in
    #[arg(short = 's', long, value_name = "SCOPE", value_parser = parse_scope)]
    pub scope: Option<ScopeSpec>,

    /// Replace the text of every region
    #[arg(short = 'r', long, value_name = "TEXT")]
    pub replace: Option<String>,

    /// Write the result back to FILE instead of stdout
    #[arg(short = 'i', long, requires = "replace")]
    pub in_place: bool,

    /// Do not remember this session for a later restore
    #[arg(long)]
    pub no_recall: bool,

    /// Read configuration from PATH instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What the driver should do, derived from the arguments
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub file: PathBuf,
    /// Initial cursor position (line, column) - 1-indexed from user, converted to 0-indexed
    pub initial_position: Option<(usize, usize)>,
    /// Message that starts the session
    pub start: Msg,
    pub replace: Option<String>,
    pub in_place: bool,
    pub config_path: Option<PathBuf>,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        if self.scope.is_some() && self.lines.is_some() {
            return Err("--scope and --lines cannot be combined".to_string());
        }

        // Convert from 1-indexed (user input) to 0-indexed (internal)
        let initial_position = self.line.map(|line| {
            let line_0 = line.saturating_sub(1);
            let col_0 = self.column.unwrap_or(1).saturating_sub(1);
            (line_0, col_0)
        });
        let lines = self
            .lines
            .map(|(a, b)| (a.saturating_sub(1), b.saturating_sub(1)));

        let start = if self.regexp.is_some() || lines.is_some() {
            Msg::Session(SessionMsg::ExMatch {
                lines,
                regexp: self.regexp,
                literal: self.literal,
                no_recall: self.no_recall,
            })
        } else {
            Msg::Session(SessionMsg::MatchAll {
                no_recall: self.no_recall,
                scope: self.scope,
            })
        };

        Ok(RunConfig {
            file: self.file,
            initial_position,
            start,
            replace: self.replace,
            in_place: self.in_place,
            config_path: self.config,
        })
    }
}

fn parse_line_range(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected A:B, got '{}'", s))?;
    let a: usize = a.trim().parse().map_err(|_| format!("bad line number '{}'", a))?;
    let b: usize = b.trim().parse().map_err(|_| format!("bad line number '{}'", b))?;
    if a == 0 || b < a {
        return Err(format!("invalid line range {}:{}", a, b));
    }
    Ok((a, b))
}

fn parse_scope(s: &str) -> Result<ScopeSpec, String> {
    match s.to_ascii_lowercase().as_str() {
        "buffer" => Ok(ScopeSpec::Buffer),
        "viewport" => Ok(ScopeSpec::Viewport),
        "line" => Ok(ScopeSpec::Line),
        "paragraph" => Ok(ScopeSpec::Paragraph),
        "block" => Ok(ScopeSpec::Block),
        "expression" => Ok(ScopeSpec::Expression),
        "function" => Ok(ScopeSpec::Function),
        other => Err(format!(
            "unknown scope '{}' (buffer, viewport, line, paragraph, block, expression, function)",
            other
        )),
    }
}
