//! Tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging region
//! discovery, synchronized edits and session transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=occurrences=trace,session=debug` - scoped filtering
//! - `RUST_LOG=multiedit::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/multiedit/logs/multiedit.log` with daily
//! rotation. File logging uses debug level by default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::multiedit::{Session, SessionState};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes to
/// `~/.config/multiedit/logs/multiedit.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr so stdout stays clean for output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "multiedit.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of session state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSnapshot {
    pub state: SessionState,
    pub current: Option<u64>,
    pub markers_visible: bool,
    pub regions: Vec<RegionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    pub id: u64,
    pub start: usize,
    pub end: usize,
}

impl RegionSnapshot {
    pub fn from_session(session: &Session) -> Self {
        Self {
            state: session.state(),
            current: session.current().map(|r| r.id.0),
            markers_visible: session.markers_visible(),
            regions: session
                .regions()
                .iter()
                .map(|r| RegionInfo {
                    id: r.id.0,
                    start: r.start(),
                    end: r.end(),
                })
                .collect(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &RegionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.state != other.state {
            changes.push(format!("state: {:?} → {:?}", self.state, other.state));
        }
        if self.regions.len() != other.regions.len() {
            changes.push(format!(
                "region count: {} → {}",
                self.regions.len(),
                other.regions.len()
            ));
        } else {
            for (before, after) in self.regions.iter().zip(&other.regions) {
                if before != after {
                    changes.push(format!(
                        "#{}: {}..{} → #{}: {}..{}",
                        before.id, before.start, before.end, after.id, after.start, after.end
                    ));
                }
            }
        }
        if self.current != other.current {
            changes.push(format!("current: {:?} → {:?}", self.current, other.current));
        }
        if self.markers_visible != other.markers_visible {
            let status = if other.markers_visible { "shown" } else { "hidden" };
            changes.push(format!("markers {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;
    use crate::multiedit::{DeriveOptions, Scope, Seed};

    #[test]
    fn test_diff_reports_start_and_growth() {
        let mut doc = Document::with_text("foo foo");
        let mut session = Session::default();
        let idle = RegionSnapshot::from_session(&session);
        assert_eq!(idle.diff(&idle.clone()), None);

        session
            .start_all(&doc, Seed::Point(0), Scope::whole(&doc), &DeriveOptions::default(), false)
            .unwrap();
        let started = RegionSnapshot::from_session(&session);
        let diff = idle.diff(&started).unwrap();
        assert!(diff.contains("state: Inactive → Active"));
        assert!(diff.contains("region count: 0 → 2"));

        session.edit(&mut doc, 3..3, "d").unwrap();
        let typed = RegionSnapshot::from_session(&session);
        let diff = started.diff(&typed).unwrap();
        assert!(diff.contains("0..3 → #1: 0..4"), "{}", diff);
    }
}
