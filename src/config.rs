//! Multi-edit configuration persistence
//!
//! Stores user preferences in `~/.config/multiedit/config.yaml`

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::multiedit::ScopeSpec;

/// Matching and session policy that persists across runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultieditConfig {
    /// Seed from a whitespace run when the cursor sits on blanks
    pub match_whitespace: bool,
    /// Seed from a punctuation run when the cursor sits on one
    pub match_punctuation: bool,
    /// Skip whitespace matches lying in indentation or trailing blanks
    pub ignore_indent_and_trailing: bool,
    /// Seed from the symbol (`foo_bar`) rather than the word (`foo`)
    pub use_symbols: bool,
    /// Only anchor a seed on sides where its neighbour is not alphanumeric.
    /// Word and symbol seeds are maximal runs, so their neighbours are never
    /// alphanumeric and both anchors stay on either way.
    pub smart_match_boundaries: bool,
    /// Push the session pattern into the host's search history
    pub store_in_search_history: bool,
    /// Scope used when a start request does not name one
    pub default_scope: ScopeSpec,
    /// Move (and recenter) the cursor onto newly found and navigated regions
    pub follow_matches: bool,
    /// Glyph drawn for visible marker regions
    pub marker_glyph: String,
    pub case_sensitive: bool,
}

impl Default for MultieditConfig {
    fn default() -> Self {
        Self {
            match_whitespace: true,
            match_punctuation: true,
            ignore_indent_and_trailing: true,
            use_symbols: false,
            smart_match_boundaries: true,
            store_in_search_history: false,
            default_scope: ScopeSpec::Buffer,
            follow_matches: true,
            marker_glyph: "|".to_string(),
            case_sensitive: true,
        }
    }
}

impl MultieditConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
