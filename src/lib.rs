//! Multiedit - Elm-style match-and-synchronize editing engine
//!
//! This crate finds every occurrence of a word, symbol or selection, turns
//! them into live regions and mirrors an edit made in one region into all of
//! them. Hosts drive it through `update(model, msg)`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod messages;
pub mod model;
pub mod multiedit;
pub mod syntax;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::MultieditConfig;
pub use messages::Msg;
pub use model::AppModel;
pub use multiedit::MultiEditError;
