//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host should perform after an update.

/// Side effects returned to the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw (regions, markers or text changed)
    Redraw,
    /// Show a transient status message
    ShowMessage(String),
    /// Push a regex onto the host's search history
    PushSearchHistory(String),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, flattening away `None`
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| *c != Cmd::None).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Status message command
    pub fn message(text: impl Into<String>) -> Self {
        Cmd::ShowMessage(text.into())
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::ShowMessage(_) => true,
            Cmd::PushSearchHistory(_) => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Every status message in this command, in order
    pub fn messages(&self) -> Vec<&str> {
        match self {
            Cmd::ShowMessage(text) => vec![text.as_str()],
            Cmd::Batch(cmds) => cmds.iter().flat_map(Cmd::messages).collect(),
            _ => Vec::new(),
        }
    }
}
