//! Commands returned by the update loop
//!
//! Commands describe side effects the runtime performs after a state
//! change: persisting, timers, renders and view refreshes.

/// Side effects requested by `update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command
    #[default]
    None,
    /// Refresh the status line
    Redraw,
    /// Write the buffer snapshot to the session store
    PersistSession { text: String },
    /// Start debounce timer for rendering
    /// After delay_ms, sends Msg::Render(Ready)
    DebouncedRender { revision: u64, delay_ms: u64 },
    /// Hand a render job to the worker
    /// Sends Msg::Render(Completed) when done
    RunRender { revision: u64, source: String },
    /// Put the session's current markup into the tree panel
    ReplaceMarkup,
    /// Bring widget decorations and panel marks in line with the session
    SyncDecorations,
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, flattening `None`s away
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| *c != Cmd::None).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Iterate this command and everything nested in batches
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            Cmd::None => Vec::new(),
            cmd => vec![cmd],
        }
    }
}

impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}
