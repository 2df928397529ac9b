//! Update functions for the Elm-style architecture
//!
//! All session state transformations flow through these functions. They
//! never touch the collaborators; side effects are returned as [`Cmd`]s.

mod editor;
pub mod render;
mod session;
mod tree;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::{sync_status_bar, Session};

pub use editor::update_editor;
pub use render::{request_render_now, schedule_render, update_render};
pub use session::update_session;
pub use tree::update_tree;

/// Main update function - dispatches to sub-handlers
pub fn update(session: &mut Session, msg: Msg) -> Option<Cmd> {
    let result = match msg {
        Msg::Editor(m) => update_editor(session, m),
        Msg::Tree(m) => update_tree(session, m),
        Msg::Render(m) => update_render(session, m),
        Msg::Session(m) => update_session(session, m),
    };

    sync_status_bar(session);

    result
}
