//! Editor message handlers: text edits and cursor movement

use crate::commands::Cmd;
use crate::messages::EditorMsg;
use crate::model::Session;

use super::render::schedule_render;

pub fn update_editor(session: &mut Session, msg: EditorMsg) -> Option<Cmd> {
    match msg {
        EditorMsg::ContentChanged { text } => {
            if !session.document.replace(&text) {
                tracing::trace!("Content unchanged, ignoring edit event");
                return None;
            }
            tracing::debug!(
                "Content changed: rev={} ({} bytes)",
                session.document.revision(),
                text.len()
            );

            // The clicked range pointed into the old text
            let cleared = session.highlight.highlight_range(None);

            Some(Cmd::batch(vec![
                Cmd::PersistSession { text },
                schedule_render(session),
                if cleared { Cmd::SyncDecorations } else { Cmd::None },
                Cmd::Redraw,
            ]))
        }

        EditorMsg::CursorMoved {
            position,
            selection,
        } => {
            session.cursor = position;
            session.selection = selection;

            let node = session.lookup.node_at(position);
            tracing::trace!("Cursor at {} resolves to {:?}", position, node);
            session.highlight.highlight_node(node);

            Some(Cmd::batch(vec![Cmd::SyncDecorations, Cmd::Redraw]))
        }
    }
}
