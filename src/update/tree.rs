//! Rendered tree message handlers

use crate::commands::Cmd;
use crate::messages::TreeMsg;
use crate::model::Session;
use crate::translator::NodeId;

pub fn update_tree(session: &mut Session, msg: TreeMsg) -> Option<Cmd> {
    match msg {
        TreeMsg::NodeClicked { element_id } => {
            // A click from an older markup, or on a non-node element, misses
            let range = NodeId::from_element_id(&element_id)
                .and_then(|id| session.lookup.range_of(id));
            tracing::debug!("Node click {} resolves to {:?}", element_id, range);
            session.highlight.highlight_range(range);
            Some(Cmd::SyncDecorations)
        }
    }
}
