//! Session persistence message handlers

use crate::commands::Cmd;
use crate::messages::SessionMsg;
use crate::model::Session;

pub fn update_session(session: &mut Session, msg: SessionMsg) -> Option<Cmd> {
    match msg {
        SessionMsg::PersistFailed { reason } => {
            if session.persistence_degraded {
                tracing::debug!("Session still not persisted: {}", reason);
                return None;
            }
            tracing::warn!(
                "Session storage unavailable, continuing in memory: {}",
                reason
            );
            session.persistence_degraded = true;
            session.set_status_message(format!("Session not saved: {}", reason));
            Some(Cmd::Redraw)
        }
    }
}
