//! Render scheduling handlers
//!
//! Keeps at most one render in flight and applies only the result of the
//! most recently issued request. Edits inside the debounce window collapse
//! to the last one; edits during a render collapse to one follow-up.

use std::sync::Arc;

use crate::commands::Cmd;
use crate::messages::RenderMsg;
use crate::model::{Session, SyncState};

/// Handle render-related messages
pub fn update_render(session: &mut Session, msg: RenderMsg) -> Option<Cmd> {
    match msg {
        RenderMsg::Ready { revision } => {
            // Skip if the document has been edited since the debounce started
            if session.document.revision() != revision {
                tracing::debug!(
                    "Skipping superseded render request: doc revision {} != request revision {}",
                    session.document.revision(),
                    revision
                );
                return None;
            }

            if session.render.last_issued == Some(revision) {
                tracing::debug!("Revision {} already issued, skipping", revision);
                return None;
            }

            if let Some(in_flight) = session.render.in_flight {
                tracing::debug!(
                    "Render rev={} in flight, queueing rev={}",
                    in_flight,
                    revision
                );
                session.render.pending = Some(revision);
                return None;
            }

            Some(issue_render(session))
        }

        RenderMsg::Completed { revision, result } => {
            if session.render.in_flight == Some(revision) {
                session.render.in_flight = None;
            }

            if session.render.last_issued != Some(revision) {
                tracing::debug!(
                    "Discarding stale render result rev={} (last issued {:?})",
                    revision,
                    session.render.last_issued
                );
                return follow_up(session);
            }

            let applied = match result {
                Ok(output) => {
                    tracing::debug!(
                        "Applied render rev={} ({} nodes)",
                        revision,
                        output.lookup.len()
                    );
                    session.lookup = Arc::new(output.lookup);
                    session.markup = output.markup;
                    session.sync_state = SyncState::Synced;

                    // Identities from the old render mean nothing now
                    let node = session.lookup.node_at(session.cursor);
                    session.highlight.highlight_node(node);

                    Cmd::batch(vec![Cmd::ReplaceMarkup, Cmd::SyncDecorations, Cmd::Redraw])
                }
                Err(err) => {
                    tracing::warn!("Render rev={} failed: {}", revision, err);
                    session.sync_state = SyncState::Error;
                    session.set_status_message(err.to_string());
                    Cmd::Redraw
                }
            };

            Some(Cmd::batch(vec![applied, follow_up(session).into()]))
        }
    }
}

/// Debounced render for the current document revision
///
/// This returns a `Cmd::DebouncedRender` that should be included in the
/// command returned from the edit handler.
pub fn schedule_render(session: &Session) -> Cmd {
    Cmd::DebouncedRender {
        revision: session.document.revision(),
        delay_ms: session.debounce_ms,
    }
}

/// Render the current document right away, bypassing the debounce
///
/// Used for the startup pass. Queues behind an in-flight render like any
/// other request.
pub fn request_render_now(session: &mut Session) -> Cmd {
    if session.render.in_flight.is_some() {
        session.render.pending = Some(session.document.revision());
        return Cmd::None;
    }
    issue_render(session)
}

fn issue_render(session: &mut Session) -> Cmd {
    let revision = session.document.revision();
    session.render.last_issued = Some(revision);
    session.render.in_flight = Some(revision);
    session.render.pending = None;
    session.sync_state = SyncState::Rendering;
    tracing::debug!("Issuing render rev={}", revision);
    Cmd::batch(vec![
        Cmd::RunRender {
            revision,
            source: session.document.text().to_string(),
        },
        Cmd::Redraw,
    ])
}

/// Issue the queued render once the worker is free
fn follow_up(session: &mut Session) -> Option<Cmd> {
    if session.render.in_flight.is_some() {
        return None;
    }
    let pending = session.render.pending?;
    if pending != session.document.revision() {
        // A newer debounce timer will request its own revision
        session.render.pending = None;
        return None;
    }
    Some(issue_render(session))
}
