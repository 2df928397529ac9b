//! Event router runtime
//!
//! Owns the session and the collaborators, executes the commands `update`
//! returns and drains the message channel one message at a time.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::commands::Cmd;
use crate::config::SyncConfig;
use crate::decoration::DecorationController;
use crate::messages::{Msg, RenderMsg, SessionMsg};
use crate::model::{Session, DEFAULT_SAMPLE};
use crate::render::{CstRenderer, RenderError, RenderJob, RenderWorker};
use crate::session_store::SessionStore;
use crate::update::{request_render_now, update};
use crate::widget::{EditorWidget, TreePanel};

pub struct App<W: EditorWidget, P: TreePanel> {
    session: Session,
    widget: W,
    panel: P,
    decorations: DecorationController,
    store: SessionStore,
    worker: RenderWorker,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Debounce timers started but not yet delivered
    pending_timers: usize,
    shown_status: String,
}

impl<W: EditorWidget, P: TreePanel> App<W, P> {
    /// Seed the buffer and wire the collaborators
    ///
    /// The buffer comes from the saved session when `restore_session` is set
    /// and one exists, otherwise the built-in sample. Call
    /// [`start`](Self::start) before feeding input.
    pub fn new(
        config: &SyncConfig,
        mut widget: W,
        mut panel: P,
        renderer: Box<dyn CstRenderer>,
        store: SessionStore,
    ) -> Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();

        let restored = if config.restore_session {
            store.restore()
        } else {
            tracing::debug!("Session restore disabled");
            None
        };
        widget.set_text(restored.as_deref().unwrap_or(DEFAULT_SAMPLE));

        let mut session = Session::new(widget.get_text(), config);
        session.cursor = widget.cursor_position();
        session.selection = widget.selection_text();

        widget.connect(msg_tx.clone());
        panel.connect(msg_tx.clone());

        let worker =
            RenderWorker::spawn(renderer, msg_tx.clone()).context("Failed to start render worker")?;

        Ok(Self {
            session,
            widget,
            panel,
            decorations: DecorationController::new(
                config.highlight_class.clone(),
                config.node_highlight_class.clone(),
            ),
            store,
            worker,
            msg_tx,
            msg_rx,
            pending_timers: 0,
            shown_status: String::new(),
        })
    }

    /// Render the seeded buffer and wait for the result
    ///
    /// Returns once the first render has been applied (or rejected), so both
    /// views agree before any user input is handled.
    pub fn start(&mut self, timeout: Duration) -> Result<()> {
        let cmd = request_render_now(&mut self.session);
        self.process_cmd(cmd);
        if !self.run_until_idle(timeout) {
            anyhow::bail!("Initial render did not finish within {:?}", timeout);
        }
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Input produced through this handle is picked up by the next pump
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn decorations(&self) -> &DecorationController {
        &self.decorations
    }

    /// Sender for injecting messages from outside the collaborators
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    /// True when no timer, render or queued render is outstanding
    pub fn is_idle(&self) -> bool {
        self.pending_timers == 0 && !self.session.render.is_busy()
    }

    /// Run one message through update and execute the resulting command
    pub fn dispatch(&mut self, msg: Msg) {
        if matches!(msg, Msg::Render(RenderMsg::Ready { .. })) {
            self.pending_timers = self.pending_timers.saturating_sub(1);
        }
        if let Some(cmd) = update(&mut self.session, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Handle every message already in the channel without blocking
    ///
    /// Returns whether any message was handled.
    pub fn process_pending(&mut self) -> bool {
        let mut handled = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            handled = true;
        }
        handled
    }

    /// Pump messages until idle or until `timeout` elapses
    ///
    /// Returns `false` on timeout.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.process_pending();
            if self.is_idle() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => self.dispatch(msg),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!("Gave up waiting for idle after {:?}", timeout);
                    return false;
                }
                // The app holds a sender itself, so this cannot happen
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => self.refresh_status(),
            Cmd::PersistSession { text } => {
                if let Err(e) = self.store.persist(&text) {
                    let _ = self.msg_tx.send(Msg::Session(SessionMsg::PersistFailed {
                        reason: e.to_string(),
                    }));
                }
            }
            Cmd::DebouncedRender { revision, delay_ms } => {
                self.pending_timers += 1;
                let tx = self.msg_tx.clone();
                let msg = Msg::Render(RenderMsg::Ready { revision });
                if delay_ms == 0 {
                    let _ = tx.send(msg);
                } else {
                    std::thread::spawn(move || {
                        std::thread::sleep(Duration::from_millis(delay_ms));
                        let _ = tx.send(msg);
                    });
                }
            }
            Cmd::RunRender { revision, source } => {
                if let Err(job) = self.worker.submit(RenderJob { revision, source }) {
                    tracing::warn!("Render worker unavailable, rev={} not rendered", job.revision);
                    let _ = self.msg_tx.send(Msg::Render(RenderMsg::Completed {
                        revision: job.revision,
                        result: Err(RenderError::Backend("render worker stopped".to_string())),
                    }));
                }
            }
            Cmd::ReplaceMarkup => {
                self.panel.replace_markup(&self.session.markup);
                self.decorations.markup_replaced();
            }
            Cmd::SyncDecorations => {
                self.decorations
                    .sync(&self.session.highlight, &mut self.widget, &mut self.panel);
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    fn refresh_status(&mut self) {
        let line = self.session.status_line();
        if line != self.shown_status {
            self.panel.show_status(&line);
            self.shown_status = line;
        }
    }
}
