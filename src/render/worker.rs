//! Render worker thread
//!
//! Owns the renderer and serves jobs in submission order. There is no way
//! to cancel a job once submitted; the update loop discards results it no
//! longer wants. A panicking renderer fails the job, not the worker.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::{CstRenderer, RenderError};
use crate::messages::{Msg, RenderMsg};

/// One render request
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub revision: u64,
    pub source: String,
}

pub struct RenderWorker {
    jobs: Option<Sender<RenderJob>>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    /// Start the worker; results are posted to `results` as `Msg::Render`
    pub fn spawn(
        mut renderer: Box<dyn CstRenderer>,
        results: Sender<Msg>,
    ) -> std::io::Result<Self> {
        let (jobs_tx, jobs_rx) = mpsc::channel::<RenderJob>();
        let handle = thread::Builder::new()
            .name("cst-render".to_string())
            .spawn(move || {
                for job in jobs_rx {
                    let started = Instant::now();
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        renderer.render(&job.source)
                    }))
                    .unwrap_or_else(|payload| {
                        let reason = panic_message(payload.as_ref());
                        tracing::error!("Renderer panicked on rev={}: {}", job.revision, reason);
                        Err(RenderError::Backend(format!("renderer panicked: {}", reason)))
                    });
                    tracing::debug!(
                        "Render rev={} finished in {:?} (ok={})",
                        job.revision,
                        started.elapsed(),
                        result.is_ok()
                    );
                    let msg = Msg::Render(RenderMsg::Completed {
                        revision: job.revision,
                        result,
                    });
                    if results.send(msg).is_err() {
                        break;
                    }
                }
                tracing::debug!("Render worker stopped");
            })?;

        Ok(Self {
            jobs: Some(jobs_tx),
            handle: Some(handle),
        })
    }

    /// Queue a job; returns it back if the worker has stopped
    pub fn submit(&self, job: RenderJob) -> Result<(), RenderJob> {
        match &self.jobs {
            Some(tx) => tx.send(job).map_err(|e| e.0),
            None => Err(job),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Render worker panicked");
            }
        }
    }
}
