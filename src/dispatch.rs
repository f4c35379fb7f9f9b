use crate::error::{ClawsError, Result};
use crate::transcript::OutputSink;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

type Work = Box<dyn FnOnce(&mut dyn OutputSink) -> Result<()> + Send>;

/// A unit of display work, run on the UI loop against the output sink
pub struct Job {
    work: Work,
}

impl Job {
    pub fn run(self, sink: &mut dyn OutputSink) -> Result<()> {
        (self.work)(sink)
    }
}

/// Submission side of the UI dispatch queue. Cheap to clone.
///
/// Jobs submitted from any clone run one at a time, in submission order,
/// on whichever loop owns the matching `DispatchQueue`.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Job>,
    backlog: Arc<Semaphore>,
}

/// Receiving side of the UI dispatch queue, owned by the UI loop
pub struct DispatchQueue {
    rx: mpsc::UnboundedReceiver<Job>,
}

/// Create a dispatch queue. `backlog` bounds how many throttled jobs may be
/// waiting to run before `submit_throttled` suspends.
pub fn channel(backlog: usize) -> (Dispatcher, DispatchQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher {
        tx,
        backlog: Arc::new(Semaphore::new(backlog.max(1))),
    };
    (dispatcher, DispatchQueue { rx })
}

impl Dispatcher {
    /// Queue work from the UI loop itself. Never waits.
    pub fn submit<F>(&self, work: F) -> Result<()>
    where
        F: FnOnce(&mut dyn OutputSink) -> Result<()> + Send + 'static,
    {
        self.tx
            .send(Job {
                work: Box::new(work),
            })
            .map_err(|_| ClawsError::DispatchClosed)
    }

    /// Queue work from a background task, waiting while the backlog is full.
    /// The slot is released once the job has run (or been dropped).
    pub async fn submit_throttled<F>(&self, work: F) -> Result<()>
    where
        F: FnOnce(&mut dyn OutputSink) -> Result<()> + Send + 'static,
    {
        let permit = Arc::clone(&self.backlog)
            .acquire_owned()
            .await
            .map_err(|_| ClawsError::DispatchClosed)?;

        self.submit(move |sink| {
            let _permit = permit;
            work(sink)
        })
    }
}

impl DispatchQueue {
    /// Wait for the next job. `None` once every `Dispatcher` is gone.
    pub async fn recv(&mut self) -> Option<Job> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Job> {
        self.rx.try_recv().ok()
    }

    /// Run every job already queued. Failures are handed back, not retried.
    pub fn run_pending(&mut self, sink: &mut dyn OutputSink) -> Vec<ClawsError> {
        let mut failures = Vec::new();
        while let Some(job) = self.try_recv() {
            if let Err(e) = job.run(sink) {
                tracing::warn!("Dispatched job failed: {}", e);
                failures.push(e);
            }
        }
        failures
    }
}
