use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::config::RectifyConfig;
use crate::error::{GradeError, Result};
use crate::quad::CropQuad;

use super::{rectify, Rectification};

/// Identifies one submitted rectification. Later submissions get larger ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

/// A rectification request sent to the worker thread.
struct RectifyJob {
    id: JobId,
    source: Arc<RgbaImage>,
    quad: CropQuad,
    config: RectifyConfig,
}

/// Result sent from the worker thread back to the caller.
pub struct RectifyOutcome {
    pub job: JobId,
    pub result: Result<Rectification>,
}

/// Runs rectification passes on a dedicated thread so input handling is
/// never blocked. Results arrive in submission order; the caller decides
/// which ones are stale.
pub struct RectifyWorker {
    cmd_tx: Option<mpsc::Sender<RectifyJob>>,
    result_rx: mpsc::Receiver<RectifyOutcome>,
    next_id: u64,
    handle: Option<JoinHandle<()>>,
}

impl RectifyWorker {
    /// Spawn the worker thread.
    pub fn spawn() -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RectifyJob>();
        let (result_tx, result_rx) = mpsc::channel::<RectifyOutcome>();

        let handle = std::thread::Builder::new()
            .name("cardgrade-rectify".into())
            .spawn(move || worker_loop(cmd_rx, result_tx))?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            result_rx,
            next_id: 0,
            handle: Some(handle),
        })
    }

    /// Queue a pass over `source` with the given corners.
    pub fn submit(
        &mut self,
        source: Arc<RgbaImage>,
        quad: CropQuad,
        config: RectifyConfig,
    ) -> Result<JobId> {
        self.next_id += 1;
        let id = JobId(self.next_id);
        let tx = self.cmd_tx.as_ref().ok_or(GradeError::WorkerUnavailable)?;
        tx.send(RectifyJob {
            id,
            source,
            quad,
            config,
        })
        .map_err(|_| GradeError::WorkerUnavailable)?;
        debug!(?id, "queued rectification");
        Ok(id)
    }

    /// Next finished pass, if one is ready.
    pub fn try_recv(&self) -> Option<RectifyOutcome> {
        self.result_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next finished pass.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RectifyOutcome> {
        self.result_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for RectifyWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.cmd_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("rectify worker panicked");
            }
        }
    }
}

fn worker_loop(cmd_rx: mpsc::Receiver<RectifyJob>, result_tx: mpsc::Sender<RectifyOutcome>) {
    while let Ok(job) = cmd_rx.recv() {
        let result = rectify(&job.source, &job.quad, &job.config);
        if result_tx
            .send(RectifyOutcome {
                job: job.id,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}
