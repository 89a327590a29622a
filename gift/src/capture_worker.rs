//! Background rasterization for screenshots and photo memories.
//!
//! The UI loop submits snapshots over a channel; a tokio task rasterizes
//! them on the blocking pool and sends the data URLs back. Results are
//! applied to the stores by the UI loop, so the stores are only ever
//! touched from one place.

use std::sync::Arc;

use gift_core::capture::capture_async;
use gift_core::{CaptureError, MemoryPage, Rasterizer, Screen, Snapshot};
use tokio::sync::mpsc;

/// Capacity of the job and result channels.
const CHANNEL_SIZE: usize = 8;

/// Where a finished capture should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget {
    /// An automatic photo memory for `page`.
    Memory {
        page: MemoryPage,
        title: &'static str,
    },
    /// A user-requested screenshot of `page`, saved and exported.
    Screenshot { page: Screen },
}

#[derive(Debug)]
pub struct CaptureJob {
    pub target: CaptureTarget,
    pub snapshot: Snapshot,
}

#[derive(Debug)]
pub struct CaptureDone {
    pub target: CaptureTarget,
    pub result: Result<String, CaptureError>,
}

/// Handle to the capture task.
pub struct CaptureWorker {
    jobs: mpsc::Sender<CaptureJob>,
    results: mpsc::Receiver<CaptureDone>,
}

impl CaptureWorker {
    /// Start the capture task on the current tokio runtime.
    pub fn spawn(rasterizer: Arc<dyn Rasterizer + Send + Sync>) -> Self {
        let (jobs, mut job_rx) = mpsc::channel::<CaptureJob>(CHANNEL_SIZE);
        let (done_tx, results) = mpsc::channel(CHANNEL_SIZE);

        tokio::spawn(async move {
            while let Some(job) = job_rx.recv().await {
                let result = capture_async(Arc::clone(&rasterizer), job.snapshot).await;
                let done = CaptureDone {
                    target: job.target,
                    result,
                };
                if done_tx.send(done).await.is_err() {
                    break;
                }
            }
            tracing::debug!("capture worker stopped");
        });

        Self { jobs, results }
    }

    /// Queue a job. Returns false if the worker is busy or gone.
    pub fn submit(&self, job: CaptureJob) -> bool {
        match self.jobs.try_send(job) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("capture job dropped: {e}");
                false
            }
        }
    }

    /// A finished capture, if one is waiting.
    pub fn try_recv(&mut self) -> Option<CaptureDone> {
        self.results.try_recv().ok()
    }

    /// Wait for the next finished capture.
    #[cfg(test)]
    pub async fn recv(&mut self) -> Option<CaptureDone> {
        self.results.recv().await
    }
}
