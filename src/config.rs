//! Tunables for the upload pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for one [`UploadOrchestrator`](crate::UploadOrchestrator).
///
/// Every timing knob the pipeline uses is collected here so an embedding
/// application can load it from its own configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Number of concurrent file-upload workers (1-16).
    pub workers: usize,
    /// Waits between folder-creation attempts, one entry per retry.
    /// The schedule length is the retry budget.
    pub retry_delays: Vec<Duration>,
    /// Pause between folder materialization and the first file upload,
    /// giving the backend's folder index time to converge.
    pub settle_delay: Duration,
    /// Upper bound on any single remote call, independent of retries.
    pub remote_timeout: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            retry_delays: vec![Duration::from_secs(1), Duration::from_secs(3)],
            settle_delay: Duration::from_millis(500),
            remote_timeout: Duration::from_secs(60),
        }
    }
}

impl UploadConfig {
    /// Set the number of concurrent upload workers, clamped to 1-16.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, 16);
        self
    }

    /// Replace the folder-creation retry schedule.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    /// Set the settle delay between the folder and file phases.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the per-remote-call timeout.
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Number of additional attempts after the first failure.
    pub fn max_retries(&self) -> usize {
        self.retry_delays.len()
    }
}
