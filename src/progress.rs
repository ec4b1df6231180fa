//! Unified progress reporting across the folder and file phases.

use std::sync::{Mutex, PoisonError};

/// A single progress observation delivered to the caller's callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Blended completion percentage (0-100).
    pub percentage: u8,
    /// Units of work completed so far (folders created + files uploaded).
    pub items_uploaded: u64,
    /// Bytes transferred so far.
    pub bytes_uploaded: u64,
}

/// Type alias for progress callback function.
///
/// The callback runs while the reporter's internal lock is held (that is what
/// serializes events), so it must not call back into the
/// [`ProgressReporter`] that invoked it.
pub type ProgressCallback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

#[derive(Debug, Default)]
struct Counters {
    items_uploaded: u64,
    bytes_uploaded: u64,
}

/// Shared progress counters for one upload invocation.
///
/// Both the folder materializer and the concurrent file-upload workers call
/// [`record`](Self::record); the counters and the callback invocation sit
/// behind one mutex so updates are never lost and events arrive in a
/// monotonically non-decreasing order.
///
/// The reported percentage is an equal-weighted blend of item completion and
/// byte completion, so trees of many small files and trees of a few large
/// files both produce smooth progress.
pub struct ProgressReporter {
    total_items: u64,
    total_bytes: u64,
    counters: Mutex<Counters>,
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    /// Create a reporter with counters initialized to zero.
    pub fn new(total_items: u64, total_bytes: u64, callback: Option<ProgressCallback>) -> Self {
        Self {
            total_items,
            total_bytes,
            counters: Mutex::new(Counters::default()),
            callback,
        }
    }

    /// Record completed work and emit one progress event.
    ///
    /// This is the only mutation entry point for the counters. The callback
    /// fires with the counter lock held; a callback that re-enters this
    /// reporter (via [`record`](Self::record), [`snapshot`](Self::snapshot),
    /// or [`percentage`](Self::percentage)) would deadlock.
    pub fn record(&self, items_delta: u64, bytes_delta: u64) {
        let mut counters = self
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        counters.items_uploaded += items_delta;
        counters.bytes_uploaded += bytes_delta;

        if let Some(callback) = &self.callback {
            let event = ProgressEvent {
                percentage: blended_percentage(
                    counters.items_uploaded,
                    self.total_items,
                    counters.bytes_uploaded,
                    self.total_bytes,
                ),
                items_uploaded: counters.items_uploaded,
                bytes_uploaded: counters.bytes_uploaded,
            };
            callback(&event);
        }
    }

    /// Current `(items_uploaded, bytes_uploaded)` counters.
    pub fn snapshot(&self) -> (u64, u64) {
        let counters = self
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        (counters.items_uploaded, counters.bytes_uploaded)
    }

    /// Current blended percentage (0-100).
    pub fn percentage(&self) -> u8 {
        let (items, bytes) = self.snapshot();
        blended_percentage(items, self.total_items, bytes, self.total_bytes)
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("total_items", &self.total_items)
            .field("total_bytes", &self.total_bytes)
            .finish_non_exhaustive()
    }
}

fn fraction(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    done as f64 / total as f64
}

fn blended_percentage(items: u64, total_items: u64, bytes: u64, total_bytes: u64) -> u8 {
    let blended = fraction(items, total_items) * 0.5 + fraction(bytes, total_bytes) * 0.5;
    (blended * 100.0).floor() as u8
}
