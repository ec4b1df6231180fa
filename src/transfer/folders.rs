//! Remote folder materialization.
//!
//! Recreates the scanned folder hierarchy on the backend, strictly in
//! scanner order: the scan emits parents before descendants, and each
//! creation needs its parent's remote id already present in the map, so one
//! creation is in flight at a time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::cancel::CancellationToken;
use crate::error::{DriveError, Result};
use crate::fs::FileSystemNode;
use crate::progress::ProgressReporter;
use crate::remote::RemoteStorage;

/// Mapping from a folder's relative path to its remote identifier.
///
/// Built incrementally in hierarchy order by the materializer, read-only once
/// handed to the file uploader. Scoped to a single upload invocation.
#[derive(Debug, Default)]
pub struct FolderMap {
    entries: HashMap<PathBuf, String>,
}

impl FolderMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a created folder.
    pub fn insert(&mut self, relative_path: PathBuf, remote_id: String) {
        self.entries.insert(relative_path, remote_id);
    }

    /// Look up a folder's remote id by its relative path.
    pub fn get(&self, relative_path: &Path) -> Option<&str> {
        self.entries.get(relative_path).map(String::as_str)
    }

    /// Resolve the remote parent id for a node at `relative_path`.
    ///
    /// Top-level entries (no parent directory component) attach to the
    /// destination root; everything else looks up its parent's key. `None`
    /// means the parent was never created and the node must be skipped.
    pub fn resolve_parent<'a>(
        &'a self,
        relative_path: &Path,
        destination_root_id: &'a str,
    ) -> Option<&'a str> {
        match relative_path.parent() {
            None => Some(destination_root_id),
            Some(parent) if parent.as_os_str().is_empty() => Some(destination_root_id),
            Some(parent) => self.get(parent),
        }
    }

    /// Whether no folder was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded folders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// How one folder-creation failure should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryClass {
    /// Transient; retry within the delay schedule.
    Retryable,
    /// The folder already exists remotely; skip without retrying.
    SkipExists,
    /// Never retried; propagate immediately.
    Fatal,
}

impl RetryClass {
    pub(crate) fn classify(err: &DriveError) -> Self {
        match err {
            DriveError::FolderExists(_) => RetryClass::SkipExists,
            DriveError::Cancelled => RetryClass::Fatal,
            _ => RetryClass::Retryable,
        }
    }
}

/// Sequential folder creator with per-folder bounded retry.
#[derive(Debug, Clone)]
pub struct FolderMaterializer {
    retry_delays: Vec<Duration>,
    remote_timeout: Duration,
}

impl FolderMaterializer {
    /// Create a materializer with the given retry schedule and per-call bound.
    pub fn new(retry_delays: Vec<Duration>, remote_timeout: Duration) -> Self {
        Self {
            retry_delays,
            remote_timeout,
        }
    }

    /// Create remote folders for every scanned folder node, in scan order.
    ///
    /// A folder whose parent is missing from the map is skipped (its whole
    /// subtree degrades the same way). An "already exists" conflict is
    /// skipped without retry. Any other failure retries through the delay
    /// schedule, then aborts the remaining materialization.
    pub async fn create_folders(
        &self,
        remote: &dyn RemoteStorage,
        folders: &[FileSystemNode],
        destination_root_id: &str,
        progress: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<FolderMap> {
        let mut map = FolderMap::new();

        for folder in folders {
            if cancel.is_cancelled() {
                return Err(DriveError::Cancelled);
            }

            let parent_id = match map.resolve_parent(&folder.relative_path, destination_root_id) {
                Some(parent_id) => parent_id.to_string(),
                None => {
                    warn!(
                        folder = %folder.relative_path.display(),
                        "skipping folder without a created parent"
                    );
                    continue;
                }
            };

            if let Some(remote_id) = self.create_with_retry(remote, folder, &parent_id).await? {
                map.insert(folder.relative_path.clone(), remote_id);
                progress.record(1, 0);
            }
        }

        Ok(map)
    }

    /// Attempt one folder creation through the retry schedule.
    ///
    /// Returns `Ok(None)` when the folder already exists remotely.
    async fn create_with_retry(
        &self,
        remote: &dyn RemoteStorage,
        folder: &FileSystemNode,
        parent_id: &str,
    ) -> Result<Option<String>> {
        let mut attempt = 0usize;
        loop {
            attempt += 1;

            let result = match timeout(
                self.remote_timeout,
                remote.create_folder(&folder.name, parent_id),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(DriveError::RemoteTimeout(self.remote_timeout)),
            };

            let err = match result {
                Ok(created) => return Ok(Some(created.id)),
                Err(err) => err,
            };

            match RetryClass::classify(&err) {
                RetryClass::SkipExists => {
                    info!(
                        folder = %folder.relative_path.display(),
                        "remote folder already exists, skipping"
                    );
                    return Ok(None);
                }
                RetryClass::Fatal => return Err(err),
                RetryClass::Retryable => {
                    if attempt > self.retry_delays.len() {
                        error!(
                            folder = %folder.relative_path.display(),
                            attempts = attempt,
                            error = %err,
                            "folder creation failed after final attempt"
                        );
                        return Err(err);
                    }
                    warn!(
                        folder = %folder.relative_path.display(),
                        attempt,
                        error = %err,
                        "folder creation failed, retrying"
                    );
                    sleep(self.retry_delays[attempt - 1]).await;
                }
            }
        }
    }
}
