//! Concurrent file uploads into materialized remote folders.

use std::path::PathBuf;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::warn;

use crate::cancel::CancellationToken;
use crate::error::{DriveError, Result};
use crate::fs::FileSystemNode;
use crate::progress::ProgressReporter;
use crate::remote::{NetworkHandle, RemoteStorage};
use crate::transfer::folders::FolderMap;

/// One file that could not be uploaded.
#[derive(Debug)]
pub struct FileFailure {
    /// The file's hierarchy key.
    pub relative_path: PathBuf,
    /// What went wrong.
    pub error: DriveError,
}

/// Aggregate outcome of the file phase.
#[derive(Debug, Default)]
pub struct UploadOutcome {
    /// Sum of bytes successfully transferred.
    pub bytes_uploaded: u64,
    /// Number of files successfully transferred.
    pub files_uploaded: u64,
    /// Per-file failures; siblings of a failed file still upload.
    pub failures: Vec<FileFailure>,
}

/// Worker-pool file uploader.
///
/// Files have no required relative order, so uploads run through a bounded
/// pool sized to respect backend rate limits while keeping throughput up.
#[derive(Debug, Clone)]
pub struct FileUploader {
    workers: usize,
    remote_timeout: Duration,
}

impl FileUploader {
    /// Create an uploader with the given worker bound (clamped to 1-16) and
    /// per-call timeout.
    pub fn new(workers: usize, remote_timeout: Duration) -> Self {
        Self {
            workers: workers.clamp(1, 16),
            remote_timeout,
        }
    }

    /// Upload every file node into its resolved remote parent folder.
    ///
    /// A file whose parent folder was never created is skipped and recorded
    /// as a failure, consistent with its skipped ancestor. Individual upload
    /// failures are recorded without aborting sibling uploads.
    pub async fn upload_files(
        &self,
        remote: &dyn RemoteStorage,
        handle: &NetworkHandle,
        files: &[FileSystemNode],
        map: &FolderMap,
        destination_root_id: &str,
        progress: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<UploadOutcome> {
        let mut outcome = UploadOutcome::default();

        let mut results = stream::iter(files)
            .map(|file| {
                let parent_id = map
                    .resolve_parent(&file.relative_path, destination_root_id)
                    .map(str::to_string);
                let cancel = cancel.clone();
                async move {
                    if cancel.is_cancelled() {
                        return (file, Err(DriveError::Cancelled));
                    }
                    let Some(parent_id) = parent_id else {
                        return (
                            file,
                            Err(DriveError::ParentNotResolved(file.relative_path.clone())),
                        );
                    };
                    let result = match timeout(
                        self.remote_timeout,
                        remote.upload_file(handle, file, &parent_id),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(DriveError::RemoteTimeout(self.remote_timeout)),
                    };
                    (file, result)
                }
            })
            .buffer_unordered(self.workers);

        while let Some((file, result)) = results.next().await {
            match result {
                Ok(bytes) => {
                    outcome.bytes_uploaded += bytes;
                    outcome.files_uploaded += 1;
                    progress.record(1, file.size);
                }
                Err(DriveError::Cancelled) => {}
                Err(err) => {
                    warn!(
                        file = %file.relative_path.display(),
                        error = %err,
                        "file upload failed"
                    );
                    outcome.failures.push(FileFailure {
                        relative_path: file.relative_path.clone(),
                        error: err,
                    });
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(DriveError::Cancelled);
        }
        Ok(outcome)
    }
}
