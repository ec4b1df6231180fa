//! The upload facade: scan, materialize, upload, summarize.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::cancel::CancellationToken;
use crate::config::UploadConfig;
use crate::error::{DriveError, Result};
use crate::fs::Scanner;
use crate::progress::{ProgressCallback, ProgressReporter};
use crate::remote::{RemoteStorage, UserDetails};
use crate::transfer::files::{FileFailure, FileUploader};
use crate::transfer::folders::FolderMaterializer;

/// Inputs for one [`UploadOrchestrator::upload_folder`] call.
pub struct UploadOptions {
    /// Local directory to upload.
    pub local_path: PathBuf,
    /// Remote folder id the tree is recreated under.
    pub destination_folder_id: String,
    /// Credentials for session preparation.
    pub user: UserDetails,
    /// Invoked after each completed unit of work.
    pub on_progress: Option<ProgressCallback>,
    /// Cooperative cancellation flag.
    pub cancel: CancellationToken,
}

/// Final summary of one upload invocation.
#[derive(Debug)]
pub struct UploadSummary {
    /// Sum of bytes successfully uploaded.
    pub total_bytes: u64,
    /// Remote id of the created root folder, empty when it could not be
    /// resolved (e.g. the root folder already existed remotely).
    pub root_folder_id: String,
    /// Elapsed wall-clock time.
    pub upload_time: Duration,
    /// Files that failed to upload; partial remote state is not rolled back.
    pub failures: Vec<FileFailure>,
}

/// Composes scanner, folder materializer, and file uploader into the one
/// public operation: upload a local folder tree to the remote backend.
///
/// Stateless between calls; all per-upload state (scan result, folder map,
/// progress counters) is scoped to a single [`upload_folder`](Self::upload_folder)
/// invocation, so one orchestrator can serve sequential uploads.
pub struct UploadOrchestrator<R: RemoteStorage> {
    remote: Arc<R>,
    scanner: Scanner,
    materializer: FolderMaterializer,
    uploader: FileUploader,
    settle_delay: Duration,
}

impl<R: RemoteStorage> UploadOrchestrator<R> {
    /// Build an orchestrator over a remote backend.
    pub fn new(remote: Arc<R>, config: UploadConfig) -> Self {
        Self {
            remote,
            scanner: Scanner::new(),
            materializer: FolderMaterializer::new(
                config.retry_delays.clone(),
                config.remote_timeout,
            ),
            uploader: FileUploader::new(config.workers, config.remote_timeout),
            settle_delay: config.settle_delay,
        }
    }

    /// Upload the directory tree at `options.local_path`.
    ///
    /// Phases run strictly in order: prepare the session, scan, materialize
    /// folders, wait out the settle delay, upload files. An empty folder map
    /// aborts before any file upload is attempted.
    pub async fn upload_folder(&self, options: UploadOptions) -> Result<UploadSummary> {
        let started = Instant::now();

        let handle = self.remote.prepare(&options.user).await?;

        let scan = self.scanner.scan(&options.local_path, &options.cancel).await?;
        info!(
            folders = scan.folders.len(),
            files = scan.files.len(),
            total_bytes = scan.total_bytes,
            "scan complete"
        );

        let progress = ProgressReporter::new(
            scan.total_items(),
            scan.total_bytes,
            options.on_progress,
        );

        let map = self
            .materializer
            .create_folders(
                self.remote.as_ref(),
                &scan.folders,
                &options.destination_folder_id,
                &progress,
                &options.cancel,
            )
            .await?;
        if map.is_empty() {
            return Err(DriveError::NoFoldersCreated);
        }

        // The backend's folder index needs time to converge before children
        // can be attached; await once, between the phases.
        tokio::time::sleep(self.settle_delay).await;

        let outcome = self
            .uploader
            .upload_files(
                self.remote.as_ref(),
                &handle,
                &scan.files,
                &map,
                &options.destination_folder_id,
                &progress,
                &options.cancel,
            )
            .await?;

        if !outcome.failures.is_empty() {
            warn!(
                failed = outcome.failures.len(),
                uploaded = outcome.files_uploaded,
                "some files failed to upload"
            );
        }

        // The root folder's map key is its base name (relative paths are
        // keyed against the root's parent).
        let root_folder_id = options
            .local_path
            .file_name()
            .map(PathBuf::from)
            .and_then(|key| map.get(&key).map(str::to_string))
            .unwrap_or_default();

        Ok(UploadSummary {
            total_bytes: outcome.bytes_uploaded,
            root_folder_id,
            upload_time: started.elapsed(),
            failures: outcome.failures,
        })
    }
}
