//! Scripted in-memory backend for exercising the pipeline in tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{DriveError, Result};
use crate::fs::{FileSystemNode, NodeKind};
use crate::remote::{NetworkHandle, RemoteFolder, RemoteStorage, UserDetails};

/// One recorded backend call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RemoteCall {
    Prepare,
    CreateFolder { name: String, parent_id: String },
    UploadFile { name: String, parent_id: String },
}

/// Backend double that records every call and can be scripted to fail.
///
/// Unscripted folder creations succeed with generated ids; unscripted
/// uploads succeed and report the file's size.
#[derive(Debug, Default)]
pub(crate) struct MockRemote {
    calls: Mutex<Vec<RemoteCall>>,
    folder_scripts: Mutex<HashMap<String, VecDeque<Result<RemoteFolder>>>>,
    folder_ids: Mutex<HashMap<String, String>>,
    failing_uploads: Mutex<HashSet<String>>,
    upload_delay: Mutex<Option<Duration>>,
    next_id: AtomicU64,
    inflight: AtomicUsize,
    max_inflight: AtomicUsize,
    last_create_at: Mutex<Option<tokio::time::Instant>>,
    first_upload_at: Mutex<Option<tokio::time::Instant>>,
}

impl MockRemote {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue the next result for `create_folder` calls naming `name`.
    pub(crate) fn push_folder_result(&self, name: &str, result: Result<RemoteFolder>) {
        self.folder_scripts
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(result);
    }

    /// Make uploads of files named `name` fail.
    pub(crate) fn fail_upload(&self, name: &str) {
        self.failing_uploads.lock().unwrap().insert(name.to_string());
    }

    /// Make every upload hold its worker slot for `delay`.
    pub(crate) fn set_upload_delay(&self, delay: Duration) {
        *self.upload_delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Parent ids of recorded uploads, in arrival order.
    pub(crate) fn upload_parents(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RemoteCall::UploadFile { parent_id, .. } => Some(parent_id),
                _ => None,
            })
            .collect()
    }

    /// The id handed out for a successfully created folder name.
    pub(crate) fn folder_id_for(&self, name: &str) -> Option<String> {
        self.folder_ids.lock().unwrap().get(name).cloned()
    }

    /// Highest number of uploads observed in flight at once.
    pub(crate) fn max_inflight(&self) -> usize {
        self.max_inflight.load(Ordering::SeqCst)
    }

    pub(crate) fn last_create_at(&self) -> Option<tokio::time::Instant> {
        *self.last_create_at.lock().unwrap()
    }

    pub(crate) fn first_upload_at(&self) -> Option<tokio::time::Instant> {
        *self.first_upload_at.lock().unwrap()
    }
}

#[async_trait]
impl RemoteStorage for MockRemote {
    async fn prepare(&self, _user: &UserDetails) -> Result<NetworkHandle> {
        self.calls.lock().unwrap().push(RemoteCall::Prepare);
        Ok(NetworkHandle::new("mock-session"))
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<RemoteFolder> {
        self.calls.lock().unwrap().push(RemoteCall::CreateFolder {
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        });
        *self.last_create_at.lock().unwrap() = Some(tokio::time::Instant::now());

        if let Some(result) = self
            .folder_scripts
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(VecDeque::pop_front)
        {
            if let Ok(folder) = &result {
                self.folder_ids
                    .lock()
                    .unwrap()
                    .insert(name.to_string(), folder.id.clone());
            }
            return result;
        }

        let id = format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.folder_ids
            .lock()
            .unwrap()
            .insert(name.to_string(), id.clone());
        Ok(RemoteFolder { id })
    }

    async fn upload_file(
        &self,
        _handle: &NetworkHandle,
        file: &FileSystemNode,
        parent_id: &str,
    ) -> Result<u64> {
        self.calls.lock().unwrap().push(RemoteCall::UploadFile {
            name: file.name.clone(),
            parent_id: parent_id.to_string(),
        });
        // Guard must leave scope before the await below or the future is not Send.
        {
            let mut first = self.first_upload_at.lock().unwrap();
            if first.is_none() {
                *first = Some(tokio::time::Instant::now());
            }
        }

        let current = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_inflight.fetch_max(current, Ordering::SeqCst);
        let delay = *self.upload_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inflight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_uploads.lock().unwrap().contains(&file.name) {
            return Err(DriveError::Remote(format!("upload failed: {}", file.name)));
        }
        Ok(file.size)
    }
}

/// Build a folder node from a relative path.
pub(crate) fn folder_node(rel: &str) -> FileSystemNode {
    let rel = PathBuf::from(rel);
    FileSystemNode {
        kind: NodeKind::Folder,
        name: rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: 0,
        absolute_path: PathBuf::from("/local").join(&rel),
        relative_path: rel,
    }
}

/// Build a file node from a relative path and size.
pub(crate) fn file_node(rel: &str, size: u64) -> FileSystemNode {
    let rel = PathBuf::from(rel);
    FileSystemNode {
        kind: NodeKind::File,
        name: rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size,
        absolute_path: PathBuf::from("/local").join(&rel),
        relative_path: rel,
    }
}
