//! The remote storage backend seam.
//!
//! drivelib orchestrates uploads but never speaks the wire protocol itself;
//! the backend (encrypted chunked transfer, folder metadata API) is consumed
//! through [`RemoteStorage`]. Conflict signalling matters: a
//! [`create_folder`](RemoteStorage::create_folder) call for a name that
//! already exists must fail with
//! [`DriveError::FolderExists`](crate::DriveError::FolderExists) so the
//! pipeline can skip it instead of retrying.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fs::FileSystemNode;

/// Login credentials handed to [`RemoteStorage::prepare`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetails {
    pub email: String,
    pub password: String,
}

/// Opaque handle to a prepared network session.
#[derive(Debug, Clone)]
pub struct NetworkHandle {
    token: String,
}

impl NetworkHandle {
    /// Wrap a backend session token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The backend session token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// A folder created on the remote backend.
#[derive(Debug, Clone)]
pub struct RemoteFolder {
    /// Remote identifier, used as `parent_id` for children.
    pub id: String,
}

/// Capabilities the upload pipeline consumes from a storage backend.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Prepare the transfer session (credential/session setup). Called once
    /// per upload invocation, before scanning.
    async fn prepare(&self, user: &UserDetails) -> Result<NetworkHandle>;

    /// Create one remote folder under `parent_id`.
    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<RemoteFolder>;

    /// Transfer one file into the folder identified by `parent_id`,
    /// returning the number of bytes transferred.
    async fn upload_file(
        &self,
        handle: &NetworkHandle,
        file: &FileSystemNode,
        parent_id: &str,
    ) -> Result<u64>;
}
