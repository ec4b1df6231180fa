//! # drivelib
//!
//! Client-side upload orchestration for remote cloud drives.
//!
//! Given a local directory tree and a backend implementing [`RemoteStorage`],
//! drivelib walks the tree, recreates its folder hierarchy remotely
//! (parent-before-child, with per-folder retry and backoff), then uploads the
//! contained files through a bounded worker pool, reporting a single blended
//! progress percentage throughout.
//!
//! ## Features
//!
//! - **Scanning**: concurrent depth-first traversal that tolerates unreadable
//!   entries, skips symlinks and zero-byte files, and totals items and bytes.
//! - **Folder materialization**: sequential parent-first creation with a
//!   configurable retry schedule; remote "already exists" conflicts are
//!   skipped, not retried.
//! - **File transfers**: bounded-concurrency uploads with per-file failure
//!   isolation and per-call timeouts.
//! - **Progress tracking**: one callback fed by both phases, blending item
//!   completion and byte completion 50/50.
//! - **Cancellation**: a cooperative token threaded through every phase.
//!
//! The backend itself (encryption, chunking, wire protocol) is out of scope;
//! it is consumed through the [`RemoteStorage`] trait.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use drivelib::{
//!     CancellationToken, UploadConfig, UploadOptions, UploadOrchestrator, UserDetails,
//! };
//! # use drivelib::{FileSystemNode, NetworkHandle, RemoteFolder, RemoteStorage, Result};
//! # struct MyBackend;
//! # #[async_trait::async_trait]
//! # impl RemoteStorage for MyBackend {
//! #     async fn prepare(&self, _user: &UserDetails) -> Result<NetworkHandle> {
//! #         Ok(NetworkHandle::new("session"))
//! #     }
//! #     async fn create_folder(&self, _name: &str, _parent_id: &str) -> Result<RemoteFolder> {
//! #         Ok(RemoteFolder { id: "folder-id".into() })
//! #     }
//! #     async fn upload_file(
//! #         &self,
//! #         _handle: &NetworkHandle,
//! #         file: &FileSystemNode,
//! #         _parent_id: &str,
//! #     ) -> Result<u64> {
//! #         Ok(file.size)
//! #     }
//! # }
//!
//! # async fn example() -> drivelib::Result<()> {
//! let orchestrator = UploadOrchestrator::new(Arc::new(MyBackend), UploadConfig::default());
//!
//! let summary = orchestrator
//!     .upload_folder(UploadOptions {
//!         local_path: "photos".into(),
//!         destination_folder_id: "root".into(),
//!         user: UserDetails {
//!             email: "user@example.com".into(),
//!             password: "secret".into(),
//!         },
//!         on_progress: Some(Box::new(|event| println!("{}%", event.percentage))),
//!         cancel: CancellationToken::new(),
//!     })
//!     .await?;
//!
//! println!(
//!     "uploaded {} bytes in {:?} (root folder {})",
//!     summary.total_bytes, summary.upload_time, summary.root_folder_id
//! );
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod fs;
pub mod progress;
pub mod remote;
pub mod transfer;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use config::UploadConfig;
pub use error::{DriveError, Result};
pub use fs::{FileSystemNode, NodeKind, ScanResult, Scanner};
pub use progress::{ProgressCallback, ProgressEvent, ProgressReporter};
pub use remote::{NetworkHandle, RemoteFolder, RemoteStorage, UserDetails};
pub use transfer::{
    FileFailure, FileUploader, FolderMap, FolderMaterializer, UploadOptions, UploadOrchestrator,
    UploadOutcome, UploadSummary,
};
