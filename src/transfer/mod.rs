//! Remote-side transfer operations: folder materialization, concurrent file
//! uploads, and the orchestration facade that composes them.

pub mod files;
pub mod folders;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod mock;

pub use files::{FileFailure, FileUploader, UploadOutcome};
pub use folders::{FolderMap, FolderMaterializer};
pub use orchestrator::{UploadOptions, UploadOrchestrator, UploadSummary};
