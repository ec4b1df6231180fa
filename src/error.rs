//! Error types for the drivelib library.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for drivelib operations.
#[derive(Error, Debug)]
pub enum DriveError {
    /// The scan root does not exist or is not a directory.
    #[error("invalid scan root {}: {source}", path.display())]
    ScanRootInvalid {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The remote backend reported that a folder with this name already
    /// exists under the requested parent.
    #[error("remote folder already exists: {0}")]
    FolderExists(String),

    /// No remote parent folder could be resolved for this relative path,
    /// usually because an ancestor folder was skipped.
    #[error("no remote parent folder for {}", .0.display())]
    ParentNotResolved(PathBuf),

    /// A remote call did not complete within the configured bound.
    #[error("remote call timed out after {0:?}")]
    RemoteTimeout(Duration),

    /// Generic remote backend failure.
    #[error("remote error: {0}")]
    Remote(String),

    /// Folder materialization finished without creating a single folder,
    /// so no file has a valid destination.
    #[error("no remote folders could be created")]
    NoFoldersCreated,

    /// The operation was cancelled by the caller.
    #[error("upload cancelled")]
    Cancelled,
}

/// Result type alias for drivelib operations.
pub type Result<T> = std::result::Result<T, DriveError>;
