//! Filesystem inventory types produced by the scanner.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of a scanned filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Regular file
    File,
    /// Folder/directory
    Folder,
}

/// One scanned filesystem entry.
///
/// `relative_path` is relative to the scan root's *parent*, so the root
/// folder's key equals its base name. It is the stable key for hierarchy
/// reconstruction: a node's parent directory component always names another
/// folder node's `relative_path`, except for top-level entries whose parent
/// is the remote destination root.
#[derive(Debug, Clone)]
pub struct FileSystemNode {
    /// Entry kind
    pub kind: NodeKind,
    /// Base name, no directory components
    pub name: String,
    /// Size in bytes (0 for folders)
    pub size: u64,
    /// Resolved local path
    pub absolute_path: PathBuf,
    /// Path relative to the scan root's parent
    pub relative_path: PathBuf,
}

impl FileSystemNode {
    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Aggregate result of one scan.
///
/// Folder nodes are ordered parent-before-descendant; file ordering carries
/// no meaning. Constructed once per upload invocation and immutable
/// thereafter.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Folder nodes, every directory including empty ones.
    pub folders: Vec<FileSystemNode>,
    /// File nodes with size > 0. Zero-byte files are excluded.
    pub files: Vec<FileSystemNode>,
    /// Sum of file sizes only.
    pub total_bytes: u64,
}

impl ScanResult {
    /// Folder count plus file count.
    pub fn total_items(&self) -> u64 {
        (self.folders.len() + self.files.len()) as u64
    }
}
