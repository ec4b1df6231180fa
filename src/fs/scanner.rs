//! Local directory traversal producing the upload inventory.

use std::path::{Path, PathBuf};

use futures::future::{join_all, BoxFuture, FutureExt};
use tokio::fs;
use tracing::warn;

use crate::cancel::CancellationToken;
use crate::error::{DriveError, Result};
use crate::fs::node::{FileSystemNode, NodeKind, ScanResult};

/// Read-only depth-first directory scanner.
///
/// Stateless; one instance can serve any number of scans. Only a missing or
/// non-directory root is fatal. Unreadable entries are logged and skipped,
/// symlinks are never followed or recorded, and zero-byte files are excluded
/// from the inventory.
#[derive(Debug, Default, Clone)]
pub struct Scanner;

#[derive(Default)]
struct Subtree {
    folders: Vec<FileSystemNode>,
    files: Vec<FileSystemNode>,
    bytes: u64,
}

impl Subtree {
    fn merge(&mut self, other: Subtree) {
        self.folders.extend(other.folders);
        self.files.extend(other.files);
        self.bytes += other.bytes;
    }
}

impl Scanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Walk `root` and build the inventory of folder and file nodes.
    ///
    /// Folder nodes are emitted parent-before-descendant, which is what lets
    /// the folder materializer resolve every parent from paths alone.
    pub async fn scan(&self, root: &Path, cancel: &CancellationToken) -> Result<ScanResult> {
        let root = fs::canonicalize(root)
            .await
            .map_err(|source| DriveError::ScanRootInvalid {
                path: root.to_path_buf(),
                source,
            })?;

        let metadata =
            fs::symlink_metadata(&root)
                .await
                .map_err(|source| DriveError::ScanRootInvalid {
                    path: root.clone(),
                    source,
                })?;
        if !metadata.is_dir() {
            return Err(DriveError::ScanRootInvalid {
                path: root,
                source: std::io::Error::other("not a directory"),
            });
        }

        let relative_root = root
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| DriveError::ScanRootInvalid {
                path: root.clone(),
                source: std::io::Error::other("root has no base name"),
            })?;

        let tree = scan_tree(root, relative_root, cancel.clone()).await;
        if cancel.is_cancelled() {
            return Err(DriveError::Cancelled);
        }

        Ok(ScanResult {
            folders: tree.folders,
            files: tree.files,
            total_bytes: tree.bytes,
        })
    }
}

/// Scan the directory at `abs`, returning its folder node followed by the
/// merged subtrees of its children.
///
/// Children fan out as one future per entry and are joined together; a
/// failing entry contributes nothing and never loses sibling results.
fn scan_tree(
    abs: PathBuf,
    rel: PathBuf,
    cancel: CancellationToken,
) -> BoxFuture<'static, Subtree> {
    async move {
        let mut tree = Subtree::default();
        tree.folders.push(FileSystemNode {
            kind: NodeKind::Folder,
            name: rel
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: 0,
            absolute_path: abs.clone(),
            relative_path: rel.clone(),
        });

        let mut reader = match fs::read_dir(&abs).await {
            Ok(reader) => reader,
            Err(err) => {
                warn!(path = %abs.display(), error = %err, "failed to read directory");
                return tree;
            }
        };

        let mut children: Vec<BoxFuture<'static, Subtree>> = Vec::new();
        loop {
            if cancel.is_cancelled() {
                return tree;
            }
            let entry = match reader.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    warn!(path = %abs.display(), error = %err, "failed to read directory entry");
                    break;
                }
            };

            let child_abs = entry.path();
            let child_rel = rel.join(entry.file_name());
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!(path = %child_abs.display(), error = %err, "failed to stat entry");
                    continue;
                }
            };

            if file_type.is_symlink() {
                // Never followed: avoids cycles and double-counting.
                continue;
            }

            if file_type.is_dir() {
                children.push(scan_tree(child_abs, child_rel, cancel.clone()));
            } else if file_type.is_file() {
                children.push(scan_file(child_abs, child_rel).boxed());
            }
        }

        for subtree in join_all(children).await {
            tree.merge(subtree);
        }
        tree
    }
    .boxed()
}

async fn scan_file(abs: PathBuf, rel: PathBuf) -> Subtree {
    let mut tree = Subtree::default();
    let metadata = match fs::symlink_metadata(&abs).await {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!(path = %abs.display(), error = %err, "failed to stat file");
            return tree;
        }
    };

    let size = metadata.len();
    if size == 0 {
        // Empty files carry no payload; excluded from both the file list
        // and the byte total.
        return tree;
    }

    tree.files.push(FileSystemNode {
        kind: NodeKind::File,
        name: rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size,
        absolute_path: abs,
        relative_path: rel,
    });
    tree.bytes = size;
    tree
}
