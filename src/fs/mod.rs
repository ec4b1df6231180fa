//! Local filesystem inventory: node types and the directory scanner.

pub mod node;
pub mod scanner;

pub use node::{FileSystemNode, NodeKind, ScanResult};
pub use scanner::Scanner;
