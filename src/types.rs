/*!
 * Core types and data structures for txtdump
 */

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One exported file as recorded in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path relative to the export root, forward slashes
    pub relpath: String,
    /// Source size in bytes
    pub size: u64,
    /// SHA-256 of the exported text
    pub sha256: String,
    /// Path of the `.txt` copy relative to the output root
    pub txt_out: String,
}

/// Summary record of an export run
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    /// Root that was exported
    pub root: String,
    /// Output directory
    pub output: String,
    /// Number of files in `files`
    pub exported_count: usize,
    /// Generation time, ISO-8601 UTC
    pub generated_at: String,
    /// Entries in traversal order
    pub files: Vec<FileEntry>,
}

/// Why a visited file produced no export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Size lookup failed
    Metadata(String),
    /// Larger than the configured limit
    TooLarge { size: u64, limit: u64 },
    /// Extension and name are not in the allow-lists
    NotIncluded,
    /// The file could not be read
    Unreadable(String),
    /// The `.txt` copy could not be written
    WriteFailed(String),
}

impl SkipReason {
    /// Short stable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::Metadata(_) => "metadata",
            SkipReason::TooLarge { .. } => "too large",
            SkipReason::NotIncluded => "not included",
            SkipReason::Unreadable(_) => "unreadable",
            SkipReason::WriteFailed(_) => "write failed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Metadata(e) => write!(f, "cannot stat file: {}", e),
            SkipReason::TooLarge { size, limit } => {
                write!(f, "{} bytes exceeds limit of {} bytes", size, limit)
            }
            SkipReason::NotIncluded => write!(f, "not an included file type"),
            SkipReason::Unreadable(e) => write!(f, "cannot read file: {}", e),
            SkipReason::WriteFailed(e) => write!(f, "cannot write copy: {}", e),
        }
    }
}

/// Result of visiting a single file during an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Written to the mirror tree and recorded
    Exported(FileEntry),
    /// Left out, with the reason
    Skipped { relpath: String, reason: SkipReason },
}

impl FileOutcome {
    /// Relative path of the visited file
    pub fn relpath(&self) -> &str {
        match self {
            FileOutcome::Exported(entry) => &entry.relpath,
            FileOutcome::Skipped { relpath, .. } => relpath,
        }
    }
}

/// One entry produced by tree traversal, before formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRecord {
    /// A directory or file
    Entry {
        name: String,
        /// 0 for the root's children
        depth: usize,
        is_last: bool,
        is_dir: bool,
    },
    /// A directory whose listing was refused
    PermissionDenied {
        name: String,
        /// Depth of the entries that would have been listed
        depth: usize,
    },
}

impl TreeRecord {
    pub fn depth(&self) -> usize {
        match self {
            TreeRecord::Entry { depth, .. } | TreeRecord::PermissionDenied { depth, .. } => *depth,
        }
    }
}

/// Paths written by an export, for reporting
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// Output root
    pub output_dir: PathBuf,
    /// `_manifest.json`
    pub manifest: PathBuf,
    /// `_ALL_FILES_CONSOLIDATED.txt`
    pub consolidated: PathBuf,
}
