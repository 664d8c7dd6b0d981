/*!
 * txtdump - Export a codebase as plain text and map folder structures
 *
 * Two independent tools share this crate: the exporter, which copies the
 * text files of a directory tree into a mirrored `.txt` tree with a JSON
 * manifest and one consolidated file, and the tree mapper, which renders
 * the folder structure of a directory to a text file.
 */

pub mod builder;
pub mod config;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod reader;
pub mod report;
pub mod tree;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use builder::{ExportBuilder, FinalizeReport};
pub use config::{ExportConfig, TreeConfig};
pub use error::{Result, TxtDumpError};
pub use exporter::{ExportSummary, Exporter};
pub use filter::{DirPruner, InclusionFilter};
pub use reader::{SafeTextReader, TextEncoding};
pub use report::{ReportFormat, Reporter};
pub use tree::{map_folder_structure, render_lines, TreeGlyphs, TreeWalker};
pub use types::{FileEntry, FileOutcome, Manifest, SkipReason, TreeRecord};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
