/*!
 * Folder tree mapping
 *
 * Traversal produces [`TreeRecord`]s; [`render_lines`] turns them into
 * branch-drawn lines. Keeping the two apart lets the layout be checked
 * without caring about glyphs, and the glyphs without touching a disk.
 */

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::TreeConfig;
use crate::error::{Result, ResultExt};
use crate::filter::DirPruner;
use crate::types::TreeRecord;

/// Characters used to draw branches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeGlyphs {
    /// Connector for an entry with siblings after it
    pub mid: &'static str,
    /// Connector for the last entry at its level
    pub last: &'static str,
    /// Indent under a directory that has siblings after it
    pub vertical: &'static str,
    /// Indent under a last-sibling directory
    pub blank: &'static str,
}

impl Default for TreeGlyphs {
    fn default() -> Self {
        Self {
            mid: "├─ ",
            last: "└─ ",
            vertical: "│  ",
            blank: "   ",
        }
    }
}

impl TreeGlyphs {
    pub fn ascii() -> Self {
        Self {
            mid: "|- ",
            last: "`- ",
            vertical: "|  ",
            blank: "   ",
        }
    }
}

/// Depth-first traversal of a directory for the tree mapper
pub struct TreeWalker<'a> {
    config: &'a TreeConfig,
    pruner: DirPruner,
}

impl<'a> TreeWalker<'a> {
    pub fn new(config: &'a TreeConfig) -> Self {
        Self {
            config,
            pruner: DirPruner::new(config.exclude_dirs.iter().cloned()),
        }
    }

    /// Records for everything under the root, in render order
    pub fn walk(&self) -> Vec<TreeRecord> {
        let mut records = Vec::new();
        self.walk_dir(&self.config.root, 0, &mut records);
        records
    }

    /// List `dir` (at `level`, the root being 0) and recurse into its subdirectories
    fn walk_dir(&self, dir: &Path, level: usize, records: &mut Vec<TreeRecord>) {
        if self.config.max_depth.is_some_and(|max| level > max) {
            return;
        }

        let listing = match fs::read_dir(dir) {
            Ok(listing) => listing,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                records.push(TreeRecord::PermissionDenied {
                    name: display_name(dir),
                    depth: level,
                });
                return;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %dir.display(), "directory vanished during walk");
                return;
            }
            Err(e) => {
                warn!(path = %dir.display(), "cannot list directory: {}", e);
                return;
            }
        };

        let mut dirs: Vec<String> = Vec::new();
        let mut linked_dirs: HashSet<String> = HashSet::new();
        let mut files: Vec<String> = Vec::new();
        for entry in listing.filter_map(|e| e.ok()) {
            let name = entry.file_name().to_string_lossy().into_owned();
            // Classify by target, dropping dangling links and special files
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => {
                    if entry.file_type().is_ok_and(|t| t.is_symlink()) {
                        linked_dirs.insert(name.clone());
                    }
                    dirs.push(name);
                }
                Ok(meta) if meta.is_file() => files.push(name),
                _ => {}
            }
        }

        self.pruner.prune(&mut dirs);
        dirs.sort();
        if self.config.show_files {
            files.sort();
        } else {
            files.clear();
        }

        let total = dirs.len() + files.len();
        let dir_count = dirs.len();

        for (i, name) in dirs.into_iter().enumerate() {
            let child = dir.join(&name);
            let is_link = linked_dirs.contains(&name);
            records.push(TreeRecord::Entry {
                name,
                depth: level,
                is_last: i + 1 == total,
                is_dir: true,
            });
            // Symlinked directories are shown but not followed
            if !is_link {
                self.walk_dir(&child, level + 1, records);
            }
        }

        for (j, name) in files.into_iter().enumerate() {
            records.push(TreeRecord::Entry {
                name,
                depth: level,
                is_last: dir_count + j + 1 == total,
                is_dir: false,
            });
        }
    }
}

/// Format records under a root line
pub fn render_lines(root_name: &str, records: &[TreeRecord], glyphs: &TreeGlyphs) -> Vec<String> {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!("{}/", root_name));

    // For each open ancestor directory: was it the last sibling?
    let mut ancestors: Vec<bool> = Vec::new();

    for record in records {
        ancestors.truncate(record.depth());
        let prefix: String = ancestors
            .iter()
            .map(|&last| if last { glyphs.blank } else { glyphs.vertical })
            .collect();

        match record {
            TreeRecord::Entry {
                name,
                is_last,
                is_dir,
                ..
            } => {
                let connector = if *is_last { glyphs.last } else { glyphs.mid };
                let suffix = if *is_dir { "/" } else { "" };
                lines.push(format!("{}{}{}{}", prefix, connector, name, suffix));
                if *is_dir {
                    ancestors.push(*is_last);
                }
            }
            TreeRecord::PermissionDenied { name, .. } => {
                lines.push(format!("{}[Permission denied] {}", prefix, name));
            }
        }
    }

    lines
}

/// Name shown for the root line: the directory's own name
pub fn root_display_name(root: &Path) -> String {
    fs::canonicalize(root)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

fn display_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Render the configured root and write it to the output file
///
/// Returns the lines that were written.
pub fn map_folder_structure(config: &TreeConfig) -> Result<Vec<String>> {
    let records = TreeWalker::new(config).walk();
    let lines = render_lines(&root_display_name(&config.root), &records, &config.glyphs);

    fs::write(&config.output_file, lines.join("\n"))
        .tree_context(|| format!("writing {}", config.output_file.display()))?;

    Ok(lines)
}
