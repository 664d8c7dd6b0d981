/*!
 * Codebase export: walks the root and writes the `.txt` mirror tree
 */

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::builder::{ExportBuilder, FinalizeReport};
use crate::config::ExportConfig;
use crate::filter::{DirPruner, InclusionFilter};
use crate::reader::SafeTextReader;
use crate::types::{FileEntry, FileOutcome, SkipReason};
use crate::utils::{iso_timestamp, normalize_relpath, sha256_text};

/// Everything an export run produced
#[derive(Debug)]
pub struct ExportSummary {
    /// One outcome per visited regular file, in traversal order
    pub outcomes: Vec<FileOutcome>,
    /// Result of the manifest and consolidated writes
    pub finalize: FinalizeReport,
    /// Wall time of the whole run
    pub duration: Duration,
}

impl ExportSummary {
    pub fn exported(&self) -> impl Iterator<Item = &FileEntry> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Exported(entry) => Some(entry),
            FileOutcome::Skipped { .. } => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Skipped { relpath, reason } => Some((relpath.as_str(), reason)),
            FileOutcome::Exported(_) => None,
        })
    }

    /// Number of skipped files per reason label
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, reason) in self.skipped() {
            *counts.entry(reason.label()).or_insert(0) += 1;
        }
        counts
    }
}

/// Exports the text files under a root directory
pub struct Exporter {
    /// Exporter configuration
    config: ExportConfig,
    filter: InclusionFilter,
    pruner: DirPruner,
    reader: SafeTextReader,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Pinned clock for reproducible output
    fixed_time: Option<DateTime<Utc>>,
}

impl Exporter {
    /// Create a new exporter
    pub fn new(config: ExportConfig, progress: Arc<ProgressBar>) -> Self {
        Self {
            filter: InclusionFilter::from_config(&config),
            pruner: DirPruner::new(config.exclude_dirs.iter().cloned()),
            reader: SafeTextReader::default(),
            config,
            progress,
            fixed_time: None,
        }
    }

    /// Use `at` for every timestamp this exporter writes
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.fixed_time = Some(at);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_time.unwrap_or_else(Utc::now)
    }

    /// Walk, write the mirror tree, then write manifest and consolidated file
    pub fn run(&self) -> ExportSummary {
        let start = Instant::now();
        let mut builder = ExportBuilder::new(&self.config.root, &self.config.output_dir);

        let outcomes = self.export_files(&mut builder);
        let finalize = builder.finalize(&self.now());

        ExportSummary {
            outcomes,
            finalize,
            duration: start.elapsed(),
        }
    }

    /// Walk the root and write every `.txt` copy, recording exported files
    /// in `builder`
    pub fn export_files(&self, builder: &mut ExportBuilder) -> Vec<FileOutcome> {
        let root = &self.config.root;
        let output_dir = &self.config.output_dir;

        if let Err(e) = fs::create_dir_all(output_dir) {
            warn!(path = %output_dir.display(), "cannot create output directory: {}", e);
        }
        if !root.is_dir() {
            warn!(path = %root.display(), "root is not a directory, nothing to export");
            return Vec::new();
        }

        let output_rel = output_inside_root(root, output_dir);
        let mut walker = WalkDir::new(root).min_depth(1);
        if self.config.sort_entries {
            walker = walker.sort_by_file_name();
        }

        let mut outcomes = Vec::new();
        let entries = walker
            .into_iter()
            .filter_entry(|e| !self.is_pruned(e, root, output_rel.as_deref()));

        for item in entries {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable path: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }
            if let Some(outcome) = self.visit(entry.path(), builder) {
                if let FileOutcome::Skipped { relpath, reason } = &outcome {
                    debug!(path = %relpath, "skipped: {}", reason);
                }
                outcomes.push(outcome);
            }
        }

        info!(
            visited = outcomes.len(),
            exported = builder.entries().len(),
            "walk complete"
        );
        outcomes
    }

    /// Directories pruned before descent: excluded names and the output directory
    fn is_pruned(&self, entry: &DirEntry, root: &Path, output_rel: Option<&Path>) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if self.pruner.is_excluded(&name) {
            return true;
        }
        match output_rel {
            Some(rel) => entry.path().strip_prefix(root).is_ok_and(|p| p == rel),
            None => false,
        }
    }

    /// Handle one non-directory entry. Returns `None` for entries that are
    /// not regular files (symlinked directories, sockets, fifos).
    fn visit(&self, path: &Path, builder: &mut ExportBuilder) -> Option<FileOutcome> {
        let relpath = normalize_relpath(&self.config.root, path);
        self.show_progress(&relpath);

        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                return Some(FileOutcome::Skipped {
                    relpath,
                    reason: SkipReason::Metadata(e.to_string()),
                })
            }
        };
        if !metadata.is_file() {
            return None;
        }

        Some(self.export_file(path, relpath, metadata.len(), builder))
    }

    fn export_file(
        &self,
        path: &Path,
        relpath: String,
        size: u64,
        builder: &mut ExportBuilder,
    ) -> FileOutcome {
        if let Err(reason) = self.filter.check(path, size) {
            return FileOutcome::Skipped { relpath, reason };
        }

        let content = match self.reader.read(path) {
            Ok(content) => content,
            Err(e) => {
                return FileOutcome::Skipped {
                    relpath,
                    reason: SkipReason::Unreadable(e.to_string()),
                }
            }
        };

        let txt_out = txt_output_path(&self.config.output_dir, &relpath);
        if let Err(e) = self.write_copy(&txt_out, &relpath, &content) {
            warn!(path = %txt_out.display(), "failed to write copy: {}", e);
            return FileOutcome::Skipped {
                relpath,
                reason: SkipReason::WriteFailed(e.to_string()),
            };
        }

        let entry = FileEntry {
            sha256: sha256_text(&content),
            txt_out: normalize_relpath(&self.config.output_dir, &txt_out),
            relpath,
            size,
        };
        builder.push(entry.clone(), &content);
        FileOutcome::Exported(entry)
    }

    /// Write the header block followed by the content
    fn write_copy(&self, txt_out: &Path, relpath: &str, content: &str) -> io::Result<()> {
        if let Some(parent) = txt_out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(txt_out)?);
        writer.write_all(copy_header(relpath, &self.now()).as_bytes())?;
        writer.write_all(content.as_bytes())?;
        writer.flush()
    }

    /// Count the file and show its path on the progress bar
    fn show_progress(&self, relpath: &str) {
        self.progress.inc(1);
        // Truncate if too long to avoid display issues
        let count = relpath.chars().count();
        let display_name = if count > 50 {
            let start = relpath
                .char_indices()
                .nth(count - 47)
                .map_or(0, |(i, _)| i);
            format!("...{}", &relpath[start..])
        } else {
            relpath.to_string()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));
    }
}

/// Header block written at the top of each `.txt` copy
pub fn copy_header(relpath: &str, exported_at: &DateTime<Utc>) -> String {
    format!(
        "---\nOriginal path: {}\nExported: {}\n---\n",
        relpath,
        iso_timestamp(exported_at)
    )
}

/// `<output>/<relpath>.txt`
pub fn txt_output_path(output_dir: &Path, relpath: &str) -> PathBuf {
    let mut path = output_dir.join(relpath).into_os_string();
    path.push(".txt");
    PathBuf::from(path)
}

/// Output directory relative to the root, when it lies inside it
fn output_inside_root(root: &Path, output_dir: &Path) -> Option<PathBuf> {
    let root = fs::canonicalize(root).ok()?;
    let output = fs::canonicalize(output_dir).ok()?;
    output.strip_prefix(&root).ok().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn txt_path_appends_suffix() {
        let out = PathBuf::from("/export");
        assert_eq!(
            txt_output_path(&out, "src/components/Button.tsx"),
            PathBuf::from("/export/src/components/Button.tsx.txt")
        );
    }

    #[test]
    fn header_format() {
        let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(
            copy_header("a/b.js", &at),
            "---\nOriginal path: a/b.js\nExported: 2023-12-31T23:59:58.000000Z\n---\n"
        );
    }
}
