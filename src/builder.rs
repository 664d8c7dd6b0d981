/*!
 * Accumulates exported files and writes the manifest and consolidated file
 */

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::{FileEntry, Manifest, OutputPaths};
use crate::utils::{iso_timestamp, CONSOLIDATED_FILE_NAME, MANIFEST_FILE_NAME};

const RULE_WIDTH: usize = 80;

/// Marker line that opens each file's section in the consolidated file
pub fn file_marker(relpath: &str) -> String {
    format!("\n\n===== FILE: {} =====\n", relpath)
}

/// Collects entries during the walk; nothing touches disk until [`finalize`](Self::finalize)
#[derive(Debug)]
pub struct ExportBuilder {
    root: String,
    paths: OutputPaths,
    entries: Vec<FileEntry>,
    segments: Vec<String>,
}

/// Outcome of the two final writes, each independent of the other
#[derive(Debug)]
pub struct FinalizeReport {
    pub paths: OutputPaths,
    pub exported_count: usize,
    pub manifest: Result<()>,
    pub consolidated: Result<()>,
}

impl FinalizeReport {
    pub fn is_complete(&self) -> bool {
        self.manifest.is_ok() && self.consolidated.is_ok()
    }
}

impl ExportBuilder {
    pub fn new(root: &Path, output_dir: &Path) -> Self {
        Self {
            root: root.display().to_string(),
            paths: OutputPaths {
                output_dir: output_dir.to_path_buf(),
                manifest: output_dir.join(MANIFEST_FILE_NAME),
                consolidated: output_dir.join(CONSOLIDATED_FILE_NAME),
            },
            entries: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Record one exported file and its text
    pub fn push(&mut self, entry: FileEntry, content: &str) {
        let mut segment = file_marker(&entry.relpath);
        segment.push_str(content);
        self.segments.push(segment);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Manifest as it would be written at `generated_at`
    pub fn manifest(&self, generated_at: &DateTime<Utc>) -> Manifest {
        Manifest {
            root: self.root.clone(),
            output: self.paths.output_dir.display().to_string(),
            exported_count: self.entries.len(),
            generated_at: iso_timestamp(generated_at),
            files: self.entries.clone(),
        }
    }

    /// Banner plus every segment, in traversal order
    pub fn consolidated(&self, generated_at: &DateTime<Utc>) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = format!(
            "Codebase consolidated export\nRoot: {}\nGenerated: {}\n",
            self.root,
            iso_timestamp(generated_at)
        );
        out.push_str(&format!("\n{}\n", rule));
        out.push_str("Note: Each section begins with '===== FILE: path ====='\n");
        out.push_str(&format!("\n{}\n", rule));
        for segment in &self.segments {
            out.push_str(segment);
        }
        out
    }

    /// Write the manifest and the consolidated file. A failure of one does
    /// not prevent the other.
    pub fn finalize(self, generated_at: &DateTime<Utc>) -> FinalizeReport {
        let manifest = self.write_manifest(generated_at);
        if let Err(e) = &manifest {
            warn!(path = %self.paths.manifest.display(), "failed to write manifest: {}", e);
        }

        let consolidated = self.write_consolidated(generated_at);
        if let Err(e) = &consolidated {
            warn!(path = %self.paths.consolidated.display(), "failed to write consolidated file: {}", e);
        }

        info!(count = self.entries.len(), "export finalized");

        FinalizeReport {
            exported_count: self.entries.len(),
            paths: self.paths,
            manifest,
            consolidated,
        }
    }

    fn write_manifest(&self, generated_at: &DateTime<Utc>) -> Result<()> {
        let manifest = self.manifest(generated_at);
        let json = serde_json::to_vec_pretty(&manifest)?;
        write_atomic(&self.paths.manifest, |w| w.write_all(&json))?;
        Ok(())
    }

    fn write_consolidated(&self, generated_at: &DateTime<Utc>) -> Result<()> {
        let text = self.consolidated(generated_at);
        write_atomic(&self.paths.consolidated, |w| w.write_all(text.as_bytes()))?;
        Ok(())
    }
}

/// Write through a temporary sibling and rename it into place, so the
/// target is either the old file or the complete new one
fn write_atomic<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let tmp = temp_sibling(path);
    let result = (|| {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        fill(&mut writer)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn entry(relpath: &str, content: &str) -> FileEntry {
        FileEntry {
            relpath: relpath.to_string(),
            size: content.len() as u64,
            sha256: crate::utils::sha256_text(content),
            txt_out: format!("{}.txt", relpath),
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn accumulates_in_push_order_without_writing() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("out");
        let mut builder = ExportBuilder::new(Path::new("/src"), &out);

        builder.push(entry("b.js", "let b;"), "let b;");
        builder.push(entry("a/a.css", "p {}"), "p {}");

        let names: Vec<_> = builder.entries().iter().map(|e| e.relpath.as_str()).collect();
        assert_eq!(names, ["b.js", "a/a.css"]);
        assert!(!out.exists());

        let manifest = builder.manifest(&fixed_time());
        assert_eq!(manifest.exported_count, 2);
        assert_eq!(manifest.generated_at, "2024-01-02T03:04:05.000000Z");
        assert_eq!(manifest.root, "/src");
    }

    #[test]
    fn consolidated_layout() {
        let mut builder = ExportBuilder::new(Path::new("proj"), Path::new("out"));
        builder.push(entry("x.md", "# X\n"), "# X\n");

        let text = builder.consolidated(&fixed_time());
        let rule = "=".repeat(80);
        let expected = format!(
            "Codebase consolidated export\nRoot: proj\nGenerated: 2024-01-02T03:04:05.000000Z\n\
             \n{rule}\nNote: Each section begins with '===== FILE: path ====='\n\n{rule}\n\
             \n\n===== FILE: x.md =====\n# X\n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn finalize_writes_both_files() {
        let temp = tempdir().unwrap();
        let mut builder = ExportBuilder::new(Path::new("proj"), temp.path());
        builder.push(entry("x.md", "hi"), "hi");

        let report = builder.finalize(&fixed_time());
        assert!(report.is_complete());
        assert_eq!(report.exported_count, 1);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report.paths.manifest).unwrap()).unwrap();
        assert_eq!(json["exported_count"], 1);
        assert_eq!(json["files"][0]["relpath"], "x.md");
        assert_eq!(json["files"][0]["txt_out"], "x.md.txt");
        assert!(fs::read_to_string(&report.paths.consolidated)
            .unwrap()
            .ends_with("===== FILE: x.md =====\nhi"));
        assert!(!temp.path().join("_manifest.json.tmp").exists());
    }

    #[test]
    fn manifest_failure_does_not_block_consolidated() {
        let temp = tempdir().unwrap();
        // A directory squatting on the manifest path makes the rename fail
        fs::create_dir(temp.path().join(MANIFEST_FILE_NAME)).unwrap();
        fs::write(temp.path().join(MANIFEST_FILE_NAME).join("keep"), "x").unwrap();

        let builder = ExportBuilder::new(Path::new("proj"), temp.path());
        let report = builder.finalize(&fixed_time());

        assert!(report.manifest.is_err());
        assert!(report.consolidated.is_ok());
        assert!(report.paths.consolidated.is_file());
        assert!(!temp.path().join("_manifest.json.tmp").exists());
    }
}
