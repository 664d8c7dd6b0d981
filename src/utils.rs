/*!
 * Utility functions and default rule sets for txtdump
 */

use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

/// Largest file the exporter will read (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Default output file for the tree mapper
pub const DEFAULT_TREE_OUTPUT: &str = "folder_tree.txt";

/// Manifest file name at the export root
pub const MANIFEST_FILE_NAME: &str = "_manifest.json";

/// Consolidated file name at the export root
pub const CONSOLIDATED_FILE_NAME: &str = "_ALL_FILES_CONSOLIDATED.txt";

/// Extensions (without the leading dot) whose files are exported
pub static DEFAULT_INCLUDE_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // JavaScript/TypeScript
        "js",
        "jsx",
        "ts",
        "tsx",
        "mjs",
        "cjs",
        // Styles
        "css",
        "scss",
        "sass",
        "less",
        // Markup & docs
        "html",
        "htm",
        "md",
        "markdown",
        "txt",
        // Data & config
        "json",
        "yaml",
        "yml",
        "toml",
        "env",
        // Scripts
        "py",
        "sh",
        // Tool configs that appear as suffixes
        "gitignore",
        "gitattributes",
        "dockerignore",
        "dockerfile",
        "docker",
        "babelrc",
        "eslintrc",
        "prettierrc",
        "stylelintrc",
        "tsconfig",
        "postcssrc",
    ]
});

/// Extensionless file names treated as text configs
pub static DEFAULT_INCLUDE_NAMES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Dockerfile",
        "Makefile",
        "Procfile",
        "LICENSE",
        "README",
        "README.md",
        "README.txt",
        "vite.config",
        "tailwind.config",
    ]
});

/// Directories the exporter never descends into
pub static DEFAULT_EXPORT_EXCLUDES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Dependencies
        "node_modules",
        ".pnpm-store",
        // Build & Dist
        "dist",
        "build",
        ".next",
        ".turbo",
        "coverage",
        // Version Control
        ".git",
        ".husky",
        // IDEs & Editors
        ".vscode",
        ".idea",
        // Caches & Temp
        ".cache",
        "tmp",
        "temp",
    ]
});

/// Directories the tree mapper skips by default
pub static DEFAULT_TREE_EXCLUDES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["node_modules", ".git", "dist", "build"]);

/// Relative path of `full` under `base`, using forward slashes
pub fn normalize_relpath(base: &Path, full: &Path) -> String {
    let rel = full.strip_prefix(base).unwrap_or(full);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `text`
pub fn sha256_text(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{:x}", digest)
}

/// ISO-8601 UTC timestamp with microseconds and a trailing `Z`
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    #[test]
    fn relpath_uses_forward_slashes() {
        let base = PathBuf::from("/project");
        let full = base.join("src").join("components").join("Button.tsx");
        assert_eq!(normalize_relpath(&base, &full), "src/components/Button.tsx");
    }

    #[test]
    fn sha256_matches_known_digest() {
        assert_eq!(
            sha256_text("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn timestamp_has_microseconds_and_zulu() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(iso_timestamp(&at), "2024-03-09T07:05:01.000000Z");
    }

    #[test]
    fn file_size_formatting() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(DEFAULT_MAX_FILE_SIZE), "5.00 MB");
    }
}
