/*!
 * Configuration handling for txtdump
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::error::Result;
use crate::tree::TreeGlyphs;
use crate::utils::{
    DEFAULT_EXPORT_EXCLUDES, DEFAULT_INCLUDE_EXTENSIONS, DEFAULT_INCLUDE_NAMES,
    DEFAULT_MAX_FILE_SIZE, DEFAULT_TREE_EXCLUDES, DEFAULT_TREE_OUTPUT,
};

/// Command-line arguments for txtdump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "txtdump",
    version = crate::VERSION,
    about = "Export a codebase as plain text and map folder structures",
    long_about = "Exports the text files of a directory tree into a mirrored .txt tree with a JSON manifest and a single consolidated file, or renders the folder structure of a directory to a text file."
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export text files into a mirrored .txt tree, manifest and consolidated file
    Export(ExportArgs),
    /// Write the folder structure of a directory to a text file
    Tree(TreeArgs),
}

/// Arguments of the `export` subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Directory to export
    #[clap(default_value = ".")]
    pub root: String,

    /// Output directory (defaults to `<root>_txt_export` next to the root)
    pub output: Option<String>,

    /// Comma-separated extensions to include in addition to the defaults
    #[clap(long, value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Comma-separated extensionless file names to include in addition to the defaults
    #[clap(long, value_delimiter = ',')]
    pub name: Vec<String>,

    /// Comma-separated directory names or patterns to exclude in addition to the defaults
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Skip files larger than this many bytes
    #[clap(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_size: u64,

    /// Keep the filesystem's listing order instead of sorting by name
    #[clap(long)]
    pub unsorted: bool,

    /// Do not show progress while exporting
    #[clap(long, short)]
    pub quiet: bool,
}

/// Arguments of the `tree` subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct TreeArgs {
    /// Directory to map
    #[clap(default_value = ".")]
    pub root: String,

    /// Output text file
    #[clap(long, short, default_value = DEFAULT_TREE_OUTPUT)]
    pub output: String,

    /// Comma-separated directory names or patterns to exclude (replaces the defaults)
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// List directories only
    #[clap(long)]
    pub no_files: bool,

    /// Deepest directory level to list (0 lists only the root's entries)
    #[clap(long)]
    pub max_depth: Option<usize>,

    /// Draw branches with plain ASCII characters
    #[clap(long)]
    pub ascii: bool,
}

/// Exporter configuration
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Directory to export
    pub root: PathBuf,

    /// Directory receiving the mirror tree, manifest and consolidated file
    pub output_dir: PathBuf,

    /// Extensions (without the dot) whose files are exported
    pub include_extensions: Vec<String>,

    /// Extensionless file names that are exported
    pub include_names: Vec<String>,

    /// Directory names or glob patterns that are never descended into
    pub exclude_dirs: Vec<String>,

    /// Largest exported file in bytes, inclusive
    pub max_file_size: u64,

    /// Visit entries sorted by file name
    pub sort_entries: bool,

    /// Show a progress spinner
    pub show_progress: bool,
}

impl ExportConfig {
    /// Configuration with the default rule sets
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: output_dir.into(),
            include_extensions: owned_strings(&DEFAULT_INCLUDE_EXTENSIONS),
            include_names: owned_strings(&DEFAULT_INCLUDE_NAMES),
            exclude_dirs: owned_strings(&DEFAULT_EXPORT_EXCLUDES),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            sort_entries: true,
            show_progress: false,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: ExportArgs) -> Self {
        let root = PathBuf::from(&args.root);
        let output_dir = match args.output {
            Some(out) => PathBuf::from(out),
            None => default_output_dir(&root),
        };

        let mut config = Self::new(root, output_dir);
        config
            .include_extensions
            .extend(args.ext.into_iter().map(|e| e.trim_start_matches('.').to_string()));
        config.include_names.extend(args.name);
        config.exclude_dirs.extend(args.exclude);
        config.max_file_size = args.max_size;
        config.sort_entries = !args.unsorted;
        config.show_progress = !args.quiet;
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            !self.include_extensions.is_empty() || !self.include_names.is_empty(),
            Config,
            "no extensions or file names to include"
        );

        if let (Ok(root), Ok(out)) = (
            fs::canonicalize(&self.root),
            fs::canonicalize(&self.output_dir),
        ) {
            crate::ensure!(
                root != out,
                Config,
                "output directory must differ from the root: {}",
                out.display()
            );
        }

        Ok(())
    }
}

/// Tree mapper configuration
#[derive(Clone, Debug)]
pub struct TreeConfig {
    /// Directory to map
    pub root: PathBuf,

    /// File receiving the rendered tree
    pub output_file: PathBuf,

    /// Directory names or glob patterns that are skipped
    pub exclude_dirs: Vec<String>,

    /// Render files as well as directories
    pub show_files: bool,

    /// Deepest directory level to list, the root being level 0
    pub max_depth: Option<usize>,

    /// Branch drawing characters
    pub glyphs: TreeGlyphs,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_TREE_OUTPUT),
            exclude_dirs: owned_strings(&DEFAULT_TREE_EXCLUDES),
            show_files: true,
            max_depth: None,
            glyphs: TreeGlyphs::default(),
        }
    }
}

impl TreeConfig {
    /// Create configuration from command-line arguments
    pub fn from_args(args: TreeArgs) -> Self {
        let mut config = Self {
            root: PathBuf::from(args.root),
            output_file: PathBuf::from(args.output),
            show_files: !args.no_files,
            max_depth: args.max_depth,
            ..Self::default()
        };
        if !args.exclude.is_empty() {
            config.exclude_dirs = args.exclude;
        }
        if args.ascii {
            config.glyphs = TreeGlyphs::ascii();
        }
        config
    }
}

/// `<root>_txt_export` next to the root directory
fn default_output_dir(root: &Path) -> PathBuf {
    let resolved = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    match (resolved.parent(), resolved.file_name()) {
        (Some(parent), Some(name)) => {
            parent.join(format!("{}_txt_export", name.to_string_lossy()))
        }
        _ => PathBuf::from("txt_export"),
    }
}

fn owned_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn export_args_extend_defaults() {
        let args = Args::parse_from([
            "txtdump", "export", "src", "out", "--ext", ".rs,go", "--exclude", "target",
            "--unsorted",
        ]);
        let Some(Command::Export(export)) = args.command else {
            panic!("expected export subcommand");
        };
        let config = ExportConfig::from_args(export);

        assert_eq!(config.root, PathBuf::from("src"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.include_extensions.iter().any(|e| e == "rs"));
        assert!(config.include_extensions.iter().any(|e| e == "go"));
        assert!(config.include_extensions.iter().any(|e| e == "tsx"));
        assert!(config.exclude_dirs.iter().any(|d| d == "target"));
        assert!(config.exclude_dirs.iter().any(|d| d == "node_modules"));
        assert!(!config.sort_entries);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn default_output_is_sibling_of_root() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("site");
        fs::create_dir(&root).unwrap();

        let out = default_output_dir(&root);
        let expected = fs::canonicalize(temp.path()).unwrap().join("site_txt_export");
        assert_eq!(out, expected);
    }

    #[test]
    fn tree_exclude_replaces_defaults() {
        let args = Args::parse_from(["txtdump", "tree", "--exclude", "vendor", "--no-files"]);
        let Some(Command::Tree(tree)) = args.command else {
            panic!("expected tree subcommand");
        };
        let config = TreeConfig::from_args(tree);

        assert_eq!(config.exclude_dirs, vec!["vendor".to_string()]);
        assert!(!config.show_files);
        assert_eq!(config.output_file, PathBuf::from(DEFAULT_TREE_OUTPUT));
    }

    #[test]
    fn validate_rejects_output_equal_to_root() {
        let temp = tempdir().unwrap();
        let config = ExportConfig::new(temp.path(), temp.path());
        assert!(config.validate().is_err());

        let config = ExportConfig::new(temp.path(), temp.path().join("out"));
        assert!(config.validate().is_ok());
    }
}
