/*!
 * File inclusion rules and directory pruning
 */

use std::collections::HashSet;
use std::path::Path;

use glob_match::glob_match;

use crate::config::ExportConfig;
use crate::types::SkipReason;

/// Decides which files the exporter copies
#[derive(Debug, Clone)]
pub struct InclusionFilter {
    extensions: HashSet<String>,
    names: HashSet<String>,
    max_file_size: u64,
}

impl InclusionFilter {
    pub fn new<E, N>(extensions: E, names: N, max_file_size: u64) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            names: names.into_iter().map(Into::into).collect(),
            max_file_size,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            config.include_extensions.iter().cloned(),
            config.include_names.iter().cloned(),
            config.max_file_size,
        )
    }

    /// Check a file's name and size, returning why it is rejected if it is
    pub fn check(&self, path: &Path, size: u64) -> Result<(), SkipReason> {
        if !self.within_size(size) {
            return Err(SkipReason::TooLarge {
                size,
                limit: self.max_file_size,
            });
        }
        if !self.is_text_candidate(path) {
            return Err(SkipReason::NotIncluded);
        }
        Ok(())
    }

    /// Files of exactly the limit are accepted
    pub fn within_size(&self, size: u64) -> bool {
        size <= self.max_file_size
    }

    /// Whether the file name marks the file as exportable text
    pub fn is_text_candidate(&self, path: &Path) -> bool {
        let base = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };

        if self.names.contains(base.as_ref()) {
            return true;
        }

        // Leading dots never start an extension: `.gitignore` and `..json`
        // have none, `.eslintrc.json` has `json`.
        Path::new(base.trim_start_matches('.'))
            .extension()
            .is_some_and(|ext| self.extensions.contains(ext.to_string_lossy().as_ref()))
    }
}

/// Directory names (or glob patterns) that are never descended into
#[derive(Debug, Clone, Default)]
pub struct DirPruner {
    patterns: Vec<String>,
}

impl DirPruner {
    pub fn new<I>(patterns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a directory with this bare name is pruned
    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern == name || glob_match(pattern, name))
    }

    /// Drop excluded names from a pending directory list
    pub fn prune(&self, dirs: &mut Vec<String>) {
        dirs.retain(|d| !self.is_excluded(d));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{DEFAULT_EXPORT_EXCLUDES, DEFAULT_MAX_FILE_SIZE};

    fn default_filter() -> InclusionFilter {
        InclusionFilter::from_config(&ExportConfig::new("root", "out"))
    }

    #[test]
    fn accepts_listed_extensions() {
        let filter = default_filter();
        for name in ["App.jsx", "index.ts", "styles.scss", "data.json", "notes.md"] {
            assert!(filter.is_text_candidate(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn accepts_extensionless_names() {
        let filter = default_filter();
        assert!(filter.is_text_candidate(Path::new("proj/Dockerfile")));
        assert!(filter.is_text_candidate(Path::new("LICENSE")));
        assert!(filter.is_text_candidate(Path::new("vite.config")));
        assert!(!filter.is_text_candidate(Path::new("CHANGELOG")));
    }

    #[test]
    fn rejects_unlisted_extensions_even_if_text() {
        let filter = default_filter();
        assert!(!filter.is_text_candidate(Path::new("image.png")));
        assert!(!filter.is_text_candidate(Path::new("notes.rst")));
        assert!(!filter.is_text_candidate(Path::new("App.JSX")));
    }

    #[test]
    fn dotfiles_need_a_listed_extension() {
        let filter = default_filter();
        assert!(filter.is_text_candidate(Path::new(".eslintrc.json")));
        assert!(!filter.is_text_candidate(Path::new(".gitignore")));
        assert!(!filter.is_text_candidate(Path::new(".env")));
        assert!(!filter.is_text_candidate(Path::new(".env.local")));
        assert!(!filter.is_text_candidate(Path::new("..json")));
        assert!(!filter.is_text_candidate(Path::new("src/...md")));
        assert!(filter.is_text_candidate(Path::new("..eslintrc.json")));
    }

    #[test]
    fn size_boundary_is_inclusive() {
        let filter = default_filter();
        let path = Path::new("big.js");
        assert_eq!(filter.check(path, DEFAULT_MAX_FILE_SIZE), Ok(()));
        assert_eq!(
            filter.check(path, DEFAULT_MAX_FILE_SIZE + 1),
            Err(SkipReason::TooLarge {
                size: DEFAULT_MAX_FILE_SIZE + 1,
                limit: DEFAULT_MAX_FILE_SIZE,
            })
        );
    }

    #[test]
    fn size_is_checked_before_name() {
        let filter = InclusionFilter::new(["js"], Vec::<String>::new(), 10);
        assert!(matches!(
            filter.check(Path::new("photo.png"), 11),
            Err(SkipReason::TooLarge { .. })
        ));
        assert_eq!(
            filter.check(Path::new("photo.png"), 5),
            Err(SkipReason::NotIncluded)
        );
    }

    #[test]
    fn pruner_matches_names_and_patterns() {
        let pruner = DirPruner::new(DEFAULT_EXPORT_EXCLUDES.iter().copied().chain(["*.egg-info"]));
        assert!(pruner.is_excluded("node_modules"));
        assert!(pruner.is_excluded(".git"));
        assert!(pruner.is_excluded("pkg.egg-info"));
        assert!(!pruner.is_excluded("src"));
        assert!(!pruner.is_excluded("node_modules_old"));

        let mut dirs = vec!["src".to_string(), "dist".to_string(), "docs".to_string()];
        pruner.prune(&mut dirs);
        assert_eq!(dirs, vec!["src".to_string(), "docs".to_string()]);
    }
}
