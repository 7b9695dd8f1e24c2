//! The set of staged changes for one generation request.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::git::{ChangeKind, StagedChange};

/// Module label used when changes span more than one directory.
pub const FALLBACK_MODULE: &str = "files";

const TEST_DIR: &str = "test";
const TEST_INFIXES: [&str; 2] = [".test.", ".spec."];
const DOC_EXTENSIONS: [&str; 3] = [".md", ".txt", ".rst"];
const STYLE_EXTENSIONS: [&str; 3] = [".css", ".scss", ".less"];
const CONFIG_EXTENSIONS: [&str; 3] = [".json", ".yml", ".yaml"];
const CONFIG_FILES: [&str; 2] = [".eslintrc", ".prettierrc"];
const SCRIPT_EXTENSIONS: [&str; 4] = [".js", ".jsx", ".ts", ".tsx"];

/// Non-empty, ordered staged changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<StagedChange>,
    root: Option<PathBuf>,
}

/// Attributes derived once per request and consumed by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeProfile {
    pub extensions: BTreeSet<String>,
    pub module: String,
    pub file_count: usize,
    /// File name of the only change, when there is exactly one.
    pub single_file: Option<String>,
    pub has_tests: bool,
    pub has_docs: bool,
    pub has_styles: bool,
    pub has_config: bool,
    pub all_scripts: bool,
    pub all_added: bool,
}

impl ChangeSet {
    /// Build a change set; `None` when nothing is staged.
    pub fn new(changes: Vec<StagedChange>) -> Option<Self> {
        if changes.is_empty() {
            None
        } else {
            Some(Self {
                changes,
                root: None,
            })
        }
    }

    /// Record the working-tree root so paths can be shown relative to it.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn changes(&self) -> &[StagedChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Path of a change relative to the working-tree root, if known.
    pub fn display_path<'a>(&self, change: &'a StagedChange) -> &'a Path {
        match &self.root {
            Some(root) => change.path().strip_prefix(root).unwrap_or(change.path()),
            None => change.path(),
        }
    }

    /// One-line summaries such as `src/auth/login.js (Added)`.
    pub fn file_summaries(&self) -> Vec<String> {
        self.changes
            .iter()
            .map(|c| format!("{} ({})", self.display_path(c).display(), c.kind()))
            .collect()
    }

    pub fn profile(&self) -> ChangeProfile {
        let extensions: BTreeSet<String> =
            self.changes.iter().filter_map(StagedChange::extension).collect();

        let parents: BTreeSet<String> = self
            .changes
            .iter()
            .map(|c| c.parent_name().unwrap_or_default())
            .collect();
        let module = match parents.len() {
            1 => parents
                .into_iter()
                .next()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| FALLBACK_MODULE.to_string()),
            _ => FALLBACK_MODULE.to_string(),
        };

        let single_file = match self.changes.as_slice() {
            [only] => Some(only.file_name()),
            _ => None,
        };

        let has_ext = |set: &[&str]| extensions.iter().any(|e| set.contains(&e.as_str()));

        ChangeProfile {
            module,
            file_count: self.changes.len(),
            single_file,
            has_tests: self.changes.iter().any(|c| self.is_test_path(c)),
            has_docs: has_ext(&DOC_EXTENSIONS),
            has_styles: has_ext(&STYLE_EXTENSIONS),
            has_config: has_ext(&CONFIG_EXTENSIONS)
                || self.changes.iter().any(is_config_file),
            all_scripts: self.changes.iter().all(|c| {
                c.extension()
                    .is_some_and(|e| SCRIPT_EXTENSIONS.contains(&e.as_str()))
            }),
            all_added: self.changes.iter().all(|c| c.kind() == ChangeKind::Added),
            extensions,
        }
    }

    /// A test directory segment below the root, or a `.test.`/`.spec.` file name.
    fn is_test_path(&self, change: &StagedChange) -> bool {
        let name = change.file_name().to_lowercase();
        if TEST_INFIXES.iter().any(|infix| name.contains(infix)) {
            return true;
        }

        let relative = self.display_path(change);
        relative
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .any(|component| match component {
                Component::Normal(segment) => {
                    let segment = segment.to_string_lossy().to_lowercase();
                    segment == TEST_DIR
                }
                _ => false,
            })
    }
}

fn is_config_file(change: &StagedChange) -> bool {
    let name = change.file_name().to_lowercase();
    CONFIG_FILES.iter().any(|marker| name.starts_with(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entries: &[(&str, ChangeKind)]) -> ChangeSet {
        ChangeSet::new(
            entries
                .iter()
                .map(|(p, k)| StagedChange::new(format!("/repo/{p}"), *k))
                .collect(),
        )
        .unwrap()
        .with_root("/repo")
    }

    #[test]
    fn test_empty_change_set_is_rejected() {
        assert!(ChangeSet::new(Vec::new()).is_none());
    }

    #[test]
    fn test_single_directory_module() {
        let profile = set(&[
            ("src/auth/login.js", ChangeKind::Added),
            ("src/auth/session.js", ChangeKind::Modified),
        ])
        .profile();
        assert_eq!(profile.module, "auth");
        assert_eq!(profile.file_count, 2);
        assert!(profile.single_file.is_none());
    }

    #[test]
    fn test_multiple_directories_fall_back() {
        let profile = set(&[
            ("src/auth/login.js", ChangeKind::Added),
            ("src/api/client.js", ChangeKind::Added),
        ])
        .profile();
        assert_eq!(profile.module, FALLBACK_MODULE);
    }

    #[test]
    fn test_extension_set_is_unique_and_lowercase() {
        let profile = set(&[
            ("a/One.MD", ChangeKind::Modified),
            ("a/two.md", ChangeKind::Modified),
            ("a/three.css", ChangeKind::Modified),
        ])
        .profile();
        let exts: Vec<&str> = profile.extensions.iter().map(String::as_str).collect();
        assert_eq!(exts, vec![".css", ".md"]);
        assert!(profile.has_docs);
        assert!(profile.has_styles);
    }

    #[test]
    fn test_test_markers() {
        assert!(set(&[("src/test/helpers.js", ChangeKind::Modified)]).profile().has_tests);
        assert!(set(&[("src/login.test.js", ChangeKind::Modified)]).profile().has_tests);
        assert!(set(&[("src/login.spec.ts", ChangeKind::Modified)]).profile().has_tests);
        assert!(!set(&[("src/contest.js", ChangeKind::Modified)]).profile().has_tests);
        assert!(!set(&[("src/latest/a.js", ChangeKind::Modified)]).profile().has_tests);
    }

    #[test]
    fn test_plural_tests_directory_is_not_a_marker() {
        let profile = set(&[("tests/guide.md", ChangeKind::Modified)]).profile();
        assert!(!profile.has_tests);
        assert!(profile.has_docs);
    }

    #[test]
    fn test_root_directory_named_test_is_not_a_marker() {
        let changes = ChangeSet::new(vec![StagedChange::new(
            "/home/me/test/project/src/app.js",
            ChangeKind::Modified,
        )])
        .unwrap()
        .with_root("/home/me/test/project");
        assert!(!changes.profile().has_tests);
    }

    #[test]
    fn test_config_markers() {
        assert!(set(&[("package.json", ChangeKind::Modified)]).profile().has_config);
        assert!(set(&[(".github/ci.yml", ChangeKind::Modified)]).profile().has_config);
        assert!(set(&[(".eslintrc", ChangeKind::Modified)]).profile().has_config);
        assert!(set(&[(".prettierrc", ChangeKind::Added)]).profile().has_config);
        assert!(!set(&[("src/app.js", ChangeKind::Added)]).profile().has_config);
    }

    #[test]
    fn test_all_scripts_and_all_added() {
        let profile = set(&[
            ("src/a.js", ChangeKind::Added),
            ("src/b.tsx", ChangeKind::Added),
        ])
        .profile();
        assert!(profile.all_scripts);
        assert!(profile.all_added);

        let profile = set(&[
            ("src/a.js", ChangeKind::Added),
            ("src/b.rs", ChangeKind::Added),
        ])
        .profile();
        assert!(!profile.all_scripts);

        let profile = set(&[
            ("src/a.js", ChangeKind::Added),
            ("src/b.js", ChangeKind::Renamed),
        ])
        .profile();
        assert!(!profile.all_added);
    }

    #[test]
    fn test_file_summaries_are_relative() {
        let summaries = set(&[("src/auth/login.js", ChangeKind::Added)]).file_summaries();
        assert_eq!(summaries, vec!["src/auth/login.js (Added)"]);
    }
}
