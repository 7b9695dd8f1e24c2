//! Normalized staged-change descriptors.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::Delta;

/// Kind of pending change recorded for a staged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Unknown,
}

impl ChangeKind {
    /// Map a git2 delta status to a change kind.
    pub fn from_delta(delta: Delta) -> Self {
        match delta {
            Delta::Added | Delta::Untracked => ChangeKind::Added,
            Delta::Modified | Delta::Typechange => ChangeKind::Modified,
            Delta::Deleted => ChangeKind::Deleted,
            Delta::Renamed => ChangeKind::Renamed,
            Delta::Copied => ChangeKind::Copied,
            _ => ChangeKind::Unknown,
        }
    }

    /// Map a `git diff --name-status` code (`A`, `M`, `R100`, ...) to a change kind.
    ///
    /// Unrecognized codes degrade to [`ChangeKind::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => ChangeKind::Added,
            Some('M') | Some('T') => ChangeKind::Modified,
            Some('D') => ChangeKind::Deleted,
            Some('R') => ChangeKind::Renamed,
            Some('C') => ChangeKind::Copied,
            _ => ChangeKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "Added",
            ChangeKind::Modified => "Modified",
            ChangeKind::Deleted => "Deleted",
            ChangeKind::Renamed => "Renamed",
            ChangeKind::Copied => "Copied",
            ChangeKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One staged file and the kind of change recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedChange {
    path: PathBuf,
    kind: ChangeKind,
}

impl StagedChange {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Final path component, e.g. `login.js`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Lowercased extension including the leading dot, e.g. `.md`.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
    }

    /// Basename of the containing directory, e.g. `auth` for `src/auth/login.js`.
    pub fn parent_name(&self) -> Option<String> {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// Normalize raw `(path, code)` pairs into staged changes, joining relative
/// paths onto `root`.
pub fn normalize<I, P, C>(root: &Path, raw: I) -> Vec<StagedChange>
where
    I: IntoIterator<Item = (P, C)>,
    P: AsRef<Path>,
    C: AsRef<str>,
{
    raw.into_iter()
        .map(|(path, code)| {
            let path = path.as_ref();
            let absolute = if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            };
            StagedChange::new(absolute, ChangeKind::from_code(code.as_ref()))
        })
        .collect()
}
