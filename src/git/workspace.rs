//! Staged-change collection, staged diff and commit over a git working tree.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{Diff, DiffFindOptions, DiffFormat, ErrorCode, Repository, Tree};
use tracing::{debug, warn};

use crate::commit::dispatch::{CommitReport, subject_line};
use crate::error::{CommitError, GitError};
use crate::git::change::{ChangeKind, StagedChange};

/// Maximum characters for the staged diff text before truncation.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// Unified diff of the index against HEAD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedDiff {
    pub text: String,
    pub truncated: bool,
}

impl StagedDiff {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The version-control operations the generator depends on.
///
/// This abstraction allows mocking the repository in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Files staged for the next commit.
    async fn staged_changes(&self) -> Result<Vec<StagedChange>, GitError>;

    /// Diff of the staged changes against the last commit.
    async fn staged_diff(&self) -> Result<StagedDiff, GitError>;

    /// Commit the index with the given message.
    async fn commit(&self, message: &str) -> Result<CommitReport, CommitError>;
}

/// A git working tree backed by git2.
///
/// The repository is reopened per operation so the workspace stays `Sync`.
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    git_dir: PathBuf,
    workdir: PathBuf,
}

impl GitWorkspace {
    /// Find the repository containing `start` (walking up parent directories).
    pub fn discover(start: &Path) -> Result<Self, GitError> {
        let repo = Repository::discover(start).map_err(GitError::NoRepository)?;
        Self::from_repository(&repo)
    }

    pub fn from_repository(repo: &Repository) -> Result<Self, GitError> {
        let workdir = repo.workdir().ok_or(GitError::BareRepository)?;
        Ok(Self {
            git_dir: repo.path().to_path_buf(),
            workdir: workdir.to_path_buf(),
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn open(&self) -> Result<Repository, GitError> {
        Repository::open(&self.git_dir).map_err(GitError::NoRepository)
    }

    /// Collect staged changes synchronously.
    pub fn collect_staged(&self) -> Result<Vec<StagedChange>, GitError> {
        let repo = self.open()?;
        let diff = staged_tree_diff(&repo)?;

        let mut changes = Vec::with_capacity(diff.deltas().len());
        for delta in diff.deltas() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(Path::to_path_buf);

            match path {
                Some(path) => changes.push(StagedChange::new(
                    self.workdir.join(path),
                    ChangeKind::from_delta(delta.status()),
                )),
                None => warn!("Skipping staged delta without a path"),
            }
        }

        debug!("Collected {} staged change(s)", changes.len());
        Ok(changes)
    }

    /// Render the staged diff synchronously.
    pub fn render_staged_diff(&self) -> Result<StagedDiff, GitError> {
        let repo = self.open()?;
        let diff = staged_tree_diff(&repo)?;

        let mut staged = StagedDiff::default();
        append_diff_text(&diff, &mut staged)?;
        Ok(staged)
    }

    /// Commit the current index on HEAD synchronously.
    pub fn commit_index(&self, message: &str) -> Result<CommitReport, CommitError> {
        if message.trim().is_empty() {
            return Err(CommitError::EmptyMessage);
        }

        let repo = Repository::open(&self.git_dir).map_err(CommitError::CommitFailed)?;

        let mut index = repo.index().map_err(CommitError::WriteTree)?;
        let tree_id = index.write_tree().map_err(CommitError::WriteTree)?;
        let tree = repo.find_tree(tree_id).map_err(CommitError::WriteTree)?;

        let sig = repo.signature().map_err(CommitError::Signature)?;

        // Initial commits have no parent
        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(CommitError::CommitFailed)?),
            Err(e) if is_unborn(&e) => None,
            Err(e) => return Err(CommitError::CommitFailed(e)),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .map_err(CommitError::CommitFailed)?;

        Ok(CommitReport {
            id: oid.to_string(),
            subject: subject_line(message).to_string(),
        })
    }
}

// git2 calls block on disk, so each one runs on the blocking pool.
#[async_trait]
impl VersionControl for GitWorkspace {
    async fn staged_changes(&self) -> Result<Vec<StagedChange>, GitError> {
        let workspace = self.clone();
        tokio::task::spawn_blocking(move || workspace.collect_staged()).await?
    }

    async fn staged_diff(&self) -> Result<StagedDiff, GitError> {
        let workspace = self.clone();
        tokio::task::spawn_blocking(move || workspace.render_staged_diff()).await?
    }

    async fn commit(&self, message: &str) -> Result<CommitReport, CommitError> {
        let workspace = self.clone();
        let message = message.to_string();
        tokio::task::spawn_blocking(move || workspace.commit_index(&message)).await?
    }
}

fn is_unborn(e: &git2::Error) -> bool {
    e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if is_unborn(&e) => return Ok(None),
        Err(e) => return Err(GitError::Head(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::Head)?;
    Ok(Some(tree))
}

/// Diff HEAD (or the empty tree) against the index, with rename/copy detection.
fn staged_tree_diff(repo: &Repository) -> Result<Diff<'_>, GitError> {
    let head_tree = resolve_head_tree(repo)?;
    let index = repo.index().map_err(GitError::Index)?;

    let mut diff = repo
        .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
        .map_err(GitError::DiffFailed)?;

    let mut find = DiffFindOptions::new();
    find.renames(true).copies(true);
    diff.find_similar(Some(&mut find))
        .map_err(GitError::DiffFailed)?;

    Ok(diff)
}

/// Append unified diff text, stopping once [`MAX_DIFF_LENGTH`] is reached.
fn append_diff_text(diff: &Diff<'_>, staged: &mut StagedDiff) -> Result<(), GitError> {
    let result = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if staged.truncated {
            return true;
        }

        let content = String::from_utf8_lossy(line.content());
        if staged.text.len() + content.len() + 1 > MAX_DIFF_LENGTH {
            staged.truncated = true;
            return true;
        }

        let origin = line.origin();
        if matches!(origin, '+' | '-' | ' ') {
            staged.text.push(origin);
        }
        staged.text.push_str(&content);
        true
    });

    result.map_err(GitError::DiffFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;

    fn init_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();
        (dir, repo)
    }

    fn stage(repo: &Repository, dir: &Path, rel: &str, content: &str) {
        let full = dir.join(rel);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(&full, content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(rel)).unwrap();
        index.write().unwrap();
    }

    fn commit_all(repo: &Repository, message: &str) {
        let sig = Signature::now("Test", "test@test.com").unwrap();
        let mut index = repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_staged_changes_in_unborn_repo() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "src/auth/login.js", "export {}\n");

        let ws = GitWorkspace::from_repository(&repo).unwrap();
        let changes = ws.collect_staged().unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind(), ChangeKind::Added);
        assert!(changes[0].path().is_absolute());
        assert!(changes[0].path().ends_with("src/auth/login.js"));
    }

    #[test]
    fn test_unstaged_files_are_ignored() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "a.txt", "a\n");
        std::fs::write(dir.path().join("untracked.txt"), "b\n").unwrap();

        let ws = GitWorkspace::from_repository(&repo).unwrap();
        let changes = ws.collect_staged().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].file_name(), "a.txt");
    }

    #[test]
    fn test_staged_modification_and_diff() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "file.txt", "original\n");
        commit_all(&repo, "init");
        stage(&repo, dir.path(), "file.txt", "modified\n");

        let ws = GitWorkspace::from_repository(&repo).unwrap();
        let changes = ws.collect_staged().unwrap();
        assert_eq!(changes[0].kind(), ChangeKind::Modified);

        let diff = ws.render_staged_diff().unwrap();
        assert!(diff.text.contains("-original"));
        assert!(diff.text.contains("+modified"));
        assert!(!diff.truncated);
    }

    #[test]
    fn test_staged_deletion() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "gone.txt", "bye\n");
        commit_all(&repo, "init");

        std::fs::remove_file(dir.path().join("gone.txt")).unwrap();
        let mut index = repo.index().unwrap();
        index.remove_path(Path::new("gone.txt")).unwrap();
        index.write().unwrap();

        let ws = GitWorkspace::from_repository(&repo).unwrap();
        let changes = ws.collect_staged().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind(), ChangeKind::Deleted);
    }

    #[test]
    fn test_diff_truncates_large_changes() {
        let (dir, repo) = init_repo();
        let big = "x".repeat(100) + "\n";
        stage(&repo, dir.path(), "big.txt", &big.repeat(500));

        let ws = GitWorkspace::from_repository(&repo).unwrap();
        let diff = ws.render_staged_diff().unwrap();
        assert!(diff.truncated);
        assert!(diff.text.len() <= MAX_DIFF_LENGTH);
    }

    #[test]
    fn test_commit_index_initial_commit() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "readme.md", "# hi\n");

        let ws = GitWorkspace::from_repository(&repo).unwrap();
        let report = ws
            .commit_index("docs: update readme.md\n\nUpdated documentation.")
            .unwrap();

        assert_eq!(report.subject, "docs: update readme.md");
        let commit = repo.find_commit(git2::Oid::from_str(&report.id).unwrap()).unwrap();
        assert_eq!(commit.parent_count(), 0);
        assert!(ws.collect_staged().unwrap().is_empty());
    }

    #[test]
    fn test_commit_index_rejects_blank_message() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "a.txt", "a\n");
        let ws = GitWorkspace::from_repository(&repo).unwrap();
        assert!(matches!(ws.commit_index("  \n"), Err(CommitError::EmptyMessage)));
    }

    #[tokio::test]
    async fn test_trait_operations_stage_diff_and_commit() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "src/app.js", "let a;\n");
        let ws = GitWorkspace::from_repository(&repo).unwrap();

        let changes = ws.staged_changes().await.unwrap();
        assert_eq!(changes.len(), 1);
        assert!(ws.staged_diff().await.unwrap().text.contains("+let a;"));

        let report = ws.commit("feat: add app.js").await.unwrap();
        assert_eq!(report.subject, "feat: add app.js");
        assert!(ws.staged_changes().await.unwrap().is_empty());
    }

    #[test]
    fn test_bare_repository_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init_bare(dir.path()).unwrap();
        assert!(matches!(
            GitWorkspace::from_repository(&repo),
            Err(GitError::BareRepository)
        ));
    }

    #[test]
    fn test_discover_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GitWorkspace::discover(dir.path()),
            Err(GitError::NoRepository(_))
        ));
    }
}
