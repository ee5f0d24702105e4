//! Shared test fixtures: a working clone wired to a bare remote.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use tempfile::TempDir;

/// A bare `remote.git` and a clone of it in `work`, with one initial
/// commit pushed and the upstream set.
pub struct TestRepo {
    root: TempDir,
    pub remote: PathBuf,
    pub work: PathBuf,
}

impl TestRepo {
    pub fn init() -> Self {
        let root = TempDir::new().unwrap();
        let remote = root.path().join("remote.git");
        let work = root.path().join("work");

        git(root.path(), &["init", "--quiet", "--bare", remote.to_str().unwrap()]);
        git(
            root.path(),
            &["clone", "--quiet", remote.to_str().unwrap(), work.to_str().unwrap()],
        );
        git(&work, &["config", "user.name", "Test"]);
        git(&work, &["config", "user.email", "test@example.com"]);
        git(&work, &["config", "commit.gpgsign", "false"]);
        git(&work, &["commit", "--quiet", "--allow-empty", "-m", "init"]);
        git(&work, &["push", "--quiet", "-u", "origin", "HEAD"]);

        Self { root, remote, work }
    }

    /// Commit and push an empty commit whose committer date is `date`
    /// (any format git accepts, e.g. `2020-01-01T00:00:00Z`).
    pub fn commit_dated(&self, message: &str, date: &str) {
        let output = Command::new("git")
            .args(["commit", "--quiet", "--allow-empty", "-m", message])
            .env("GIT_COMMITTER_DATE", date)
            .env("GIT_AUTHOR_DATE", date)
            .current_dir(&self.work)
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        git(&self.work, &["push", "--quiet"]);
    }

    /// Scratch space outside the working tree.
    pub fn scratch(&self) -> &Path {
        self.root.path()
    }

    /// Number of commits the remote has received.
    pub fn remote_commits(&self) -> usize {
        git(&self.remote, &["rev-list", "--count", "--all"])
            .trim()
            .parse()
            .unwrap()
    }

    /// Subject of the newest commit on the remote.
    pub fn remote_subject(&self) -> String {
        git(&self.remote, &["log", "--all", "-1", "--format=%s"])
            .trim()
            .to_string()
    }
}

/// Run git in `dir`, panicking with its stderr on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
