//! Publishing through the `git` CLI: commit the document, push, inspect history.

use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use jiff::Timestamp;

/// Errors that can occur while running git.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[source] io::Error),

    #[error("git {args} failed: {stderr}")]
    Failed { args: String, stderr: String },

    #[error("unexpected output from git {args}: {output:?}")]
    Parse { args: String, output: String },
}

pub type Result<T> = core::result::Result<T, GitError>;

/// Whether a commit actually recorded anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Committed {
    Yes,
    NothingToCommit,
}

/// A git working tree to operate on.
#[derive(Debug, Clone)]
pub struct Git {
    dir: PathBuf,
}

impl Git {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Set the commit identity for this repository.
    pub fn configure_committer(&self, name: &str, email: &str) -> Result<()> {
        self.run(&["config", "user.email", email])?;
        self.run(&["config", "user.name", name])?;
        Ok(())
    }

    /// Stage `path` and commit it.
    pub fn commit_file(&self, path: &Path, message: &str) -> Result<Committed> {
        let path = path.to_string_lossy();
        self.run(&["add", &path])?;
        self.commit(&["commit", "-m", message])
    }

    /// Record a commit with no changes.
    pub fn commit_empty(&self, message: &str) -> Result<Committed> {
        self.commit(&["commit", "--allow-empty", "-m", message])
    }

    pub fn push(&self) -> Result<()> {
        self.run(&["push"])?;
        Ok(())
    }

    /// When the most recent commit on `HEAD` was made.
    pub fn last_commit_time(&self) -> Result<Timestamp> {
        let args = ["--no-pager", "log", "-1", "--format=%ct"];
        let stdout = self.run(&args)?;
        parse_commit_time(&stdout).ok_or_else(|| GitError::Parse {
            args: args.join(" "),
            output: stdout,
        })
    }

    fn commit(&self, args: &[&str]) -> Result<Committed> {
        let output = self.output(args)?;
        if output.status.success() {
            return Ok(Committed::Yes);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if is_nothing_to_commit(&stdout) {
            tracing::debug!("git reports nothing to commit");
            return Ok(Committed::NothingToCommit);
        }

        Err(failure(args, &output))
    }

    /// Run a git command and return its stdout on success.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(args = %args.join(" "), "running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(GitError::Spawn)
    }
}

fn failure(args: &[&str], output: &Output) -> GitError {
    GitError::Failed {
        args: args.join(" "),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

fn is_nothing_to_commit(stdout: &str) -> bool {
    stdout.contains("nothing to commit")
}

/// Parse `%ct` output: seconds since the Unix epoch.
fn parse_commit_time(stdout: &str) -> Option<Timestamp> {
    let secs: i64 = stdout.trim().parse().ok()?;
    Timestamp::from_second(secs).ok()
}
