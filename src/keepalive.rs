//! Keep-alive commits.
//!
//! Scheduled workflows get disabled after a stretch of repository
//! inactivity. An empty commit resets that clock.

use jiff::Timestamp;

use crate::git::{Committed, Git, GitError};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Settings for the keep-alive check.
#[derive(Debug, Clone)]
pub struct KeepAlive {
    pub enabled: bool,
    /// Make an empty commit once the last commit is more than this many days old.
    pub threshold_days: i64,
    pub message: String,
}

/// Whole days between `last` and `now`, rounded to the nearest day.
pub fn days_since(last: Timestamp, now: Timestamp) -> i64 {
    let secs = now.duration_since(last).as_secs();
    (secs + SECONDS_PER_DAY / 2).div_euclid(SECONDS_PER_DAY)
}

/// Whether a repository whose last commit was at `last` needs a keep-alive commit.
pub fn is_stale(last: Timestamp, now: Timestamp, threshold_days: i64) -> bool {
    days_since(last, now) > threshold_days
}

/// Make and push an empty commit if the repository has gone quiet.
///
/// Returns whether a commit was pushed.
pub fn run(settings: &KeepAlive, git: &Git, now: Timestamp) -> Result<bool, GitError> {
    if !settings.enabled {
        tracing::info!("empty commits are disabled by configuration");
        return Ok(false);
    }

    let last = git.last_commit_time()?;
    tracing::debug!(
        last_commit = %last,
        age_days = days_since(last, now),
        "checked repository activity"
    );

    if !is_stale(last, now, settings.threshold_days) {
        return Ok(false);
    }

    tracing::info!("creating an empty commit to keep the workflow active");
    if git.commit_empty(&settings.message)? == Committed::NothingToCommit {
        return Ok(false);
    }
    git.push()?;
    Ok(true)
}
