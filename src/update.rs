//! One run of the activity updater.
//!
//! ```text
//! keep-alive check → fetch events → format → read document → merge
//!                  → write document → commit → push
//! ```
//!
//! Each step fails into one [`UpdateError`] variant. A failed step aborts
//! the run; the document is only written after a successful merge.

use jiff::Timestamp;

use crate::{
    config::{Config, ConfigError},
    format::format_events,
    git::{Committed, Git, GitError},
    github::FetchError,
    keepalive,
    model::ActivityEvent,
    section::{Document, SectionError},
    storage::{self, StorageError},
};

/// Why a run failed.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Section(#[from] SectionError),

    #[error("failed to fetch activity: {0}")]
    UpstreamFetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to publish: {0}")]
    Publish(#[from] GitError),
}

/// A merged document, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub document: Document,
    /// Number of activity lines in the section.
    pub entries: usize,
    /// The target file didn't exist; the document was synthesized.
    pub synthesized: bool,
    /// The result differs from what's on disk.
    pub changed: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The section already showed this activity; nothing was written.
    Unchanged,
    /// The document was written but not committed.
    Written,
    /// The document was written, committed and pushed.
    Published,
}

/// Merge `entries` into the existing document text.
///
/// `None` means the file doesn't exist: a default document is synthesized
/// and the entries are applied to it right away.
pub fn render(existing: Option<&str>, entries: &[String]) -> Result<Rendered, SectionError> {
    let (base, synthesized) = match existing {
        Some(text) => (Document::parse(text), false),
        None => (Document::synthesized(), true),
    };

    let document = base.merge(entries)?;
    let changed = synthesized || document != base;

    Ok(Rendered {
        document,
        entries: entries.len(),
        synthesized,
        changed,
    })
}

/// Fetch, format and merge, without touching disk or git.
pub fn compute(config: &Config) -> Result<Rendered, UpdateError> {
    let source = config.event_source()?;
    let events = source.fetch()?;
    for event in &events {
        if let ActivityEvent::Unknown { kind, repo } = event {
            tracing::debug!(kind = %kind, repo = %repo, "skipping unrecognized event");
        }
    }
    let entries = format_events(&events, config.limit);
    tracing::debug!(
        events = events.len(),
        entries = entries.len(),
        limit = %config.limit,
        "formatted activity"
    );

    let existing = storage::read_document(&config.target_file)?;
    if existing.is_none() {
        tracing::info!(
            path = %config.target_file.display(),
            "target file not found, starting from a new document"
        );
    }

    Ok(render(existing.as_deref(), &entries)?)
}

/// Run the full update.
///
/// With `publish` unset the document is written but git is left alone,
/// including the keep-alive check.
pub fn run(config: &Config, git: &Git, publish: bool) -> Result<Outcome, UpdateError> {
    if publish {
        keepalive::run(&config.keep_alive, git, Timestamp::now())?;
    }

    let rendered = compute(config)?;
    tracing::info!(
        entries = rendered.entries,
        changed = rendered.changed,
        synthesized = rendered.synthesized,
        "activity section computed"
    );

    if !rendered.changed {
        tracing::info!("activity section is already up to date");
        return Ok(Outcome::Unchanged);
    }

    storage::write_document(&config.target_file, &rendered.document.to_text())?;
    tracing::info!(path = %config.target_file.display(), "activity updated");

    if !publish {
        return Ok(Outcome::Written);
    }

    git.configure_committer(&config.committer.name, &config.committer.email)?;
    if git.commit_file(&config.target_file, &config.commit_message)? == Committed::NothingToCommit {
        return Ok(Outcome::Written);
    }
    git.push()?;
    tracing::info!("activity pushed");

    Ok(Outcome::Published)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{fs, path::Path};

    use tempfile::TempDir;

    use crate::{
        config::PartialConfig,
        model::RawLimit,
        section::{END_MARKER, START_MARKER},
        test_utils::{self, TestRepo},
    };

    const FEED: &str = r#"[
        {
            "type": "PullRequestEvent",
            "repo": { "name": "org/repo" },
            "payload": { "action": "closed", "pull_request": { "number": 1, "merged": true } }
        },
        {
            "type": "WatchEvent",
            "repo": { "name": "org/other" },
            "payload": { "action": "started" }
        },
        {
            "type": "IssuesEvent",
            "repo": { "name": "org/repo" },
            "payload": { "action": "opened", "issue": { "number": 2 } }
        }
    ]"#;

    fn entries(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn test_config(dir: &Path, max_lines: Option<&str>) -> Config {
        let events = dir.join("events.json");
        fs::write(&events, FEED).unwrap();

        let flags = PartialConfig {
            target_file: Some(dir.join("README.md")),
            events_file: Some(events),
            max_lines: max_lines.map(|m| RawLimit::Text(m.to_string())),
            ..PartialConfig::default()
        };
        Config::resolve(flags, PartialConfig::default())
    }

    /// Target inside the clone, events file outside it so the tree stays clean.
    fn repo_config(repo: &TestRepo) -> Config {
        let events = repo.scratch().join("events.json");
        fs::write(&events, FEED).unwrap();

        let flags = PartialConfig {
            target_file: Some(repo.work.join("README.md")),
            events_file: Some(events),
            ..PartialConfig::default()
        };
        Config::resolve(flags, PartialConfig::default())
    }

    #[test]
    fn render_missing_document_applies_entries_immediately() {
        let rendered = render(None, &entries(&["first"])).unwrap();

        assert!(rendered.synthesized);
        assert!(rendered.changed);
        assert_eq!(
            rendered.document.to_text(),
            format!("{START_MARKER}\n1. first\n{END_MARKER}")
        );
    }

    #[test]
    fn render_detects_no_change() {
        let text = format!("# Me\n{START_MARKER}\n1. first\n{END_MARKER}\n");

        let rendered = render(Some(&text), &entries(&["first"])).unwrap();

        assert!(!rendered.changed);
        assert_eq!(rendered.document.to_text(), text);
    }

    #[test]
    fn render_without_start_marker_fails() {
        let err = render(Some("# Just a title\n"), &entries(&["x"])).unwrap_err();
        assert_eq!(err, SectionError::MarkerNotFound);
    }

    #[test]
    fn run_writes_document_without_publishing() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), None);
        let target = dir.path().join("README.md");
        fs::write(
            &target,
            format!("# Hi\n{START_MARKER}\nstale\n{END_MARKER}\nfooter\n"),
        )
        .unwrap();

        let outcome = run(&config, &Git::new(dir.path()), false).unwrap();

        assert_eq!(outcome, Outcome::Written);
        let written = fs::read_to_string(&target).unwrap();
        assert_eq!(
            written,
            format!(
                "# Hi\n{START_MARKER}\n\
                 1. 🎉 Merged pull request [#1](https://github.com/org/repo/pull/1) in [org/repo](https://github.com/org/repo)\n\
                 2. ❗ Opened issue [#2](https://github.com/org/repo/issues/2) in [org/repo](https://github.com/org/repo)\n\
                 {END_MARKER}\nfooter\n"
            )
        );
    }

    #[test]
    fn second_run_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), None);
        let git = Git::new(dir.path());

        assert_eq!(run(&config, &git, false).unwrap(), Outcome::Written);
        let first = fs::read_to_string(dir.path().join("README.md")).unwrap();

        assert_eq!(run(&config, &git, false).unwrap(), Outcome::Unchanged);
        let second = fs::read_to_string(dir.path().join("README.md")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn run_respects_limit() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), Some("1"));

        run(&config, &Git::new(dir.path()), false).unwrap();

        let written = fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert!(written.contains("1. 🎉 Merged"));
        assert!(!written.contains("2. "));
    }

    #[test]
    fn run_with_missing_marker_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), None);
        let target = dir.path().join("README.md");
        fs::write(&target, "# No section here\n").unwrap();

        let err = run(&config, &Git::new(dir.path()), false).unwrap_err();

        assert!(matches!(err, UpdateError::Section(SectionError::MarkerNotFound)));
        assert_eq!(fs::read_to_string(&target).unwrap(), "# No section here\n");
    }

    #[test]
    fn run_with_broken_feed_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), None);
        fs::write(dir.path().join("events.json"), "{ not json").unwrap();

        let err = run(&config, &Git::new(dir.path()), false).unwrap_err();

        assert!(matches!(err, UpdateError::UpstreamFetch(_)));
        assert!(!dir.path().join("README.md").exists());
    }

    #[test]
    fn compute_without_username_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let flags = PartialConfig {
            target_file: Some(dir.path().join("README.md")),
            ..PartialConfig::default()
        };
        let config = Config::resolve(flags, PartialConfig::default());

        let err = compute(&config).unwrap_err();
        assert!(matches!(
            err,
            UpdateError::Configuration(ConfigError::MissingUsername)
        ));
    }

    #[test]
    fn publish_pushes_one_commit_then_settles() {
        let repo = TestRepo::init();
        let config = repo_config(&repo);
        let git = Git::new(&repo.work);

        assert_eq!(run(&config, &git, true).unwrap(), Outcome::Published);
        assert_eq!(repo.remote_commits(), 2);
        assert_eq!(repo.remote_subject(), config.commit_message);

        assert_eq!(run(&config, &git, true).unwrap(), Outcome::Unchanged);
        assert_eq!(repo.remote_commits(), 2);
    }

    #[test]
    fn publish_with_stale_repository_adds_keep_alive_commit() {
        let repo = TestRepo::init();
        repo.commit_dated("old work", "2020-01-01T00:00:00Z");
        let mut config = repo_config(&repo);
        config.keep_alive.enabled = true;
        let git = Git::new(&repo.work);

        assert_eq!(run(&config, &git, true).unwrap(), Outcome::Published);

        // init, old work, keep-alive, document update
        assert_eq!(repo.remote_commits(), 4);
        let subjects = test_utils::git(&repo.remote, &["log", "--all", "-2", "--format=%s"]);
        assert_eq!(
            subjects.lines().collect::<Vec<_>>(),
            [config.commit_message.as_str(), config.keep_alive.message.as_str()]
        );
    }
}
