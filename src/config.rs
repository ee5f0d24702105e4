//! Run configuration.
//!
//! Resolved once at startup, then passed by reference into the run.
//! Each setting is taken from the first source that provides it:
//!
//! 1. command-line flag, or its `ACTIVITY_*` environment variable
//! 2. the config file: `--config <path>`, else `~/.activity/config.toml` if present
//! 3. the built-in default

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    github::EventSource,
    keepalive::KeepAlive,
    model::{Limit, RawLimit},
};

pub const DEFAULT_TARGET_FILE: &str = "README.md";
pub const DEFAULT_COMMIT_MESSAGE: &str = "⚡ Update README with the recent activity";
pub const DEFAULT_EMPTY_COMMIT_MESSAGE: &str = "dummy commit to keep the repository active";
pub const DEFAULT_COMMITTER_NAME: &str = "github-actions[bot]";
pub const DEFAULT_COMMITTER_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";
pub const DEFAULT_KEEP_ALIVE_DAYS: i64 = 50;

/// Errors that can occur while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error(
        "username required: pass --username, set ACTIVITY_USERNAME, \
         or add `username = \"...\"` to the config file"
    )]
    MissingUsername,
}

/// Settings from one source. Every key is optional; [`Config::resolve`]
/// layers sources and fills in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialConfig {
    /// GitHub user whose public activity is shown.
    pub username: Option<String>,
    /// Document holding the activity section.
    pub target_file: Option<PathBuf>,
    /// Number of activity lines to show.
    pub max_lines: Option<RawLimit>,
    pub commit_message: Option<String>,
    pub empty_commit_message: Option<String>,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
    pub enable_empty_commit: Option<bool>,
    pub keep_alive_days: Option<i64>,
    /// `GH_CONFIG_DIR` for `gh`, when its default login shouldn't be used.
    pub gh_config_dir: Option<PathBuf>,
    /// Read events from this JSON file instead of the GitHub API.
    #[serde(skip)]
    pub events_file: Option<PathBuf>,
}

impl PartialConfig {
    /// Load a config file.
    ///
    /// A missing file yields empty settings unless `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Fill every unset key from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            username: self.username.or(fallback.username),
            target_file: self.target_file.or(fallback.target_file),
            max_lines: self.max_lines.or(fallback.max_lines),
            commit_message: self.commit_message.or(fallback.commit_message),
            empty_commit_message: self.empty_commit_message.or(fallback.empty_commit_message),
            committer_name: self.committer_name.or(fallback.committer_name),
            committer_email: self.committer_email.or(fallback.committer_email),
            enable_empty_commit: self.enable_empty_commit.or(fallback.enable_empty_commit),
            keep_alive_days: self.keep_alive_days.or(fallback.keep_alive_days),
            gh_config_dir: self.gh_config_dir.or(fallback.gh_config_dir),
            events_file: self.events_file.or(fallback.events_file),
        }
    }
}

/// Who commits the updated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub username: Option<String>,
    pub target_file: PathBuf,
    pub limit: Limit,
    pub commit_message: String,
    pub committer: Committer,
    pub keep_alive: KeepAlive,
    pub gh_config_dir: Option<PathBuf>,
    pub events_file: Option<PathBuf>,
}

impl Config {
    /// Layer `primary` over `file` and fill in defaults.
    ///
    /// An unusable `max-lines` falls back to the default limit with a warning.
    pub fn resolve(primary: PartialConfig, file: PartialConfig) -> Self {
        let merged = primary.or(file);

        let limit = match &merged.max_lines {
            None => Limit::DEFAULT,
            Some(raw) => raw.resolve().unwrap_or_else(|| {
                tracing::warn!(
                    max_lines = %raw,
                    default = %Limit::DEFAULT,
                    "max-lines is not a positive integer, using the default"
                );
                Limit::DEFAULT
            }),
        };

        Self {
            username: merged.username.filter(|u| !u.is_empty()),
            target_file: merged
                .target_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_FILE)),
            limit,
            commit_message: merged
                .commit_message
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
            committer: Committer {
                name: merged
                    .committer_name
                    .unwrap_or_else(|| DEFAULT_COMMITTER_NAME.to_string()),
                email: merged
                    .committer_email
                    .unwrap_or_else(|| DEFAULT_COMMITTER_EMAIL.to_string()),
            },
            keep_alive: KeepAlive {
                enabled: merged.enable_empty_commit.unwrap_or(false),
                threshold_days: merged.keep_alive_days.unwrap_or(DEFAULT_KEEP_ALIVE_DAYS),
                message: merged
                    .empty_commit_message
                    .unwrap_or_else(|| DEFAULT_EMPTY_COMMIT_MESSAGE.to_string()),
            },
            gh_config_dir: merged.gh_config_dir,
            events_file: merged.events_file,
        }
    }

    /// Where this run's events come from.
    ///
    /// A local events file needs no username; the GitHub API does.
    pub fn event_source(&self) -> Result<EventSource, ConfigError> {
        if let Some(path) = &self.events_file {
            return Ok(EventSource::File(path.clone()));
        }

        let username = self.username.clone().ok_or(ConfigError::MissingUsername)?;
        Ok(EventSource::GitHub {
            username,
            gh_config: self.gh_config_dir.clone(),
        })
    }

    /// The default config file path: `~/.activity/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".activity").join("config.toml"))
    }
}
