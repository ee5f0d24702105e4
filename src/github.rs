//! GitHub activity feed: the user's recent public events.
//!
//! Fetched via the `gh` CLI, which handles authentication on its own
//! (`GH_TOKEN`, or the login stored under `GH_CONFIG_DIR`).
//! The raw JSON is decoded into [`ActivityEvent`]s in feed order.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::model::ActivityEvent;

/// How many events to ask the API for. The feed's own page maximum.
const PER_PAGE: u32 = 100;

/// Errors that can occur while fetching or decoding the feed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to run gh: {0}")]
    Spawn(#[source] io::Error),

    #[error("gh {args} failed: {stderr}")]
    Gh { args: String, stderr: String },

    #[error("failed to read events from {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("activity feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed {kind} in activity feed: {reason}")]
    Malformed { kind: String, reason: String },
}

/// Where the raw feed comes from.
#[derive(Debug, Clone)]
pub enum EventSource {
    /// The public events API for a user, through `gh api`.
    GitHub {
        username: String,
        gh_config: Option<PathBuf>,
    },

    /// A JSON file holding a previously fetched feed.
    File(PathBuf),
}

impl EventSource {
    /// Fetch and decode the feed.
    ///
    /// Any failure is fatal for the run: a partial feed is never returned.
    pub fn fetch(&self) -> Result<Vec<ActivityEvent>, FetchError> {
        let json = match self {
            Self::GitHub {
                username,
                gh_config,
            } => {
                let endpoint = format!("users/{username}/events/public?per_page={PER_PAGE}");
                gh(
                    &[
                        "api",
                        "-H",
                        "Accept: application/vnd.github+json",
                        &endpoint,
                    ],
                    gh_config.as_deref(),
                )?
            }
            Self::File(path) => fs::read_to_string(path).map_err(|source| FetchError::Read {
                path: path.display().to_string(),
                source,
            })?,
        };

        let events = parse_events(&json)?;
        tracing::debug!(count = events.len(), "fetched activity events");
        Ok(events)
    }
}

/// Run `gh` with the given args and return stdout.
fn gh(args: &[&str], gh_config: Option<&Path>) -> Result<String, FetchError> {
    let mut command = Command::new("gh");
    command.args(args);
    if let Some(dir) = gh_config {
        command.env("GH_CONFIG_DIR", dir);
    }

    let output = command.output().map_err(FetchError::Spawn)?;

    if !output.status.success() {
        return Err(FetchError::Gh {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ── Feed decoding ──

/// JSON shape of one entry in `GET /users/{user}/events/public`.
///
/// `payload` stays untyped until the event kind is known: its shape
/// differs per kind, and kinds we don't render may carry anything.
#[derive(Deserialize)]
struct GhEvent {
    #[serde(rename = "type")]
    kind: String,
    repo: GhRepo,
    #[serde(default)]
    payload: Value,
}

#[derive(Deserialize)]
struct GhRepo {
    name: String,
}

#[derive(Deserialize)]
struct GhIssue {
    number: u64,
}

#[derive(Deserialize)]
struct GhComment {
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct GhPullRequest {
    number: Option<u64>,
    #[serde(default)]
    merged: bool,
}

#[derive(Deserialize)]
struct GhReview {
    state: String,
}

#[derive(Deserialize)]
struct GhRelease {
    tag_name: Option<String>,
    name: Option<String>,
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct IssueCommentPayload {
    issue: GhIssue,
    comment: Option<GhComment>,
}

#[derive(Deserialize)]
struct IssuesPayload {
    action: String,
    issue: GhIssue,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    action: String,
    number: Option<u64>,
    pull_request: GhPullRequest,
}

#[derive(Deserialize)]
struct PullRequestReviewPayload {
    review: GhReview,
    pull_request: GhPullRequest,
}

#[derive(Deserialize)]
struct ReleasePayload {
    action: String,
    release: GhRelease,
}

/// Decode a feed (a JSON array of events) in order.
///
/// Unrecognized kinds decode to [`ActivityEvent::Unknown`]. A recognized
/// kind missing the fields it needs is a [`FetchError::Malformed`].
pub fn parse_events(json: &str) -> Result<Vec<ActivityEvent>, FetchError> {
    let raw: Vec<GhEvent> = serde_json::from_str(json)?;
    raw.into_iter().map(decode).collect()
}

fn decode(event: GhEvent) -> Result<ActivityEvent, FetchError> {
    let GhEvent {
        kind,
        repo: GhRepo { name: repo },
        payload,
    } = event;

    let decoded = match kind.as_str() {
        "IssueCommentEvent" => {
            let p: IssueCommentPayload = payload_as(&kind, payload)?;
            ActivityEvent::IssueComment {
                repo,
                number: p.issue.number,
                url: p.comment.and_then(|c| c.html_url),
            }
        }
        "IssuesEvent" => {
            let p: IssuesPayload = payload_as(&kind, payload)?;
            ActivityEvent::IssueAction {
                repo,
                number: p.issue.number,
                action: p.action,
            }
        }
        "PullRequestEvent" => {
            let p: PullRequestPayload = payload_as(&kind, payload)?;
            let number = p
                .pull_request
                .number
                .or(p.number)
                .ok_or_else(|| malformed(&kind, "missing pull request number"))?;
            ActivityEvent::PullRequestAction {
                repo,
                number,
                action: p.action,
                merged: p.pull_request.merged,
            }
        }
        "PullRequestReviewEvent" => {
            let p: PullRequestReviewPayload = payload_as(&kind, payload)?;
            let number = p
                .pull_request
                .number
                .ok_or_else(|| malformed(&kind, "missing pull request number"))?;
            ActivityEvent::PullRequestReview {
                repo,
                number,
                state: p.review.state,
            }
        }
        "ReleaseEvent" => {
            let p: ReleasePayload = payload_as(&kind, payload)?;
            let tag = [p.release.tag_name, p.release.name]
                .into_iter()
                .flatten()
                .map(|s| single_line(&s))
                .find(|s| !s.is_empty())
                .ok_or_else(|| malformed(&kind, "release has neither tag nor name"))?;
            ActivityEvent::ReleaseAction {
                repo,
                action: p.action,
                tag,
                url: p.release.html_url,
            }
        }
        _ => ActivityEvent::Unknown { kind, repo },
    };

    Ok(decoded)
}

fn payload_as<T: DeserializeOwned>(kind: &str, payload: Value) -> Result<T, FetchError> {
    serde_json::from_value(payload).map_err(|e| malformed(kind, &e.to_string()))
}

/// Collapse line breaks in free text (release names) so an entry stays one
/// document line.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn malformed(kind: &str, reason: &str) -> FetchError {
    FetchError::Malformed {
        kind: kind.to_string(),
        reason: reason.to_string(),
    }
}
