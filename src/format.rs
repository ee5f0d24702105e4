//! Rendering activity events into markdown lines.
//!
//! Pure transformation: events in, one line per recognized event out.
//! Feed order is kept as-is.

use crate::model::{ActivityEvent, Limit};

/// Render the first `limit` recognized events.
///
/// Unknown kinds are filtered out before truncation, so they never take a slot.
pub fn format_events(events: &[ActivityEvent], limit: Limit) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.is_recognized())
        .take(limit.get())
        .filter_map(render)
        .collect()
}

/// Render a single event, or `None` for kinds the section doesn't show.
pub fn render(event: &ActivityEvent) -> Option<String> {
    let line = match event {
        ActivityEvent::IssueComment { repo, number, url } => {
            let link = url
                .clone()
                .unwrap_or_else(|| issue_url(repo, *number));
            format!(
                "🗣 Commented on issue [#{number}]({link}) in {}",
                repo_link(repo)
            )
        }
        ActivityEvent::IssueAction {
            repo,
            number,
            action,
        } => {
            let verb = match action.as_str() {
                "opened" => "❗ Opened".to_string(),
                "reopened" => "🔓 Reopened".to_string(),
                "closed" => "🔒 Closed".to_string(),
                other => capitalize(other),
            };
            format!(
                "{verb} issue [#{number}]({}) in {}",
                issue_url(repo, *number),
                repo_link(repo)
            )
        }
        ActivityEvent::PullRequestAction {
            repo,
            number,
            action,
            merged,
        } => {
            let (emoji, verb) = if *merged {
                ("🎉", "Merged".to_string())
            } else if action == "opened" {
                ("💪", capitalize(action))
            } else {
                ("❌", capitalize(action))
            };
            format!(
                "{emoji} {verb} pull request [#{number}]({}) in {}",
                pull_url(repo, *number),
                repo_link(repo)
            )
        }
        ActivityEvent::PullRequestReview {
            repo,
            number,
            state,
        } => {
            let state = match state.as_str() {
                "approved" => "✅ Approved".to_string(),
                "changes_requested" => "🔄 Changes Requested".to_string(),
                "commented" => "💬 Commented".to_string(),
                other => capitalize(other),
            };
            format!(
                "{state} on pull request [#{number}]({}) in {}",
                pull_url(repo, *number),
                repo_link(repo)
            )
        }
        ActivityEvent::ReleaseAction {
            repo,
            action,
            tag,
            url,
        } => {
            let link = url
                .clone()
                .unwrap_or_else(|| format!("https://github.com/{repo}/releases/tag/{tag}"));
            format!(
                "🚀 {} release [{tag}]({link}) in {}",
                capitalize(action),
                repo_link(repo)
            )
        }
        ActivityEvent::Unknown { .. } => return None,
    };
    Some(line)
}

/// Uppercase the first character, leave the rest alone.
///
/// `"changes_requested"` becomes `"Changes_requested"`, not title case.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn repo_link(repo: &str) -> String {
    format!("[{repo}](https://github.com/{repo})")
}

fn issue_url(repo: &str, number: u64) -> String {
    format!("https://github.com/{repo}/issues/{number}")
}

fn pull_url(repo: &str, number: u64) -> String {
    format!("https://github.com/{repo}/pull/{number}")
}
