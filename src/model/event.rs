//! Activity events: one unit of a user's public GitHub history.

/// A single entry from the public activity feed.
///
/// Only the kinds that render into the activity section get their own
/// variant. Everything else decodes to [`ActivityEvent::Unknown`] and is
/// dropped by the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    /// A comment on an issue or pull request conversation.
    IssueComment {
        repo: String,
        number: u64,
        /// Direct link to the comment, when the feed carries one.
        url: Option<String>,
    },

    /// An issue was opened, closed, reopened, etc.
    IssueAction {
        repo: String,
        number: u64,
        action: String,
    },

    /// A pull request changed state.
    ///
    /// `merged` wins over `action`: a merged PR arrives as `closed`.
    PullRequestAction {
        repo: String,
        number: u64,
        action: String,
        merged: bool,
    },

    /// A review was submitted on a pull request.
    PullRequestReview {
        repo: String,
        number: u64,
        state: String,
    },

    /// A release was published, created, edited, etc.
    ReleaseAction {
        repo: String,
        action: String,
        /// Tag name, or the release name when the tag is missing.
        tag: String,
        /// Direct link to the release page, when the feed carries one.
        url: Option<String>,
    },

    /// Any event kind the activity section does not show.
    Unknown { kind: String, repo: String },
}

impl ActivityEvent {
    /// Whether the event renders into the activity section.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown { .. })
    }
}
