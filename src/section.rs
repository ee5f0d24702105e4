//! The activity section: a marker-delimited region inside a document.
//!
//! ```text
//! # My profile
//! <!--START_SECTION:activity-->
//! 1. 🎉 Merged pull request ...
//! 2. 🗣 Commented on issue ...
//! <!--END_SECTION:activity-->
//! footer
//! ```
//!
//! Only the lines strictly between the markers are ever rewritten.
//! Everything else, marker lines included, comes back byte-for-byte.

pub const START_MARKER: &str = "<!--START_SECTION:activity-->";
pub const END_MARKER: &str = "<!--END_SECTION:activity-->";

/// Body of a freshly synthesized document, replaced on the first merge.
pub const PLACEHOLDER: &str = "Sample Text";

/// Errors that can occur while merging into a document.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    #[error("couldn't find the activity section start marker `<!--START_SECTION:activity-->`")]
    MarkerNotFound,
}

/// A document as an ordered list of lines.
///
/// Split on `\n` only, so `\r`, trailing blank lines, and a missing final
/// newline all survive a parse/render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<String>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(String::from).collect(),
        }
    }

    /// The document to start from when the target file doesn't exist yet.
    pub fn synthesized() -> Self {
        Self {
            lines: default_document(),
        }
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Merge `entries` into this document's activity section.
    pub fn merge(&self, entries: &[String]) -> Result<Self, SectionError> {
        Ok(Self {
            lines: merge(&self.lines, entries)?,
        })
    }
}

/// Start marker, placeholder, end marker.
pub fn default_document() -> Vec<String> {
    vec![
        START_MARKER.to_string(),
        PLACEHOLDER.to_string(),
        END_MARKER.to_string(),
    ]
}

/// Prefix each entry with its 1-based position: `"1. ..."`, `"2. ..."`.
pub fn number(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}. {entry}", i + 1))
        .collect()
}

/// Replace the activity section's interior with the numbered `entries`.
///
/// - Both markers present: the lines between them are replaced.
/// - End marker missing after the start marker (absent, or only found
///   before it): the entries go right after the start marker, followed by a
///   fresh end marker. Everything that followed the start marker is kept
///   after that.
/// - Start marker missing: [`SectionError::MarkerNotFound`].
pub fn merge(document: &[String], entries: &[String]) -> Result<Vec<String>, SectionError> {
    let start = find_marker(document, START_MARKER).ok_or(SectionError::MarkerNotFound)?;
    let end = find_marker(&document[start + 1..], END_MARKER).map(|i| start + 1 + i);

    let numbered = number(entries);
    let mut merged = Vec::with_capacity(document.len() + numbered.len() + 1);
    merged.extend_from_slice(&document[..=start]);
    merged.extend(numbered);

    match end {
        Some(end) => merged.extend_from_slice(&document[end..]),
        None => {
            merged.push(END_MARKER.to_string());
            merged.extend_from_slice(&document[start + 1..]);
        }
    }

    Ok(merged)
}

/// Index of the first line equal to `marker` once surrounding whitespace is trimmed.
fn find_marker(document: &[String], marker: &str) -> Option<usize> {
    document.iter().position(|line| line.trim() == marker)
}
