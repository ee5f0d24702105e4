//! How many activity lines to show.

use std::fmt;

use serde::Deserialize;

/// Maximum number of lines in the activity section.
///
/// Always positive. Anything that is not a positive integer falls back to
/// [`Limit::DEFAULT`] rather than failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(usize);

impl Limit {
    pub const DEFAULT: Self = Self(10);

    /// Build a limit from a count, rejecting zero.
    pub fn new(n: usize) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    /// Parse a raw value, returning `None` when it is not a positive integer.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<usize>().ok().and_then(Self::new)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A limit as written by the user: TOML allows either `10` or `"10"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawLimit {
    Number(i64),
    Text(String),
}

impl RawLimit {
    /// Resolve to a valid limit, or `None` when the value is unusable.
    pub fn resolve(&self) -> Option<Limit> {
        match self {
            Self::Number(n) => usize::try_from(*n).ok().and_then(Limit::new),
            Self::Text(s) => Limit::parse(s),
        }
    }
}

impl fmt::Display for RawLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}
