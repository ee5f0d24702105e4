//! Core data model for the activity section.
//!
//! Events come in from the feed, a limit bounds how many of them are shown.

mod event;
mod limit;

pub use event::ActivityEvent;
pub use limit::{Limit, RawLimit};
