//! Content source abstraction

use super::{sort_by_date_desc, ContentEntry};
use crate::error::ContentSourceError;

/// Anything that can hand the builder every content document in one query.
///
/// Implementations return entries sorted by date, newest first, with ties in
/// retrieval order.
pub trait ContentSource {
    fn query(&self) -> Result<Vec<ContentEntry>, ContentSourceError>;
}

/// Entries held in memory, mostly for tests and programmatic builds
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<ContentEntry>,
}

impl MemorySource {
    pub fn new(entries: Vec<ContentEntry>) -> Self {
        Self { entries }
    }
}

impl ContentSource for MemorySource {
    fn query(&self) -> Result<Vec<ContentEntry>, ContentSourceError> {
        let mut entries = self.entries.clone();
        sort_by_date_desc(&mut entries);
        Ok(entries)
    }
}
