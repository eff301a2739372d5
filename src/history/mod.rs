//! Histories of submitted overlay input
//!
//! One [`CommandHistory`] per [`HistoryBucket`]: ex commands, searches (shared
//! by both directions) and expressions.

pub mod command;

pub use command::{CommandHistory, DEFAULT_CAPACITY};

use std::sync::Arc;

use crate::mode::HistoryBucket;

/// The set of histories owned by one overlay service
#[derive(Debug, Clone)]
pub struct HistoryStore {
    command: Arc<CommandHistory>,
    search: Arc<CommandHistory>,
    expression: Arc<CommandHistory>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStore {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            command: Arc::new(CommandHistory::new(capacity)),
            search: Arc::new(CommandHistory::new(capacity)),
            expression: Arc::new(CommandHistory::new(capacity)),
        }
    }

    /// History for `bucket`
    #[must_use]
    pub fn bucket(&self, bucket: HistoryBucket) -> Arc<CommandHistory> {
        match bucket {
            HistoryBucket::Command => Arc::clone(&self.command),
            HistoryBucket::Search => Arc::clone(&self.search),
            HistoryBucket::Expression => Arc::clone(&self.expression),
        }
    }
}
