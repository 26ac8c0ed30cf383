//! Bounded in-memory chat history, oldest entry first.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::chat::quotes::Emotion;

pub const HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub user_message: String,
    pub bot_message: String,
    pub emotion: Emotion,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct ChatHistory {
    entries: Arc<Mutex<VecDeque<ChatEntry>>>,
    message_count: Arc<AtomicU64>,
}

impl ChatHistory {
    /// Counts an incoming message; returns true for the first one since startup.
    pub fn begin_message(&self) -> bool {
        self.message_count.fetch_add(1, Ordering::Relaxed) == 0
    }

    pub fn push(&self, entry: ChatEntry) {
        let mut entries = self.entries.lock();
        if entries.len() == HISTORY_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn snapshot(&self) -> Vec<ChatEntry> {
        self.entries.lock().iter().cloned().collect()
    }
}
