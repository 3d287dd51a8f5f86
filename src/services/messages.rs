//! Notifications, status text and console output produced by plugins and
//! by the host while it runs them.

use std::collections::VecDeque;

use tracing::{info, warn};

const MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Transient popup notification
    Notify,
    /// Status line text
    Status,
    /// Console output (`print`, `fm::console`)
    Console,
    /// Plugin faults and load failures
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

/// Bounded log of messages; the oldest entries fall off first
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: VecDeque<Message>,
    status: Option<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!(target: "burrow::notify", "{text}");
        self.push(Level::Notify, text);
    }

    pub fn status(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.status = Some(text.clone());
        self.push(Level::Status, text);
    }

    pub fn console(&mut self, text: impl Into<String>) {
        self.push(Level::Console, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(target: "burrow::console", "{text}");
        self.push(Level::Error, text);
    }

    fn push(&mut self, level: Level, text: String) {
        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(Message { level, text });
    }

    pub fn entries(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|m| m.text.contains(needle))
    }

    /// Take everything logged so far
    pub fn drain(&mut self) -> Vec<Message> {
        self.entries.drain(..).collect()
    }
}
