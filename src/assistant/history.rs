//! Bounded conversation history

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Who said a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Jarvis,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Jarvis => "JARVIS",
        }
    }
}

/// One line of the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    /// Wall-clock time as `HH:MM:SS`
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Fixed-capacity message log that drops the oldest entry when full
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<Message>,
    capacity: usize,
}

impl ConversationHistory {
    /// Default number of retained messages
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Creates an empty history; a zero capacity is raised to one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a message, evicting from the front until it fits
    pub fn push(&mut self, message: Message) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Message::new(Role::User, text));
    }

    pub fn push_jarvis(&mut self, text: impl Into<String>) {
        self.push(Message::new(Role::Jarvis, text));
    }

    /// Messages from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Message> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owned copy for snapshots
    pub fn to_vec(&self) -> Vec<Message> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}
