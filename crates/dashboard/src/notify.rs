//! Notification sink.
//!
//! Screens report mutation outcomes here instead of through a module-level
//! toast dispatcher; the front end drains the queue on its own cadence. The
//! sink is owned by the application context and torn down with it.

use std::sync::Mutex;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Notifier {
    pending: Mutex<Vec<Notice>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    fn push(&self, level: NoticeLevel, message: String) {
        tracing::debug!(?level, %message, "notice");
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(Notice { level, message });
        }
    }

    /// Take all pending notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => vec![],
        }
    }
}
