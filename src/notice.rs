//! User Notices
//!
//! Cloneable channel every failure path reports through; the UI drains the
//! receiver and renders toasts/inline messages. Nothing fails silently.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// One human-readable message for the author or learner
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone)]
pub struct NoticeSink {
    tx: mpsc::UnboundedSender<Notice>,
}

impl NoticeSink {
    /// Create a sink and the receiver the UI drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        // Ignore send errors (no receivers is OK)
        let _ = self.tx.send(Notice {
            level,
            message: message.into(),
        });
    }
}
