//! User Notification Sink
//!
//! Storage outcomes become user-visible messages through a fire-and-forget
//! sink. The store never consumes a return value from it, so a sink can be
//! a toast queue, a status bar, or just the log.

use tracing::{error, info, warn};

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Neutral information
    Info,
    /// An operation completed
    Success,
    /// Something degraded but recoverable happened
    Warning,
    /// An operation failed
    Error,
}

impl NoticeLevel {
    /// Get the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Fire-and-forget sink for user-visible messages
pub trait NotificationSink: Send + Sync {
    /// Deliver a message. Must not block and must not fail.
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Default sink that routes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info | NoticeLevel::Success => info!(level = level.as_str(), message),
            NoticeLevel::Warning => warn!(message),
            NoticeLevel::Error => error!(message),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingSink;
    use super::*;

    #[test]
    fn test_level_as_str() {
        assert_eq!(NoticeLevel::Success.as_str(), "success");
        assert_eq!(NoticeLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_recording_sink_captures_messages() {
        let sink = RecordingSink::default();
        sink.notify(NoticeLevel::Info, "hello");
        let notices = sink.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].1, "hello");
    }
}
