//! Notification seam for transient user-facing notices.
//!
//! Toast presentation belongs to the embedding UI; the engine only decides
//! when a notice is due and what it says.

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A transient, dismissible notice
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }
}

/// Pluggable sink for notices
pub trait Notify: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sink that only logs - for headless use and tests
pub struct LogNotifier;

impl Notify for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => log::info!("{}: {}", notice.title, notice.description),
            Severity::Error => log::warn!("{}: {}", notice.title, notice.description),
        }
    }
}
