//! User-facing notifications.
//!
//! Every caught failure and every completed write turns into a [`Notice`].
//! Read paths that degrade instead of failing return their value wrapped in
//! [`Reported`] together with the notices raised while producing it.

use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// A value together with the notices raised while producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reported<T> {
    pub value: T,
    pub notices: Vec<Notice>,
}

impl<T> Reported<T> {
    /// A value with no notices.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            notices: Vec::new(),
        }
    }

    pub fn with_notice(value: T, notice: Notice) -> Self {
        Self {
            value,
            notices: vec![notice],
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Whether any notice is an error.
    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.level == NoticeLevel::Error)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reported<U> {
        Reported {
            value: f(self.value),
            notices: self.notices,
        }
    }

    /// Split into the value and its notices, appending the notices to `sink`.
    pub fn drain_into(self, sink: &mut Vec<Notice>) -> T {
        sink.extend(self.notices);
        self.value
    }
}
