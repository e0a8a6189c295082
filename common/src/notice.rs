//! ユーザー向けの一時通知（トースト）

use std::time::{Duration, Instant};

pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
            expires_at: Instant::now() + DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.expires_at = Instant::now() + duration;
        self
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    pub fn empty_export() -> Self {
        Self::new(NoticeLevel::Error, "Cannot generate PDF", "Please add at least one page.")
    }

    pub fn generating() -> Self {
        Self::new(NoticeLevel::Info, "Generating PDF...", "Please wait a moment.")
    }

    pub fn saved() -> Self {
        Self::new(NoticeLevel::Success, "Success!", "PDF saved to your device.")
    }

    pub fn shared() -> Self {
        Self::new(NoticeLevel::Success, "Shared!", "PDF handed to the share target.")
    }

    pub fn share_unsupported() -> Self {
        Self::new(
            NoticeLevel::Error,
            "Share Not Supported",
            "This system does not support sharing files.",
        )
    }

    pub fn export_failed() -> Self {
        Self::new(NoticeLevel::Error, "Error", "Failed to generate PDF.")
    }

    pub fn import_failed(file_name: &str, reason: &str) -> Self {
        Self::new(NoticeLevel::Error, "Import failed", format!("{}: {}", file_name, reason))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.title, self.description)
    }
}

/// 通知キュー（新しいものが先頭）
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn push(&mut self, notice: Notice) {
        self.notices.insert(0, notice);
    }

    /// 期限切れを除去。変化があれば true
    pub fn prune(&mut self) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| !n.is_expired());
        self.notices.len() != before
    }

    pub fn current(&self) -> Option<&Notice> {
        self.notices.first()
    }

    pub fn all(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn dismiss(&mut self) {
        if !self.notices.is_empty() {
            self.notices.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
