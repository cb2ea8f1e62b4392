//! Toast-style notifications.
//!
//! Callers turn errors into [`UserMessage`]s and hand them to a
//! [`Notifier`]. The CLI logs them; tests record them.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::error::ClientError;
use crate::errors::{user_message, UserMessage};
use crate::i18n::Locale;
use crate::session::navigation::{is_auth_route, Navigator, LOGIN_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn error(&self, title: &str, description: Option<&str>) {
        self.notify(notice(NoticeLevel::Error, title, description));
    }

    fn success(&self, title: &str, description: Option<&str>) {
        self.notify(notice(NoticeLevel::Success, title, description));
    }

    fn info(&self, title: &str, description: Option<&str>) {
        self.notify(notice(NoticeLevel::Info, title, description));
    }

    fn warning(&self, title: &str, description: Option<&str>) {
        self.notify(notice(NoticeLevel::Warning, title, description));
    }
}

fn notice(level: NoticeLevel, title: &str, description: Option<&str>) -> Notice {
    Notice {
        level,
        title: title.to_string(),
        description: description.map(str::to_string),
    }
}

/// Emits notices as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        let description = notice.description.as_deref().unwrap_or_default();
        match notice.level {
            NoticeLevel::Error => error!(title = %notice.title, description, "notice"),
            NoticeLevel::Warning => warn!(title = %notice.title, description, "notice"),
            NoticeLevel::Success | NoticeLevel::Info => {
                info!(level = ?notice.level, title = %notice.title, description, "notice")
            }
        }
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// Shows a failed call to the user and sends them to `/login` when the
/// error means they are no longer signed in.
#[derive(Clone)]
pub struct ErrorReporter {
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    locale: Locale,
}

impl ErrorReporter {
    pub fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>, locale: Locale) -> Self {
        Self {
            notifier,
            navigator,
            locale,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn report(&self, err: &ClientError) -> UserMessage {
        let message = user_message(err, self.locale);
        self.notifier
            .error(message.title, Some(message.description.as_str()));

        if err.requires_login() && !is_auth_route(&self.navigator.current_path()) {
            self.navigator.navigate(LOGIN_PATH);
        }
        message
    }
}
