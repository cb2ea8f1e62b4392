//! Route changes requested by the client layer.
//!
//! The HTTP wrapper and the services never render anything; they ask a
//! [`Navigator`] to move the user (to `/login` after a failed refresh, to
//! `/` after login, ...). A browser shell would implement it with its
//! router; the CLI and the tests use [`HeadlessNavigator`].

use parking_lot::Mutex;
use tracing::debug;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const OAUTH_COMPLETE_PATH: &str = "/oauth/complete";

pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;

    fn navigate(&self, path: &str);
}

/// Routes where an anonymous 401 must not bounce the user to `/login`.
pub fn is_auth_route(path: &str) -> bool {
    path.is_empty()
        || path == HOME_PATH
        || path.starts_with(LOGIN_PATH)
        || path.starts_with(REGISTER_PATH)
        || path.starts_with(OAUTH_COMPLETE_PATH)
}

#[derive(Debug)]
struct NavState {
    current: String,
    history: Vec<String>,
}

/// In-memory router: tracks the current path and every navigation.
#[derive(Debug)]
pub struct HeadlessNavigator {
    state: Mutex<NavState>,
}

impl Default for HeadlessNavigator {
    fn default() -> Self {
        Self::at(HOME_PATH)
    }
}

impl HeadlessNavigator {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(NavState {
                current: path.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Paths navigated to, oldest first. The starting path is not included.
    pub fn history(&self) -> Vec<String> {
        self.state.lock().history.clone()
    }

    pub fn visited(&self, path: &str) -> bool {
        self.state.lock().history.iter().any(|p| p == path)
    }

    pub fn redirect_count(&self, path: &str) -> usize {
        self.state.lock().history.iter().filter(|p| *p == path).count()
    }
}

impl Navigator for HeadlessNavigator {
    fn current_path(&self) -> String {
        self.state.lock().current.clone()
    }

    fn navigate(&self, path: &str) {
        let mut state = self.state.lock();
        debug!(from = %state.current, to = path, "navigate");
        state.current = path.to_string();
        state.history.push(path.to_string());
    }
}
