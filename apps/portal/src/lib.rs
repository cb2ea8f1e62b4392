#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod errors;
pub mod http;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod session;
pub mod state;
pub mod telemetry;

// Re-exports for public API
pub use auth::context::AuthContext;
pub use auth::permissions::{AuthLevel, Permission, Role};
pub use cache::{QueryCache, QueryKey};
pub use config::client::ClientConfig;
pub use error::ClientError;
pub use errors::{ResponseCode, ValidationError};
pub use http::client::ApiClient;
pub use http::retry::RetryPolicy;
pub use i18n::Locale;
pub use notify::{ErrorReporter, Notifier};
pub use session::cookies::{CookieStore, FileCookieStore, MemoryCookieStore};
pub use session::navigation::{HeadlessNavigator, Navigator};
pub use state::portal_state::{build_portal, PortalBuilder, PortalState};

// Prelude for test convenience
pub mod prelude {
    pub use super::auth::context::*;
    pub use super::auth::permissions::*;
    pub use super::error::*;
    pub use super::errors::*;
    pub use super::models::*;
    pub use super::session::*;
    pub use super::state::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    portal_test_support::test_logging::init();
}
