#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;
use std::time::Duration;

use portal::notify::RecordingNotifier;
use portal::session::tokens::{self, TokenPair};
use portal::{
    build_portal, ClientConfig, HeadlessNavigator, MemoryCookieStore, PortalState, RetryPolicy,
};
use portal_test_support::MockApi;
use serde_json::{json, Value};

pub mod proptest_prelude;

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    portal_test_support::test_logging::init();
}

/// A portal wired to a fresh mock API, with in-memory cookies, router and
/// notifier the test can inspect.
pub struct Harness {
    pub api: MockApi,
    pub state: PortalState,
    pub cookies: Arc<MemoryCookieStore>,
    pub navigator: Arc<HeadlessNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_at("/dashboard").await
    }

    /// Starts with the router on `path`.
    pub async fn start_at(path: &str) -> Self {
        let api = MockApi::start().await.expect("mock api should start");
        let config = ClientConfig::new(api.base_url())
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::new(3, Duration::from_millis(1)));

        let cookies = Arc::new(MemoryCookieStore::new());
        let navigator = Arc::new(HeadlessNavigator::at(path));
        let notifier = Arc::new(RecordingNotifier::new());

        let state = build_portal(config)
            .with_cookies(cookies.clone())
            .with_navigator(navigator.clone())
            .with_notifier(notifier.clone())
            .build()
            .expect("portal state should build");

        Self {
            api,
            state,
            cookies,
            navigator,
            notifier,
        }
    }

    pub fn sign_in(&self, access: &str, refresh: &str) {
        tokens::store(self.cookies.as_ref(), &TokenPair::new(access, refresh))
            .expect("tokens should be stored");
    }

    pub fn stored_tokens(&self) -> Option<TokenPair> {
        tokens::load(self.cookies.as_ref()).expect("cookie jar should be readable")
    }
}

pub fn user_json(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "name": "Ayşe",
        "surname": "Yılmaz",
        "o_auth": false,
        "email": "ayse@example.test",
        "role": role,
        "is_verified": true,
        "language": "tr"
    })
}

pub fn project_json(id: &str, owner_id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": "Kampüs pazaryeri",
        "description": "Öğrenci projeleri için pazar yeri",
        "status": status,
        "owner": {
            "id": owner_id,
            "name": "Mehmet",
            "avatarUrl": null,
            "email": "mehmet@example.test"
        },
        "tags": ["rust"],
        "createdAt": "2025-03-01T10:00:00Z"
    })
}

pub fn page_json(projects: Vec<Value>) -> Value {
    let total = projects.len();
    json!({
        "projects": projects,
        "currentPage": 0,
        "totalPages": 1,
        "totalElements": total
    })
}
