pub mod query_cache;
pub mod query_key;

pub use query_cache::QueryCache;
pub use query_key::QueryKey;

use std::time::Duration;

/// Default freshness window for session and project list queries.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

pub fn session_key() -> QueryKey {
    QueryKey::new(["session"])
}

pub fn features_key() -> QueryKey {
    QueryKey::new(["features"])
}

pub fn projects_key() -> QueryKey {
    QueryKey::new(["projects"])
}
