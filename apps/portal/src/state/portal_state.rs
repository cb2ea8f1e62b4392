use std::sync::Arc;

use crate::cache::QueryCache;
use crate::config::client::ClientConfig;
use crate::error::ClientError;
use crate::http::client::ApiClient;
use crate::notify::{ErrorReporter, Notifier, TracingNotifier};
use crate::services::locale;
use crate::session::cookies::{CookieStore, MemoryCookieStore};
use crate::session::navigation::{HeadlessNavigator, Navigator};

/// Everything the services share: the API client, its cookie jar and
/// router, the query cache and the notifier.
#[derive(Clone)]
pub struct PortalState {
    config: ClientConfig,
    client: ApiClient,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for PortalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalState")
            .field("config", &self.config)
            .field("client", &self.client)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl PortalState {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn cookies(&self) -> &Arc<dyn CookieStore> {
        self.client.cookies()
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        self.client.navigator()
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Error reporter speaking the locale stored in the cookie jar.
    pub fn reporter(&self) -> ErrorReporter {
        ErrorReporter::new(
            self.notifier.clone(),
            self.navigator().clone(),
            locale::current(self),
        )
    }
}

/// Builder for [`PortalState`]; unset parts default to in-memory
/// implementations.
pub struct PortalBuilder {
    config: ClientConfig,
    cookies: Option<Arc<dyn CookieStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl PortalBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            cookies: None,
            navigator: None,
            notifier: None,
        }
    }

    pub fn with_cookies(mut self, cookies: Arc<dyn CookieStore>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> Result<PortalState, ClientError> {
        let cookies = self
            .cookies
            .unwrap_or_else(|| Arc::new(MemoryCookieStore::new()));
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(HeadlessNavigator::default()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier));

        let client = ApiClient::new(&self.config, cookies, navigator)?;

        Ok(PortalState {
            config: self.config,
            client,
            cache: QueryCache::new(),
            notifier,
        })
    }
}

pub fn build_portal(config: ClientConfig) -> PortalBuilder {
    PortalBuilder::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::session::navigation::HOME_PATH;

    #[test]
    fn build_uses_in_memory_defaults() {
        let state = build_portal(ClientConfig::new("http://127.0.0.1:9/api/"))
            .build()
            .unwrap();
        assert_eq!(state.client().base_url(), "http://127.0.0.1:9/api");
        assert_eq!(state.navigator().current_path(), HOME_PATH);
        assert!(state.cookies().get("authToken").unwrap().is_none());
        assert_eq!(state.reporter().locale(), Locale::Tr);
    }

    #[test]
    fn explicit_parts_are_used() {
        let navigator = Arc::new(HeadlessNavigator::at("/projects"));
        let state = build_portal(ClientConfig::new("http://127.0.0.1:9"))
            .with_navigator(navigator.clone())
            .build()
            .unwrap();
        state.navigator().navigate("/dashboard");
        assert_eq!(navigator.current_path(), "/dashboard");
    }
}
