//! Authenticated HTTP wrapper.
//!
//! Every request carries the stored access token. A 401 gets exactly one
//! recovery attempt, serialized behind `refresh_gate`:
//!
//! 1. no stored token pair: send anonymous users to `/login` (unless they
//!    are already on an auth route) and hand the 401 back;
//! 2. the stored access token differs from the one that was rejected:
//!    another request already refreshed, so retry once with it;
//! 3. otherwise call `/auth/refresh`, store the new pair and retry once.
//!    A failed or empty refresh response clears both tokens, redirects to
//!    `/login` and yields [`ClientError::SessionExpired`].
//!
//! The refresh call goes straight to the transport and never re-enters
//! this recovery path.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::request::{ApiRequest, Method, MultipartBody, RawResponse, RequestBody};
use super::response::{handle_response, parse_unwrapped};
use super::retry::RetryPolicy;
use crate::config::client::ClientConfig;
use crate::error::ClientError;
use crate::logging::pii::Redacted;
use crate::models::api::{DataResponse, TokenResponse};
use crate::models::auth::RefreshTokenRequest;
use crate::session::cookies::CookieStore;
use crate::session::navigation::{is_auth_route, Navigator, LOGIN_PATH};
use crate::session::tokens::{self, TokenPair};

pub const REFRESH_ENDPOINT: &str = "/auth/refresh";

struct Inner {
    http: reqwest::Client,
    base_url: String,
    cookies: Arc<dyn CookieStore>,
    navigator: Arc<dyn Navigator>,
    refresh_gate: Mutex<()>,
    retry: RetryPolicy,
}

/// Cheap to clone; clones share the transport, cookie jar and refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        cookies: Arc<dyn CookieStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ClientError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                cookies,
                navigator,
                refresh_gate: Mutex::new(()),
                retry: config.retry,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn cookies(&self) -> &Arc<dyn CookieStore> {
        &self.inner.cookies
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.inner.base_url, endpoint)
    }

    /// One HTTP exchange. No 401 handling.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<RawResponse, ClientError> {
        let mut builder = self
            .inner
            .http
            .request(request.method.to_reqwest(), self.url(&request.endpoint));

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            // reqwest sets the multipart content type and boundary itself
            RequestBody::Multipart(body) => builder.multipart(body.to_form()?),
        };

        debug!(
            method = %request.method,
            endpoint = %Redacted(&request.endpoint),
            authenticated = token.is_some(),
            "api request"
        );

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(
            method = %request.method,
            endpoint = %Redacted(&request.endpoint),
            status,
            bytes = body.len(),
            "api response"
        );

        Ok(RawResponse { status, body })
    }

    /// Sends `request` with the stored access token, recovering from a 401
    /// at most once.
    pub async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ClientError> {
        let sent_token = tokens::access_token(self.cookies().as_ref())?;
        let response = self.dispatch(request, sent_token.as_deref()).await?;

        if response.status != 401 {
            return Ok(response);
        }

        self.recover_unauthorized(request, sent_token, response)
            .await
    }

    async fn recover_unauthorized(
        &self,
        request: &ApiRequest,
        sent_token: Option<String>,
        unauthorized: RawResponse,
    ) -> Result<RawResponse, ClientError> {
        let _gate = self.inner.refresh_gate.lock().await;
        let cookies = self.cookies().as_ref();

        let Some(pair) = tokens::load(cookies)? else {
            let path = self.navigator().current_path();
            if is_auth_route(&path) {
                debug!(path = %path, "401 without session on auth route");
            } else {
                info!(path = %path, "401 without session, redirecting to login");
                self.navigator().navigate(LOGIN_PATH);
            }
            return Ok(unauthorized);
        };

        if sent_token.as_deref() != Some(pair.access.as_str()) {
            debug!(endpoint = %Redacted(&request.endpoint), "token already rotated, retrying");
            return self.dispatch(request, Some(&pair.access)).await;
        }

        info!(endpoint = %Redacted(&request.endpoint), "access token rejected, refreshing");

        match self.refresh(&pair).await {
            Ok(Some(fresh)) => {
                tokens::store(cookies, &fresh)?;
                info!("token refreshed, retrying original request");
                self.dispatch(request, Some(&fresh.access)).await
            }
            Ok(None) => {
                warn!("refresh response carried no token pair");
                Ok(unauthorized)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, ending session");
                if let Err(clear_err) = tokens::clear(cookies) {
                    warn!(error = %clear_err, "failed to clear session cookies");
                }
                self.navigator().navigate(LOGIN_PATH);
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// Exchanges `pair` for a new one via `POST /auth/refresh`.
    ///
    /// A response without content is an error; a success envelope without
    /// a token pair is `Ok(None)`.
    pub async fn refresh(&self, pair: &TokenPair) -> Result<Option<TokenPair>, ClientError> {
        let body = serde_json::to_value(RefreshTokenRequest {
            token: pair.access.clone(),
            refresh_token: pair.refresh.clone(),
        })?;
        let request = ApiRequest::json(Method::Post, REFRESH_ENDPOINT, body);
        let raw = self.dispatch(&request, Some(&pair.access)).await?;
        let parsed: Option<TokenResponse> = handle_response(&raw)?;
        let parsed = parsed
            .ok_or_else(|| ClientError::decode(format!("{REFRESH_ENDPOINT} returned no content")))?;
        Ok(parsed.token_pair())
    }

    /// GET returning the `data` field of a `DataResponse<T>`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>, ClientError> {
        let raw = self.send(&ApiRequest::get(endpoint)).await?;
        let envelope: Option<DataResponse<T>> = handle_response(&raw)?;
        Ok(envelope.and_then(|e| e.data))
    }

    /// [`fetch`](Self::fetch) with exponential backoff on 5xx.
    pub async fn fetch_with_retry<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Option<T>, ClientError> {
        self.inner.retry.run(|| self.fetch::<T>(endpoint)).await
    }

    /// GET whose body is `T` itself rather than an envelope.
    pub async fn fetch_unwrapped<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Option<T>, ClientError> {
        let raw = self.send(&ApiRequest::get(endpoint)).await?;
        parse_unwrapped(&raw)
    }

    /// JSON request returning the whole validated envelope `R`.
    pub async fn mutate<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<Option<R>, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::json(method, endpoint, serde_json::to_value(body)?);
        let raw = self.send(&request).await?;
        handle_response(&raw)
    }

    /// [`mutate`](Self::mutate) with an empty `{}` body.
    pub async fn mutate_empty<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
    ) -> Result<Option<R>, ClientError> {
        self.mutate(method, endpoint, &serde_json::json!({})).await
    }

    /// Form-data upload.
    pub async fn mutate_multipart<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: MultipartBody,
    ) -> Result<Option<R>, ClientError> {
        let raw = self
            .send(&ApiRequest::multipart(method, endpoint, body))
            .await?;
        handle_response(&raw)
    }
}
