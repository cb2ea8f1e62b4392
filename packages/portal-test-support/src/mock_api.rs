//! Scriptable stand-in for the portal REST API.
//!
//! A real actix-web server bound to a random local port. Tests script
//! responses per `(method, path)` and, optionally, per bearer token, then
//! inspect every request the client made.

use std::collections::VecDeque;
use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Option<Value>,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
            delay: None,
        }
    }

    /// Bare status with an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: None,
            delay: None,
        }
    }

    pub fn no_content() -> Self {
        Self::status(204)
    }

    /// `{"code": 0}`
    pub fn ok() -> Self {
        Self::json(200, json!({ "code": 0 }))
    }

    /// `{"code": 0, "data": data}`
    pub fn data(data: Value) -> Self {
        Self::json(200, json!({ "code": 0, "data": data }))
    }

    /// HTTP 200 carrying a failed envelope.
    pub fn api_error(code: Value, message: &str) -> Self {
        Self::json(200, json!({ "code": code, "message": message }))
    }

    /// Successful token response as returned by login and refresh.
    pub fn tokens(access: &str, refresh: &str) -> Self {
        Self::json(
            200,
            json!({ "code": 0, "token": access, "refresh_token": refresh }),
        )
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub bearer: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

struct Rule {
    method: String,
    path: String,
    bearer: Option<String>,
    queued: VecDeque<MockResponse>,
    fallback: Option<MockResponse>,
}

impl Rule {
    fn is_for(&self, method: &str, path: &str, bearer: Option<&str>) -> bool {
        self.method == method && self.path == path && self.bearer.as_deref() == bearer
    }
}

#[derive(Default)]
struct MockState {
    rules: Mutex<Vec<Rule>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn rule_mut<'a>(
        rules: &'a mut Vec<Rule>,
        method: &str,
        path: &str,
        bearer: Option<&str>,
    ) -> &'a mut Rule {
        if let Some(i) = rules.iter().position(|r| r.is_for(method, path, bearer)) {
            return &mut rules[i];
        }
        rules.push(Rule {
            method: method.to_string(),
            path: path.to_string(),
            bearer: bearer.map(str::to_string),
            queued: VecDeque::new(),
            fallback: None,
        });
        let last = rules.len() - 1;
        &mut rules[last]
    }

    /// Token-specific rules win over catch-all ones; queued responses are
    /// used before the sticky fallback.
    fn next_response(&self, method: &str, path: &str, bearer: Option<&str>) -> Option<MockResponse> {
        let mut rules = self.rules.lock();
        let mut order = Vec::with_capacity(2);
        if bearer.is_some() {
            order.push(bearer);
        }
        order.push(None);

        for candidate in order {
            if let Some(rule) = rules.iter_mut().find(|r| r.is_for(method, path, candidate)) {
                if let Some(response) = rule.queued.pop_front().or_else(|| rule.fallback.clone()) {
                    return Some(response);
                }
            }
        }
        None
    }
}

async fn dispatch(req: HttpRequest, body: web::Bytes, state: web::Data<MockState>) -> HttpResponse {
    let method = req.method().as_str().to_string();
    let path = req.path().to_string();
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: req.query_string().to_string(),
        bearer: bearer.clone(),
        content_type,
        body: serde_json::from_slice(&body).ok(),
    });

    let Some(response) = state.next_response(&method, &path, bearer.as_deref()) else {
        debug!(method = %method, path = %path, "mock api: no route");
        return HttpResponse::NotFound().finish();
    };

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.body {
        Some(body) => HttpResponse::build(status).json(body),
        None => HttpResponse::build(status).finish(),
    }
}

pub struct MockApi {
    addr: SocketAddr,
    handle: ServerHandle,
    state: web::Data<MockState>,
}

impl MockApi {
    /// Starts the server on `127.0.0.1:0`. Must run inside a tokio runtime.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let state = web::Data::new(MockState::default());
        let app_state = state.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .default_service(web::to(dispatch))
        })
        .workers(1)
        .listen(listener)?
        .run();

        let handle = server.handle();
        tokio::spawn(server);

        Ok(Self {
            addr,
            handle,
            state,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answers every matching request with `response`.
    pub fn respond(&self, method: &str, path: &str, response: MockResponse) -> &Self {
        let mut rules = self.state.rules.lock();
        MockState::rule_mut(&mut rules, method, path, None).fallback = Some(response);
        self
    }

    /// Answers the next matching request with `response`, ahead of any
    /// sticky response.
    pub fn respond_once(&self, method: &str, path: &str, response: MockResponse) -> &Self {
        let mut rules = self.state.rules.lock();
        MockState::rule_mut(&mut rules, method, path, None)
            .queued
            .push_back(response);
        self
    }

    /// Like [`respond`](Self::respond), only for requests carrying `token`
    /// as their bearer token.
    pub fn respond_for_token(
        &self,
        method: &str,
        path: &str,
        token: &str,
        response: MockResponse,
    ) -> &Self {
        let mut rules = self.state.rules.lock();
        MockState::rule_mut(&mut rules, method, path, Some(token)).fallback = Some(response);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn calls(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().clear();
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
