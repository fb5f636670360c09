//! Authenticated HTTP transport.
//!
//! Wraps a `reqwest::Client` with two behaviours:
//!
//! - every request carries the current access token as a bearer credential;
//! - a 401 response triggers a single-flight token refresh. The first
//!   request to see the 401 performs the refresh, concurrent ones queue as
//!   waiters, and every request is resubmitted at most once.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::sync::oneshot;
use url::Url;

use crate::auth::{AuthFailureHook, SharedTokenStorage, TokenRefresher};
use crate::error::{Failure, Result, normalize};
use crate::query::Query;

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub struct FormPart {
    name: String,
    data: Vec<u8>,
    file_name: Option<String>,
    mime: Option<String>,
}

impl FormPart {
    /// A plain text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: value.into().into_bytes(),
            file_name: None,
            mime: None,
        }
    }

    /// A file field.
    pub fn file(name: impl Into<String>, file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
            file_name: Some(file_name.into()),
            mime: None,
        }
    }

    /// Set the part's content type.
    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    fn to_part(&self) -> std::result::Result<Part, reqwest::Error> {
        let mut part = Part::bytes(self.data.clone());
        if let Some(file_name) = &self.file_name {
            part = part.file_name(file_name.clone());
        }
        if let Some(mime) = &self.mime {
            part = part.mime_str(mime)?;
        }
        Ok(part)
    }
}

/// Request body. Kept in owned form so the request can be resubmitted.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// A request relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Query,
    pub body: Option<Body>,
    retried: bool,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            body: None,
            retried: false,
        }
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(Body::Multipart(parts));
        self
    }

    /// Whether this request has already been resubmitted after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Refresh coordination
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<()>>,
}

/// Clears the in-progress flag and releases waiters in enqueue order.
///
/// Runs on drop, so a refresher that fails or is cancelled still frees
/// everyone queued behind it.
struct RefreshGuard<'a> {
    state: &'a Mutex<RefreshState>,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.refreshing = false;
        for waiter in state.waiters.drain(..) {
            let _ = waiter.send(());
        }
    }
}

enum Role {
    Refresher,
    Waiter(oneshot::Receiver<()>),
}

enum RefreshOutcome {
    Retry,
    GiveUp,
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP transport with bearer injection and 401 recovery.
pub struct AuthTransport {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    storage: SharedTokenStorage,
    refresher: Option<Arc<dyn TokenRefresher>>,
    on_auth_failed: Option<Arc<dyn AuthFailureHook>>,
    refresh: Mutex<RefreshState>,
}

impl AuthTransport {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        timeout: Duration,
        storage: SharedTokenStorage,
        refresher: Option<Arc<dyn TokenRefresher>>,
        on_auth_failed: Option<Arc<dyn AuthFailureHook>>,
    ) -> Self {
        Self {
            http,
            base_url,
            timeout,
            storage,
            refresher,
            on_auth_failed,
            refresh: Mutex::new(RefreshState::default()),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the token storage.
    pub fn storage(&self) -> &SharedTokenStorage {
        &self.storage
    }

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }

    /// Send a request, recovering from a 401 once if a refresher is configured.
    ///
    /// Returns the decoded JSON body (`Null` for an empty body).
    pub async fn send(&self, mut spec: RequestSpec) -> Result<Value> {
        loop {
            let failure = match self.dispatch(&spec).await {
                Ok(body) => return Ok(body),
                Err(failure) => failure,
            };

            let unauthorized = matches!(failure, Failure::Transport { status: 401, .. });
            let Some(refresher) = self.refresher.as_ref().filter(|_| unauthorized) else {
                return Err(normalize(failure, None));
            };

            if spec.retried {
                tracing::debug!(path = %spec.path, "401 after retry, giving up");
                self.auth_failed().await;
                return Err(normalize(failure, None));
            }

            match self.refresh_or_wait(refresher.as_ref()).await {
                RefreshOutcome::Retry => {
                    spec.retried = true;
                    tracing::debug!(path = %spec.path, "Resubmitting request after refresh");
                }
                RefreshOutcome::GiveUp => {
                    self.auth_failed().await;
                    return Err(normalize(failure, None));
                }
            }
        }
    }

    /// Become the refresher, or wait for the one in flight to settle.
    async fn refresh_or_wait(&self, refresher: &dyn TokenRefresher) -> RefreshOutcome {
        let role = {
            let mut state = self.refresh.lock();
            if state.refreshing {
                let (tx, rx) = oneshot::channel();
                state.waiters.push_back(tx);
                Role::Waiter(rx)
            } else {
                state.refreshing = true;
                Role::Refresher
            }
        };

        match role {
            Role::Waiter(rx) => {
                tracing::debug!("Waiting for in-flight token refresh");
                // A dropped sender also means the refresh settled.
                let _ = rx.await;
                RefreshOutcome::Retry
            }
            Role::Refresher => {
                let guard = RefreshGuard {
                    state: &self.refresh,
                };

                let Some(refresh_token) = self.storage.get().and_then(|t| t.refresh_token) else {
                    tracing::warn!("Received 401 but no refresh token is stored");
                    return RefreshOutcome::GiveUp;
                };

                match refresher.refresh(&refresh_token).await {
                    Ok(tokens) => {
                        self.storage.set(Some(tokens));
                        drop(guard);
                        tracing::info!("Access token refreshed");
                        RefreshOutcome::Retry
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Token refresh failed");
                        RefreshOutcome::GiveUp
                    }
                }
            }
        }
    }

    async fn auth_failed(&self) {
        tracing::warn!("Authentication could not be recovered");
        if let Some(hook) = &self.on_auth_failed {
            hook.on_auth_failed().await;
        }
    }

    /// Issue a single attempt.
    async fn dispatch(&self, spec: &RequestSpec) -> std::result::Result<Value, Failure> {
        let url = self.url(&spec.path)?;
        tracing::debug!(method = %spec.method, %url, retried = spec.retried, "Sending request");

        let mut request = self
            .http
            .request(spec.method.clone(), url)
            .timeout(self.timeout);

        if !spec.query.is_empty() {
            request = request.query(spec.query.pairs());
        }

        if let Some(tokens) = self.storage.get()
            && !tokens.access_token.is_empty()
        {
            request = request.bearer_auth(tokens.access_token);
        }

        match &spec.body {
            Some(Body::Json(value)) => request = request.json(value),
            Some(Body::Multipart(parts)) => {
                let mut form = Form::new();
                for part in parts {
                    let built = part
                        .to_part()
                        .map_err(|e| Failure::Generic(Box::new(e)))?;
                    form = form.part(part.name.clone(), built);
                }
                request = request.multipart(form);
            }
            None => {}
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(%status, len = bytes.len(), "Received response");

        if status.is_success() {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            // Non-JSON text reaches the typed decode as a string
            return Ok(lenient_json(&bytes));
        }

        let body = if bytes.is_empty() {
            None
        } else {
            Some(lenient_json(&bytes))
        };

        Err(Failure::Transport {
            status: status.as_u16(),
            body,
            message: format!("Request failed with status code {}", status.as_u16()),
        })
    }
}

fn lenient_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

impl std::fmt::Debug for AuthTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTransport")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("refresher", &self.refresher.is_some())
            .field("on_auth_failed", &self.on_auth_failed.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_waiters_in_order() {
        let state = Mutex::new(RefreshState {
            refreshing: true,
            waiters: VecDeque::new(),
        });

        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = oneshot::channel();
            state.lock().waiters.push_back(tx);
            receivers.push(rx);
        }

        drop(RefreshGuard { state: &state });

        let state = state.lock();
        assert!(!state.refreshing);
        assert!(state.waiters.is_empty());
        for mut rx in receivers {
            assert!(rx.try_recv().is_ok());
        }
    }

    #[test]
    fn test_lenient_json() {
        assert_eq!(lenient_json(br#"{"ok":true}"#), serde_json::json!({"ok": true}));
        assert_eq!(lenient_json(b"Accepted"), Value::String("Accepted".to_string()));
    }

    #[test]
    fn test_request_spec_starts_unretried() {
        let spec = RequestSpec::new(Method::GET, "projects");
        assert!(!spec.is_retried());
        assert!(spec.body.is_none());
    }
}
