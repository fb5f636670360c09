//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{
    ApiTemplatesApi, AppsApi, AssistantsApi, FilesApi, InvitesApi, ModelsApi, ProjectsApi,
    SourcesApi, SubscribesApi, ThreadAssistantApi, ThreadsApi, UserApi, VaultsApi, WorkspacesApi,
};
use crate::auth::{
    AuthFailureHook, InMemoryTokenStorage, SharedTokenStorage, TokenRefresher, TokenStorage,
    Tokens,
};
use crate::error::{Result, normalize};
use crate::query::Query;
use crate::transport::{AuthTransport, FormPart, RequestSpec};

/// Default platform API root.
pub const DEFAULT_BASE_URL: &str = "https://api.dev.gpt-zator.ladcloud.ru/api/";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// GPTZator API client.
///
/// Cheap to clone; clones share the token storage and refresh state.
///
/// # Example
///
/// ```no_run
/// use gptzator_client::GptzatorClient;
///
/// # async fn example() -> gptzator_client::Result<()> {
/// let client = GptzatorClient::builder().build()?;
/// client.user().login("me@example.com", "secret").await?;
///
/// let apps = client.apps().list(Default::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct GptzatorClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
#[derive(Debug)]
struct ClientInner {
    transport: AuthTransport,
}

impl GptzatorClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        self.inner.transport.base_url()
    }

    /// The authenticated transport.
    pub fn transport(&self) -> &AuthTransport {
        &self.inner.transport
    }

    /// Replace or clear the current tokens (e.g. after an external SSO flow).
    pub fn set_tokens(&self, tokens: Option<Tokens>) {
        self.inner.transport.storage().set(tokens);
    }

    /// Current tokens, if any.
    pub fn tokens(&self) -> Option<Tokens> {
        self.inner.transport.storage().get()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the users API.
    pub fn user(&self) -> UserApi {
        UserApi::new(self.clone())
    }

    /// Access the apps API.
    pub fn apps(&self) -> AppsApi {
        AppsApi::new(self.clone())
    }

    /// Access the projects API.
    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(self.clone())
    }

    /// Access the threads API.
    pub fn threads(&self) -> ThreadsApi {
        ThreadsApi::new(self.clone())
    }

    /// Access the assistants API.
    pub fn assistants(&self) -> AssistantsApi {
        AssistantsApi::new(self.clone())
    }

    /// Access the assistant threads API.
    pub fn thread_assistant(&self) -> ThreadAssistantApi {
        ThreadAssistantApi::new(self.clone())
    }

    /// Access the vaults API.
    pub fn vaults(&self) -> VaultsApi {
        VaultsApi::new(self.clone())
    }

    /// Access the workspaces API.
    pub fn workspaces(&self) -> WorkspacesApi {
        WorkspacesApi::new(self.clone())
    }

    /// Access the workspace sources API.
    pub fn sources(&self) -> SourcesApi {
        SourcesApi::new(self.clone())
    }

    /// Access the files API.
    pub fn files(&self) -> FilesApi {
        FilesApi::new(self.clone())
    }

    /// Access the models API.
    pub fn models(&self) -> ModelsApi {
        ModelsApi::new(self.clone())
    }

    /// Access the organization invites API.
    pub fn invites(&self) -> InvitesApi {
        InvitesApi::new(self.clone())
    }

    /// Access the subscriptions and billing API.
    pub fn subscribes(&self) -> SubscribesApi {
        SubscribesApi::new(self.clone())
    }

    /// Access the API templates API.
    pub fn api_templates(&self) -> ApiTemplatesApi {
        ApiTemplatesApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Send a request and decode the body.
    pub(crate) async fn request<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let body = self.inner.transport.send(spec).await?;
        serde_json::from_value(body).map_err(|e| normalize(e, None))
    }

    /// Send a request and discard the body.
    pub(crate) async fn request_unit(&self, spec: RequestSpec) -> Result<()> {
        self.inner.transport.send(spec).await.map(|_| ())
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(RequestSpec::new(Method::GET, path)).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<T> {
        self.request(RequestSpec::new(Method::GET, path).query(query))
            .await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let spec = RequestSpec::new(Method::POST, path).json(to_json(body)?);
        self.request(spec).await
    }

    /// Make a POST request without a body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(RequestSpec::new(Method::POST, path)).await
    }

    /// Make a multipart POST request.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> Result<T> {
        self.request(RequestSpec::new(Method::POST, path).multipart(parts))
            .await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let spec = RequestSpec::new(Method::PATCH, path).json(to_json(body)?);
        self.request(spec).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(RequestSpec::new(Method::DELETE, path)).await
    }

    /// Make a DELETE request with query parameters.
    pub(crate) async fn delete_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<T> {
        self.request(RequestSpec::new(Method::DELETE, path).query(query))
            .await
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| normalize(e, None))
}

/// Builder for creating a [`GptzatorClient`].
pub struct ClientBuilder {
    base_url: Option<String>,
    token_storage: Option<SharedTokenStorage>,
    tokens: Option<Tokens>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    on_auth_failed: Option<Arc<dyn AuthFailureHook>>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            token_storage: None,
            tokens: None,
            refresher: None,
            on_auth_failed: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the token storage.
    pub fn token_storage(mut self, storage: impl TokenStorage + 'static) -> Self {
        self.token_storage = Some(Arc::new(storage));
        self
    }

    /// Set a token storage shared with other owners.
    pub fn shared_token_storage(mut self, storage: SharedTokenStorage) -> Self {
        self.token_storage = Some(storage);
        self
    }

    /// Seed the storage with tokens at build time.
    pub fn tokens(mut self, tokens: Tokens) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Enable 401 recovery with this refresher.
    pub fn refresher(mut self, refresher: impl TokenRefresher + 'static) -> Self {
        self.refresher = Some(Arc::new(refresher));
        self
    }

    /// Set the hook invoked when authentication cannot be recovered.
    pub fn on_auth_failed(mut self, hook: impl AuthFailureHook + 'static) -> Self {
        self.on_auth_failed = Some(Arc::new(hook));
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GptzatorClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url).map_err(|e| normalize(e, None))?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("gptzator-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(|e| normalize(e, None))?;

        let storage = self
            .token_storage
            .unwrap_or_else(|| Arc::new(InMemoryTokenStorage::new()));
        if let Some(tokens) = self.tokens {
            storage.set(Some(tokens));
        }

        Ok(GptzatorClient {
            inner: Arc::new(ClientInner {
                transport: AuthTransport::new(
                    http,
                    base_url,
                    self.timeout,
                    storage,
                    self.refresher,
                    self.on_auth_failed,
                ),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("token_storage", &self.token_storage)
            .field("refresher", &self.refresher.is_some())
            .field("on_auth_failed", &self.on_auth_failed.is_some())
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
