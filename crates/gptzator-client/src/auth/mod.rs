//! Credentials and the caller-supplied authentication callbacks.

mod storage;

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use storage::{
    DEFAULT_STORAGE_KEY, FileTokenStorage, InMemoryTokenStorage, SharedTokenStorage, TokenStorage,
};

/// Credential pair issued by the platform.
///
/// Replaced wholesale on login, refresh and logout.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    /// Bearer token attached to every request.
    pub access_token: String,
    /// Token exchanged for a new pair when the access token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Tokens {
    /// Create a pair with only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Set the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }
}

impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Exchanges a refresh token for a new credential pair.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Perform the refresh.
    async fn refresh(&self, refresh_token: &str) -> Result<Tokens>;
}

#[async_trait]
impl<F, Fut> TokenRefresher for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Tokens>> + Send,
{
    async fn refresh(&self, refresh_token: &str) -> Result<Tokens> {
        (self)(refresh_token.to_string()).await
    }
}

/// Called when authentication cannot be recovered.
///
/// Typically forces a logout in the embedding application.
#[async_trait]
pub trait AuthFailureHook: Send + Sync {
    /// React to the failure.
    async fn on_auth_failed(&self);
}

#[async_trait]
impl<F, Fut> AuthFailureHook for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn on_auth_failed(&self) {
        (self)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_tokens_serialize_camel_case() {
        let tokens = Tokens::new("a").with_refresh_token("r");
        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");

        let bare = serde_json::to_value(Tokens::new("a")).unwrap();
        assert!(bare.get("refreshToken").is_none());
    }

    #[test]
    fn test_tokens_debug_is_redacted() {
        let tokens = Tokens::new("secret-access").with_refresh_token("secret-refresh");
        let debug = format!("{:?}", tokens);
        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn test_closure_refresher() {
        let refresher = |refresh: String| async move {
            Ok::<_, crate::error::ApiError>(Tokens::new(format!("new-{}", refresh)))
        };
        let tokens = refresher.refresh("r1").await.unwrap();
        assert_eq!(tokens.access_token, "new-r1");
    }

    #[tokio::test]
    async fn test_closure_hook() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let hook = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {}
        };
        hook.on_auth_failed().await;
        hook.on_auth_failed().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
