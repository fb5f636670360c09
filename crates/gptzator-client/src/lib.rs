//! HTTP client SDK for the GPTZator application platform.
//!
//! This crate provides a typed client for the platform's REST API, with
//! bearer authentication and transparent token refresh.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use gptzator_client::{CallAppOptions, GptzatorClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = GptzatorClient::builder()
//!     .base_url("https://api.dev.gpt-zator.ladcloud.ru/api/")
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//!
//! client.user().login("me@example.com", "secret").await?;
//!
//! // Run an application to completion
//! let project = client
//!     .projects()
//!     .call_app("app-id", "A landing page for a bakery", CallAppOptions::default())
//!     .await?;
//! for artefact in &project.artefacts {
//!     println!("{}: {}", artefact.name, artefact.data);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Authentication
//!
//! Tokens live in a [`TokenStorage`]. When a request receives a 401 and a
//! [`TokenRefresher`] is configured, the client refreshes once (concurrent
//! requests wait for the same refresh) and resubmits. If that fails the
//! [`AuthFailureHook`] runs and the original error is returned.
//!
//! # Errors
//!
//! Every method returns [`ApiError`], whose message is prefixed with the
//! operation that failed, e.g. `[ProjectsApi.get] Not Found`.

pub mod api;
pub mod auth;
pub mod call;
pub mod client;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;
pub mod workflow;

pub use auth::{
    AuthFailureHook, DEFAULT_STORAGE_KEY, FileTokenStorage, InMemoryTokenStorage,
    SharedTokenStorage, TokenRefresher, TokenStorage, Tokens,
};
pub use call::api_call;
pub use client::{ClientBuilder, DEFAULT_BASE_URL, GptzatorClient};
pub use error::{ApiError, ErrorKind, Failure, Result, handle_api_error, normalize};
pub use query::Query;
pub use transport::{AuthTransport, Body, FormPart, RequestSpec};
pub use types::*;
pub use workflow::{CallAppOptions, GenerationBackend, call_app};

// Re-export query types used with list methods
pub use api::{
    ListAppsQuery, ListInvitesQuery, ListProjectsQuery, ListThreadsQuery, ListVaultsQuery,
    SettingsTemplatesQuery,
};
