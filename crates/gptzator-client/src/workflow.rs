//! Run an application to completion: create a project, start generation,
//! then poll until the project settles.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, Result};
use crate::types::{CreateProjectRequest, Project};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const CANCELLED_MESSAGE: &str = "call_app cancelled";
const TIMEOUT_MESSAGE: &str = "Timed out waiting for project generation";

/// The three remote operations the workflow composes.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Create a project for an application.
    async fn create(&self, request: &CreateProjectRequest) -> Result<Project>;

    /// Start generation of the project's first step.
    async fn trigger(&self, project_id: &str, has_blocks: bool) -> Result<()>;

    /// Fetch the current project state.
    async fn fetch(&self, project_id: &str) -> Result<Project>;
}

/// Options for [`call_app`].
#[derive(Debug, Clone)]
pub struct CallAppOptions {
    /// Start with `/generateBlocks` (multi-step) instead of `/generate`.
    pub has_blocks: bool,
    /// Delay between polls.
    pub poll_interval: Duration,
    /// Overall deadline measured from workflow start.
    pub timeout: Duration,
    pub is_demo: Option<bool>,
    pub is_test: Option<bool>,
    /// Aborts the workflow when cancelled.
    pub cancellation: Option<CancellationToken>,
}

impl Default for CallAppOptions {
    fn default() -> Self {
        Self {
            has_blocks: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            is_demo: None,
            is_test: None,
            cancellation: None,
        }
    }
}

impl CallAppOptions {
    /// Use the single-shot `/generate` trigger.
    pub fn single_step(mut self) -> Self {
        self.has_blocks = false;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Create a project, trigger generation and wait for it to finish.
///
/// Intended for applications whose steps all advance automatically. The
/// first poll happens immediately after the trigger; later polls are spaced
/// by `poll_interval`. Returns the settled project with its artefacts.
///
/// # Errors
///
/// - create/trigger/fetch failures, wrapped with the phase that failed and
///   keeping the inner status and data;
/// - [`ErrorKind::Timeout`](crate::ErrorKind::Timeout) once `timeout` has elapsed;
/// - [`ErrorKind::Business`](crate::ErrorKind::Business) when the project
///   reports `lastGenerationError` or `error`;
/// - [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled) when the
///   cancellation token fires.
pub async fn call_app<B>(
    backend: &B,
    application_id: &str,
    idea: &str,
    options: CallAppOptions,
) -> Result<Project>
where
    B: GenerationBackend + ?Sized,
{
    let token = options.cancellation.clone().unwrap_or_default();

    let request = CreateProjectRequest {
        idea: idea.to_string(),
        application_id: application_id.to_string(),
        is_demo: options.is_demo,
        is_test: options.is_test,
    };

    let project = until_cancelled(&token, backend.create(&request))
        .await?
        .map_err(|e| phase_error("Failed to create project", e))?;
    tracing::debug!(project_id = %project.id, application_id, "Project created");

    until_cancelled(&token, backend.trigger(&project.id, options.has_blocks))
        .await?
        .map_err(|e| phase_error("Failed to start generation", e))?;
    tracing::debug!(project_id = %project.id, has_blocks = options.has_blocks, "Generation started");

    let start = Instant::now();
    let mut polls: u32 = 0;

    loop {
        if start.elapsed() > options.timeout {
            tracing::debug!(project_id = %project.id, polls, "Generation timed out");
            return Err(ApiError::timeout(TIMEOUT_MESSAGE));
        }

        let current = until_cancelled(&token, backend.fetch(&project.id))
            .await?
            .map_err(|e| phase_error("Failed to fetch project status", e))?;
        polls += 1;
        tracing::debug!(
            project_id = %current.id,
            polls,
            generating = current.generating,
            "Polled project"
        );

        if let Some(message) = current
            .last_generation_error
            .as_deref()
            .filter(|m| !m.is_empty())
        {
            return Err(ApiError::business(format!("Generation failed: {}", message)));
        }

        if let Some(error) = current.error.as_ref().filter(|e| !e.is_null()) {
            return Err(
                ApiError::business(format!("Project error: {}", error)).with_data(error.clone())
            );
        }

        if !current.generating {
            return Ok(current);
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ApiError::cancelled(CANCELLED_MESSAGE)),
            _ = tokio::time::sleep(options.poll_interval) => {}
        }
    }
}

/// Race `operation` against the cancellation token.
async fn until_cancelled<F: Future>(token: &CancellationToken, operation: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ApiError::cancelled(CANCELLED_MESSAGE)),
        output = operation => Ok(output),
    }
}

fn phase_error(phase: &str, inner: ApiError) -> ApiError {
    ApiError {
        message: format!("{}: {}", phase, inner.message),
        ..inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_options() {
        let options = CallAppOptions::default();
        assert!(options.has_blocks);
        assert_eq!(options.poll_interval, Duration::from_secs(2));
        assert_eq!(options.timeout, Duration::from_secs(300));
        assert!(options.cancellation.is_none());
    }

    #[test]
    fn test_phase_error_keeps_status_and_data() {
        let inner = ApiError::new(ErrorKind::Transport, "Not Found")
            .with_status(404)
            .with_data(serde_json::json!({"message": "Not Found"}));
        let err = phase_error("Failed to create project", inner);
        assert_eq!(err.message, "Failed to create project: Not Found");
        assert_eq!(err.status, Some(404));
        assert_eq!(err.kind, ErrorKind::Transport);
        assert!(err.data.is_some());
    }

    #[tokio::test]
    async fn test_until_cancelled_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let err = until_cancelled(&token, std::future::pending::<()>())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert_eq!(err.message, CANCELLED_MESSAGE);
    }
}
