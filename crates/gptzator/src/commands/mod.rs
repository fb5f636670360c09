//! CLI command handlers.

use std::time::Duration;

use anyhow::Result;
use console::Style;
use gptzator_client::{DEFAULT_BASE_URL, DEFAULT_STORAGE_KEY, FileTokenStorage, GptzatorClient};
use serde::Serialize;

pub mod apps;
pub mod auth;
pub mod config;
pub mod projects;
pub mod threads;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// `--server` override.
    pub server_url: Option<String>,
    /// `--context` selection.
    pub context_name: Option<String>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

/// A configured client plus where it points.
pub struct Session {
    pub client: GptzatorClient,
    pub server_url: String,
    pub context_name: Option<String>,
}

impl Context {
    /// Build a client from the selected context, the `--server`
    /// override and the persisted tokens.
    pub fn connect(&self) -> Result<Session> {
        let config = gptzator_config::load_client_config()?;
        let selected = config.resolve_context(self.context_name.as_deref())?;

        let server_url = self
            .server_url
            .clone()
            .or_else(|| selected.map(|c| c.server.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = selected
            .map(|c| c.effective_timeout(&config.defaults))
            .unwrap_or_else(|| Duration::from_secs(config.defaults.timeout));

        let storage = match selected.and_then(|c| c.token_path()) {
            Some(path) => FileTokenStorage::with_path(path),
            None => {
                let dir = gptzator_config::xdg_config_dir()
                    .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
                match selected {
                    Some(c) => {
                        FileTokenStorage::with_key(&dir, &format!("{}_{}", DEFAULT_STORAGE_KEY, c.name))
                    }
                    None => FileTokenStorage::new(&dir),
                }
            }
        };
        tracing::debug!(server = %server_url, tokens = %storage.path().display(), "Connecting");

        let client = GptzatorClient::builder()
            .base_url(&server_url)
            .timeout(timeout)
            .token_storage(storage)
            .build()?;

        Ok(Session {
            client,
            server_url,
            context_name: selected.map(|c| c.name.clone()),
        })
    }

    /// Print `value` as pretty JSON when `--json` is set; returns whether it did.
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<bool> {
        if self.json_output {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(self.json_output)
    }
}

impl Session {
    /// Map an SDK result into the CLI's, dropping the stored session when
    /// the platform rejects it.
    pub fn check<T>(&self, result: gptzator_client::Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if e.is_auth_error() => {
                self.client.set_tokens(None);
                tracing::warn!("Session rejected by the platform, tokens cleared");
                Err(anyhow::anyhow!(
                    "{}\nSession expired. Run 'gptzator auth login' to sign in again.",
                    e
                ))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Dimmed section rule under a bold heading.
pub fn heading(title: &str) {
    let dim = Style::new().dim();
    println!("{}", console::style(title).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
}

/// Truncate to `max` characters, adding an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    let line = s.lines().next().unwrap_or_default();
    if line.chars().count() <= max && line.len() == s.len() {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use gptzator_client::{ApiError, ErrorKind, Tokens};

    fn signed_in() -> Session {
        let client = GptzatorClient::builder()
            .tokens(Tokens::new("stale"))
            .build()
            .unwrap();
        Session {
            client,
            server_url: DEFAULT_BASE_URL.to_string(),
            context_name: None,
        }
    }

    #[test]
    fn test_check_clears_tokens_on_auth_error() {
        let session = signed_in();
        let rejected = ApiError::new(ErrorKind::Auth, "jwt expired").with_status(401);

        let err = session.check::<()>(Err(rejected)).unwrap_err();

        assert!(err.to_string().contains("Run 'gptzator auth login'"));
        assert!(session.client.tokens().is_none());
    }

    #[test]
    fn test_check_keeps_tokens_on_other_errors() {
        let session = signed_in();
        let failed = ApiError::new(ErrorKind::Transport, "db down").with_status(500);

        let err = session.check::<()>(Err(failed)).unwrap_err();

        assert!(!err.to_string().contains("auth login"));
        assert_eq!(session.client.tokens().unwrap().access_token, "stale");
        assert_eq!(session.check(Ok(7)).unwrap(), 7);
    }

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("a landing page for a bakery", 10), "a landi...");
    }

    #[test]
    fn test_truncate_multiline() {
        assert_eq!(truncate("first\nsecond", 40), "first...");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("лендинг для пекарни", 8), "ленди...");
    }
}
