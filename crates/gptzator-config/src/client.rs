//! Connection contexts for the GPTZator platform.
//!
//! ```yaml
//! api-version: v1
//! kind: ClientConfig
//!
//! current-context: dev
//!
//! contexts:
//!   - name: dev
//!     server: https://api.dev.gpt-zator.ladcloud.ru/api/
//!   - name: staging
//!     server: https://staging.example.com/api/
//!     token-file: ~/.config/gptzator/staging-tokens.json
//!     timeout: 60
//!
//! defaults:
//!   timeout: 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result, xdg_config_dir};

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// API version for the client config file format.
pub const API_VERSION: &str = "v1";

/// Kind identifier for client config files.
pub const KIND: &str = "ClientConfig";

/// Config filename inside the config directory.
pub const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Root client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    /// Name of the context used when none is given explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,

    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Fallbacks for settings a context leaves unset.
    #[serde(default)]
    pub defaults: ClientDefaults,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            ..Default::default()
        }
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeYaml(e.to_string()))
    }

    /// The current context, if one is set and it exists.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_ref()
            .and_then(|name| self.get_context(name))
    }

    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn get_context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add a context, replacing any existing one with the same name.
    pub fn set_context(&mut self, context: Context) {
        if let Some(existing) = self.get_context_mut(&context.name) {
            *existing = context;
        } else {
            self.contexts.push(context);
        }
    }

    /// Remove a context. Clears `current-context` if it pointed at it.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        let index = self.contexts.iter().position(|c| c.name == name)?;
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Some(self.contexts.remove(index))
    }

    /// Make `name` the current context.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.get_context(name).is_none() {
            return Err(ConfigError::ContextNotFound(name.to_string()));
        }
        self.current_context = Some(name.to_string());
        Ok(())
    }

    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Context selection for a command: an explicit name must exist,
    /// otherwise fall back to the current context (which may be unset).
    pub fn resolve_context(&self, name: Option<&str>) -> Result<Option<&Context>> {
        match name {
            Some(name) => self
                .get_context(name)
                .map(Some)
                .ok_or_else(|| ConfigError::ContextNotFound(name.to_string())),
            None => Ok(self.current()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Contexts
// ─────────────────────────────────────────────────────────────────────────────

/// A named platform connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    pub name: String,

    /// API base URL, e.g. `https://api.dev.gpt-zator.ladcloud.ru/api/`.
    pub server: String,

    /// Token file; `~/` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Context {
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            token_file: None,
            timeout: None,
        }
    }

    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Timeout for this context, falling back to the config defaults.
    pub fn effective_timeout(&self, defaults: &ClientDefaults) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(defaults.timeout))
    }

    /// Expanded token file path, if one is configured.
    pub fn token_path(&self) -> Option<PathBuf> {
        self.token_file.as_deref().map(expand_path)
    }
}

/// Settings applied where a context is silent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientDefaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading & Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Path of `client.yaml` in the config directory.
pub fn client_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}

/// Load the client configuration from the default location.
pub fn load_client_config() -> Result<ClientConfig> {
    load_client_config_from(client_config_path().as_deref())
}

/// Load client config from a path. A missing file yields an empty config.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::new());
    };

    if !path.exists() {
        return Ok(ClientConfig::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    ClientConfig::from_yaml(&contents)
}

/// Save the client configuration to the default location.
pub fn save_client_config(config: &ClientConfig) -> Result<()> {
    let path = client_config_path().ok_or(ConfigError::NoConfigDir)?;
    save_client_config_to(config, &path)
}

/// Save client config to a path, creating parent directories.
pub fn save_client_config_to(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_yaml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })
}

fn expand_path(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/"))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::new();
        assert_eq!(config.api_version, API_VERSION);
        assert_eq!(config.kind, KIND);
        assert!(config.current().is_none());
        assert_eq!(config.defaults.timeout, 30);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
current-context: staging
contexts:
  - name: dev
    server: https://api.dev.gpt-zator.ladcloud.ru/api/
  - name: staging
    server: https://staging.example.com/api/
    token-file: /tmp/staging.json
    timeout: 60
defaults:
  timeout: 15
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();

        let staging = config.current().unwrap();
        assert_eq!(staging.name, "staging");
        assert_eq!(staging.token_path(), Some(PathBuf::from("/tmp/staging.json")));
        assert_eq!(
            staging.effective_timeout(&config.defaults),
            Duration::from_secs(60)
        );

        let dev = config.get_context("dev").unwrap();
        assert!(dev.token_path().is_none());
        assert_eq!(dev.effective_timeout(&config.defaults), Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ClientConfig::from_yaml("contexts: [name: 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml(_)));
    }

    #[test]
    fn test_set_context_replaces() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("dev", "http://localhost:3000/api/"));
        config.set_context(Context::new("dev", "http://localhost:4000/api/"));

        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].server, "http://localhost:4000/api/");
    }

    #[test]
    fn test_remove_current_context_clears_selection() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("dev", "http://localhost:3000/api/"));
        config.set_context(Context::new("prod", "https://example.com/api/"));
        config.use_context("dev").unwrap();

        assert_eq!(config.remove_context("prod").unwrap().name, "prod");
        assert_eq!(config.current_context.as_deref(), Some("dev"));

        config.remove_context("dev");
        assert!(config.current_context.is_none());
        assert!(config.remove_context("dev").is_none());
    }

    #[test]
    fn test_use_unknown_context() {
        let mut config = ClientConfig::new();
        let err = config.use_context("nowhere").unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(name) if name == "nowhere"));
        assert!(config.current_context.is_none());
    }

    #[test]
    fn test_resolve_context() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("dev", "http://localhost:3000/api/"));
        config.set_context(Context::new("prod", "https://example.com/api/"));

        assert!(config.resolve_context(None).unwrap().is_none());
        config.use_context("dev").unwrap();
        assert_eq!(config.resolve_context(None).unwrap().unwrap().name, "dev");
        assert_eq!(
            config.resolve_context(Some("prod")).unwrap().unwrap().name,
            "prod"
        );
        assert!(config.resolve_context(Some("qa")).is_err());
    }

    #[test]
    fn test_context_names() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("dev", "http://localhost:3000/api/"));
        config.set_context(Context::new("prod", "https://example.com/api/"));
        assert_eq!(config.context_names(), vec!["dev", "prod"]);
    }

    #[test]
    fn test_expand_home() {
        let context = Context::new("dev", "http://localhost").with_token_file("~/tokens.json");
        let path = context.token_path().unwrap();
        if dirs::home_dir().is_some() {
            assert!(!path.to_string_lossy().starts_with("~/"));
            assert!(path.ends_with("tokens.json"));
        }
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_client_config_from(Some(&dir.path().join("client.yaml"))).unwrap();
        assert!(config.contexts.is_empty());

        let config = load_client_config_from(None).unwrap();
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CLIENT_CONFIG_FILE);

        let mut config = ClientConfig::new();
        config.set_context(
            Context::new("staging", "https://staging.example.com/api/")
                .with_token_file("/var/lib/gptzator/tokens.json")
                .with_timeout(45),
        );
        config.use_context("staging").unwrap();
        save_client_config_to(&config, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("current-context: staging"));
        assert!(written.contains("token-file:"));

        let loaded = load_client_config_from(Some(&path)).unwrap();
        assert_eq!(loaded.current(), config.current());
        assert_eq!(loaded.defaults, ClientDefaults::default());
    }

    #[test]
    fn test_unreadable_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as a file
        let err = load_client_config_from(Some(dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
