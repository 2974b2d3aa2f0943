//! Service configuration
//!
//! Built once at startup and shared read-only by every request. Values come
//! from serde defaults, an optional TOML/YAML/JSON file, and CLI flags.

use objection_secrets::{DotEnvProvider, EnvProvider, MountedSecretProvider, SecretChain};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::CompletionSettings;
use crate::error::{Result, ServiceError};

/// Name of the completion-service credential
pub const API_KEY_SECRET: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins that receive cross-origin response headers
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime
    #[serde(default = "default_cors_max_age_secs")]
    pub cors_max_age_secs: u64,

    #[serde(default)]
    pub completion: CompletionSettings,

    /// Overall per-request deadline
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum concurrent in-flight requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Secret looked up for the completion-service credential
    #[serde(default = "default_api_key_secret")]
    pub api_key_secret: String,
    /// Directory of platform-mounted secrets
    #[serde(default = "default_secrets_dir")]
    pub secrets_dir: PathBuf,
    /// Local `.env` file consulted last; skipped when missing
    #[serde(default = "default_dotenv_path", skip_serializing_if = "Option::is_none")]
    pub dotenv_path: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_allowed_origins() -> Vec<String> {
    [
        "http://localhost:5000",
        "http://127.0.0.1:5000",
        "https://objection-navigator-app.web.app",
        "https://objection-navigator-app.firebaseapp.com",
        "https://app.objectionsiq.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_cors_max_age_secs() -> u64 {
    3600
}

fn default_request_timeout_ms() -> u64 {
    20_000
}

fn default_max_concurrency() -> usize {
    80
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_api_key_secret() -> String {
    API_KEY_SECRET.to_string()
}

fn default_secrets_dir() -> PathBuf {
    PathBuf::from("/var/run/secrets/objection-navigator")
}

fn default_dotenv_path() -> Option<PathBuf> {
    Some(PathBuf::from(".env"))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            cors_max_age_secs: default_cors_max_age_secs(),
            completion: CompletionSettings::default(),
            request_timeout_ms: default_request_timeout_ms(),
            max_concurrency: default_max_concurrency(),
            max_body_bytes: default_max_body_bytes(),
            api_key_secret: default_api_key_secret(),
            secrets_dir: default_secrets_dir(),
            dotenv_path: default_dotenv_path(),
        }
    }
}

impl ServiceConfig {
    /// Load from a `.toml`, `.yaml`/`.yml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::FileError(format!("{}: {}", path.display(), e)))?;

        let config: ServiceConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            other => {
                return Err(ServiceError::parse_error(format!(
                    "Unsupported config format: {:?}",
                    other.unwrap_or("<none>")
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ServiceError::invalid_config("port must be non-zero"));
        }
        if self.max_concurrency == 0 {
            return Err(ServiceError::invalid_config("max_concurrency must be non-zero"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ServiceError::invalid_config("request_timeout_ms must be non-zero"));
        }
        if self.max_body_bytes == 0 {
            return Err(ServiceError::invalid_config("max_body_bytes must be non-zero"));
        }
        if self.completion.model.trim().is_empty() {
            return Err(ServiceError::invalid_config("completion.model must not be empty"));
        }
        if !self.completion.base_url.starts_with("http://")
            && !self.completion.base_url.starts_with("https://")
        {
            return Err(ServiceError::invalid_config(format!(
                "completion.base_url must be an http(s) URL: {}",
                self.completion.base_url
            )));
        }
        if self.api_key_secret.trim().is_empty() {
            return Err(ServiceError::invalid_config("api_key_secret must not be empty"));
        }
        for origin in &self.allowed_origins {
            let valid = (origin.starts_with("http://") || origin.starts_with("https://"))
                && !origin.ends_with('/')
                && axum::http::HeaderValue::from_str(origin).is_ok();
            if !valid {
                return Err(ServiceError::invalid_config(format!(
                    "allowed origin must be scheme://host[:port]: {}",
                    origin
                )));
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServiceError::invalid_config(format!("bind address: {}", e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Credential sources in priority order: mounted secret, process
    /// environment, then the local `.env` file when it exists
    pub fn credential_chain(&self) -> SecretChain {
        let mut chain = SecretChain::new()
            .with_provider(MountedSecretProvider::new(&self.secrets_dir))
            .with_provider(EnvProvider::new());

        if let Some(path) = self.dotenv_path.as_ref().filter(|p| p.exists()) {
            match DotEnvProvider::from_file(path) {
                Ok(provider) => chain.add_provider(provider),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring .env file"),
            }
        }

        chain
    }
}
