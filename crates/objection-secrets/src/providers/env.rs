//! Environment variable secret providers
//!
//! - [`EnvProvider`] reads the live process environment
//! - [`DotEnvProvider`] reads a `.env` file once and serves it from memory
//!
//! Names are used as-is (`OPENAI_API_KEY`). An optional prefix is joined
//! with `_`, so prefix `OBJECTION` and name `OPENAI_API_KEY` resolve
//! `OBJECTION_OPENAI_API_KEY`.

use super::traits::{ProviderHealth, Secret, SecretError, SecretProvider, SecretResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn build_name(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}_{}", prefix, name).to_uppercase(),
        None => name.to_uppercase(),
    }
}

/// Provider for system environment variables
///
/// Read-only; reflects the environment at query time. Empty values count as
/// unset.
#[derive(Debug, Default)]
pub struct EnvProvider {
    prefix: Option<String>,
}

impl EnvProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only consider variables starting with `<prefix>_`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait::async_trait]
impl SecretProvider for EnvProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn get(&self, name: &str) -> SecretResult<Secret> {
        let var_name = build_name(self.prefix.as_deref(), name);

        match std::env::var(&var_name) {
            Ok(value) if !value.trim().is_empty() => Ok(Secret::new(value, "env")),
            Ok(_) | Err(std::env::VarError::NotPresent) => Err(SecretError::NotFound(var_name)),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::ConfigurationError(
                format!("Environment variable {} contains invalid UTF-8", var_name),
            )),
        }
    }
}

/// Provider for `.env` file secrets
///
/// Supported format:
/// ```text
/// # Comment
/// OPENAI_API_KEY=sk-...
/// export QUOTED="value with spaces"
/// MULTILINE="line1\nline2"
/// ```
#[derive(Debug)]
pub struct DotEnvProvider {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl DotEnvProvider {
    /// Load and parse a `.env` file
    pub fn from_file(path: impl AsRef<Path>) -> SecretResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(SecretError::Unavailable(format!(
                ".env file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(&path)?;
        let values = parse_dotenv(&content);
        tracing::debug!(path = %path.display(), entries = values.len(), "Loaded .env file");

        Ok(Self {
            path,
            values,
        })
    }

    /// Number of entries parsed from the file
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait::async_trait]
impl SecretProvider for DotEnvProvider {
    fn name(&self) -> &str {
        "dotenv"
    }

    async fn get(&self, name: &str) -> SecretResult<Secret> {
        let key = build_name(None, name);

        match self.values.get(&key) {
            Some(value) if !value.trim().is_empty() => Ok(Secret::new(value.clone(), "dotenv")),
            _ => Err(SecretError::NotFound(key)),
        }
    }

    fn health_check(&self) -> ProviderHealth {
        if self.path.exists() {
            ProviderHealth::healthy("dotenv")
        } else {
            ProviderHealth::unhealthy(
                "dotenv",
                format!("File not found: {}", self.path.display()),
            )
        }
    }
}

fn parse_dotenv(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim().to_string();
            let mut value = line[eq_pos + 1..].trim().to_string();

            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }

            value = value
                .replace("\\n", "\n")
                .replace("\\t", "\t")
                .replace("\\r", "\r");

            if !key.is_empty() {
                values.insert(key, value);
            }
        }
    }

    values
}
