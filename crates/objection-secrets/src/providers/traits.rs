//! Core traits for secret providers
//!
//! Every credential source implements [`SecretProvider`]. Sources are
//! composed and prioritized by [`super::SecretChain`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

/// Errors that can occur when resolving a secret
#[derive(Error, Debug)]
pub enum SecretError {
    /// The requested secret is not defined in this provider
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// The provider is not available or not configured
    #[error("Provider not available: {0}")]
    Unavailable(String),

    /// The stored value could not be interpreted
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// I/O error (for file-based providers)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SecretError {
    /// Whether a chain should move on to the next provider
    pub fn is_not_found(&self) -> bool {
        matches!(self, SecretError::NotFound(_))
    }
}

/// Result type for provider operations
pub type SecretResult<T> = Result<T, SecretError>;

/// A resolved secret value
///
/// The value is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct Secret {
    value: Zeroizing<String>,
    source: String,
}

impl Secret {
    pub fn new(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value: Zeroizing::new(value.into()),
            source: source.into(),
        }
    }

    /// Borrow the raw secret value
    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    /// Name of the provider that produced this value
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// A source of named secrets
///
/// Implementations return [`SecretError::NotFound`] when a name is not
/// defined so that chains can try the next provider. Any other error stops
/// the chain.
#[async_trait::async_trait]
pub trait SecretProvider: Send + Sync + fmt::Debug {
    /// Returns the unique name of this provider
    fn name(&self) -> &str;

    /// Resolve a secret by name
    async fn get(&self, name: &str) -> SecretResult<Secret>;

    /// Check if a secret is defined without handing out its value
    async fn exists(&self, name: &str) -> SecretResult<bool> {
        match self.get(name).await {
            Ok(_) => Ok(true),
            Err(SecretError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get provider-specific health/status information
    fn health_check(&self) -> ProviderHealth {
        ProviderHealth::healthy(self.name())
    }
}

/// Health status for a provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderHealth {
    pub provider: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProviderHealth {
    pub fn healthy(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            healthy: true,
            message: None,
        }
    }

    pub fn unhealthy(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            healthy: false,
            message: Some(message.into()),
        }
    }
}
