//! Provider Chain
//!
//! Combines several providers into a priority-ordered chain. When resolving
//! a secret, providers are tried in order until one returns a value.
//!
//! ```rust,ignore
//! let chain = SecretChain::new()
//!     .with_provider(MountedSecretProvider::new("/var/run/secrets/app")) // Highest priority
//!     .with_provider(EnvProvider::new())
//!     .with_provider(DotEnvProvider::from_file(".env")?);                 // Local fallback
//!
//! let key = chain.get("OPENAI_API_KEY").await?;
//! ```

use super::traits::{ProviderHealth, Secret, SecretError, SecretProvider, SecretResult};
use std::sync::Arc;

/// A chain of secret providers with priority ordering
///
/// Providers are tried in the order they were added. The first provider to
/// return a value wins. `NotFound` moves on to the next provider; other
/// errors stop the chain.
#[derive(Default)]
pub struct SecretChain {
    providers: Vec<Arc<dyn SecretProvider>>,
}

impl std::fmt::Debug for SecretChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl SecretChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the chain (builder pattern)
    ///
    /// Providers added first have higher priority.
    pub fn with_provider<P: SecretProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn add_provider<P: SecretProvider + 'static>(&mut self, provider: P) {
        self.providers.push(Arc::new(provider));
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in priority order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn health_summary(&self) -> ChainHealthSummary {
        let providers: Vec<ProviderHealth> =
            self.providers.iter().map(|p| p.health_check()).collect();
        let healthy = providers.iter().filter(|h| h.healthy).count();

        ChainHealthSummary {
            total_providers: providers.len(),
            healthy_providers: healthy,
            providers,
        }
    }
}

/// Health summary for the entire chain
#[derive(Debug, Clone)]
pub struct ChainHealthSummary {
    pub total_providers: usize,
    pub healthy_providers: usize,
    pub providers: Vec<ProviderHealth>,
}

impl ChainHealthSummary {
    pub fn any_healthy(&self) -> bool {
        self.healthy_providers > 0
    }
}

#[async_trait::async_trait]
impl SecretProvider for SecretChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn get(&self, name: &str) -> SecretResult<Secret> {
        if self.providers.is_empty() {
            return Err(SecretError::Unavailable(
                "No providers configured in chain".to_string(),
            ));
        }

        for provider in &self.providers {
            match provider.get(name).await {
                Ok(secret) => {
                    tracing::debug!(secret = name, provider = provider.name(), "Resolved secret");
                    return Ok(secret);
                }
                Err(SecretError::NotFound(_)) => continue,
                Err(e) => {
                    tracing::warn!(
                        secret = name,
                        provider = provider.name(),
                        error = %e,
                        "Secret provider failed"
                    );
                    return Err(e);
                }
            }
        }

        Err(SecretError::NotFound(name.to_string()))
    }

    fn health_check(&self) -> ProviderHealth {
        let summary = self.health_summary();
        if summary.any_healthy() {
            ProviderHealth::healthy("chain")
        } else {
            ProviderHealth::unhealthy("chain", "No healthy providers in chain")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryProvider;

    #[derive(Debug)]
    struct BrokenProvider;

    #[async_trait::async_trait]
    impl SecretProvider for BrokenProvider {
        fn name(&self) -> &str {
            "broken"
        }

        async fn get(&self, _name: &str) -> SecretResult<Secret> {
            Err(SecretError::Unavailable("backend down".into()))
        }
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let chain = SecretChain::new()
            .with_provider(MemoryProvider::new().with_secret("KEY", "first"))
            .with_provider(MemoryProvider::new().with_secret("KEY", "second"));

        assert_eq!(chain.get("KEY").await.unwrap().expose(), "first");
    }

    #[tokio::test]
    async fn test_not_found_falls_through() {
        let chain = SecretChain::new()
            .with_provider(MemoryProvider::new())
            .with_provider(MemoryProvider::new().with_secret("KEY", "second"));

        assert_eq!(chain.get("KEY").await.unwrap().expose(), "second");
        assert!(chain.get("OTHER").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_other_errors_stop_the_chain() {
        let chain = SecretChain::new()
            .with_provider(BrokenProvider)
            .with_provider(MemoryProvider::new().with_secret("KEY", "unreached"));

        assert!(matches!(
            chain.get("KEY").await,
            Err(SecretError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_chain_is_unavailable() {
        let chain = SecretChain::new();
        assert!(chain.is_empty());
        assert!(matches!(
            chain.get("KEY").await,
            Err(SecretError::Unavailable(_))
        ));
    }

    #[test]
    fn test_provider_names_in_priority_order() {
        let chain = SecretChain::new()
            .with_provider(BrokenProvider)
            .with_provider(MemoryProvider::new());
        assert_eq!(chain.provider_names(), vec!["broken", "memory"]);
        assert_eq!(chain.health_summary().healthy_providers, 2);
    }
}
