//! In-memory secrets
//!
//! Used for explicit overrides (a CLI `--api-key` flag) and in tests.

use super::traits::{Secret, SecretError, SecretProvider, SecretResult};
use std::collections::HashMap;
use std::fmt;
use zeroize::Zeroizing;

#[derive(Default)]
pub struct MemoryProvider {
    values: HashMap<String, Zeroizing<String>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret (builder pattern)
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), Zeroizing::new(value.into()));
        self
    }
}

impl fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryProvider")
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait::async_trait]
impl SecretProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, name: &str) -> SecretResult<Secret> {
        self.values
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .map(|v| Secret::new(v.as_str(), "memory"))
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }
}
