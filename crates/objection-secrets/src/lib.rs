//! Credential providers for Objection Navigator
//!
//! Secrets are looked up by name (for example `OPENAI_API_KEY`) through one
//! or more [`SecretProvider`]s. Providers are composed into a
//! [`SecretChain`] so a platform-mounted secret can take priority over the
//! process environment, which in turn takes priority over a local `.env`
//! file.
//!
//! ```rust,ignore
//! use objection_secrets::{SecretChain, MountedSecretProvider, EnvProvider, SecretProvider};
//!
//! let chain = SecretChain::new()
//!     .with_provider(MountedSecretProvider::new("/var/run/secrets/app"))
//!     .with_provider(EnvProvider::new());
//!
//! let key = chain.get("OPENAI_API_KEY").await?;
//! ```

pub mod providers;

pub use providers::{
    ChainHealthSummary, DotEnvProvider, EnvProvider, MemoryProvider, MountedSecretProvider,
    ProviderHealth, Secret, SecretChain, SecretError, SecretProvider, SecretResult,
};
