//! Secret providers
//!
//! - `traits`: the [`SecretProvider`] trait, [`Secret`] values and errors
//! - `env`: process environment and `.env` file providers
//! - `mounted`: one-file-per-secret directories mounted by the platform
//! - `memory`: in-memory values for tests and explicit CLI overrides
//! - `chain`: priority-ordered composition of providers

mod chain;
mod env;
mod memory;
mod mounted;
mod traits;

pub use chain::{ChainHealthSummary, SecretChain};
pub use env::{DotEnvProvider, EnvProvider};
pub use memory::MemoryProvider;
pub use mounted::MountedSecretProvider;
pub use traits::{ProviderHealth, Secret, SecretError, SecretProvider, SecretResult};
