//! Platform-mounted secrets
//!
//! Serverless platforms expose secrets as a directory holding one file per
//! secret, named after the secret. `OPENAI_API_KEY` is read from
//! `<dir>/OPENAI_API_KEY`.

use super::traits::{ProviderHealth, Secret, SecretError, SecretProvider, SecretResult};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct MountedSecretProvider {
    dir: PathBuf,
}

impl MountedSecretProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn secret_path(&self, name: &str) -> SecretResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(SecretError::ConfigurationError(format!(
                "Invalid secret name: {:?}",
                name
            )));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait::async_trait]
impl SecretProvider for MountedSecretProvider {
    fn name(&self) -> &str {
        "mounted"
    }

    async fn get(&self, name: &str) -> SecretResult<Secret> {
        let path = self.secret_path(name)?;

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let value = content.trim_end();
                if value.is_empty() {
                    Err(SecretError::NotFound(name.to_string()))
                } else {
                    Ok(Secret::new(value, "mounted"))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SecretError::NotFound(name.to_string()))
            }
            Err(e) => Err(SecretError::IoError(e)),
        }
    }

    fn health_check(&self) -> ProviderHealth {
        if self.dir.is_dir() {
            ProviderHealth::healthy("mounted")
        } else {
            ProviderHealth::unhealthy(
                "mounted",
                format!("Secrets directory not mounted: {}", self.dir.display()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_and_trims_mounted_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("OPENAI_API_KEY"), "sk-mounted\n").unwrap();

        let provider = MountedSecretProvider::new(dir.path());
        let secret = provider.get("OPENAI_API_KEY").await.unwrap();

        assert_eq!(secret.expose(), "sk-mounted");
        assert_eq!(secret.source(), "mounted");
        assert!(provider.health_check().healthy);
    }

    #[tokio::test]
    async fn test_missing_or_empty_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("EMPTY"), "\n").unwrap();

        let provider = MountedSecretProvider::new(dir.path());
        assert!(provider.get("OPENAI_API_KEY").await.unwrap_err().is_not_found());
        assert!(provider.get("EMPTY").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let provider = MountedSecretProvider::new("/tmp");
        let result = provider.get("../etc/passwd").await;
        assert!(matches!(result, Err(SecretError::ConfigurationError(_))));
    }

    #[test]
    fn test_unmounted_directory_is_unhealthy() {
        let provider = MountedSecretProvider::new("/definitely/not/mounted");
        assert!(!provider.health_check().healthy);
    }
}
