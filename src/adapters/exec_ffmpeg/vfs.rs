//! Private on-disk namespace standing in for the engine's virtual filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::domain::errors::DomainError;

/// Directory owned by one engine instance; removed when dropped
#[derive(Debug)]
pub struct VirtualFs {
    root: TempDir,
}

impl VirtualFs {
    pub fn create() -> Result<Self, DomainError> {
        let root = tempfile::Builder::new()
            .prefix("editx-vfs-")
            .tempdir()
            .map_err(|e| {
                DomainError::Initialization(format!(
                    "Failed to create engine filesystem: {}",
                    e
                ))
            })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Map a virtual file name to its backing path; names must be plain file names
    pub fn resolve(&self, name: &str) -> Result<PathBuf, DomainError> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0');
        if invalid {
            return Err(DomainError::Io(format!("Invalid virtual file name: {:?}", name)));
        }
        Ok(self.root.path().join(name))
    }

    pub async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Io(format!("Failed to write {}: {}", name, e)))
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.resolve(name)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::Io(format!("Virtual file not found: {}", name)),
            _ => DomainError::Io(format!("Failed to read {}: {}", name, e)),
        })
    }

    pub async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        let path = self.resolve(name)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| DomainError::Io(format!("Failed to stat {}: {}", name, e)))
    }
}
