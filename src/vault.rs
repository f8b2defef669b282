//! Access to the user's document vault.
//!
//! Paths handed to a [`Vault`] are vault-relative and `/`-separated; the
//! implementation decides where they live on disk.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::fs::try_exists;

use crate::error::AppError;

pub trait Vault: Send + Sync {
    /// Creates `path` and its parents. Fails if something other than a folder
    /// already occupies it.
    fn create_folder_if_missing(&self, path: &str)
        -> impl Future<Output = Result<(), AppError>> + Send;

    fn write_binary_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    fn read_file(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, AppError>> + Send;

    fn exists(&self, path: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Where a vault path can be found by the user.
    fn resolve_display_path(&self, path: &str) -> PathBuf;
}

/// Collapses separators the way the vault expects: backslashes become slashes,
/// duplicate slashes merge, and leading/trailing slashes are dropped. The vault
/// root is `/`.
pub fn normalize_vault_path(path: &str) -> String {
    let joined = path
        .replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// A vault backed by a directory on the local file system.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        let normalized = normalize_vault_path(path);
        if normalized == "/" {
            return self.root.clone();
        }
        normalized
            .split('/')
            .filter(|segment| *segment != "." && *segment != "..")
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

impl Vault for FsVault {
    async fn create_folder_if_missing(&self, path: &str) -> Result<(), AppError> {
        let full = self.full_path(path);

        if try_exists(&full).await? {
            let metadata = fs::metadata(&full).await?;
            if !metadata.is_dir() {
                return Err(AppError::NotAFolder(normalize_vault_path(path)));
            }
            return Ok(());
        }

        fs::create_dir_all(&full).await?;
        Ok(())
    }

    async fn write_binary_file(&self, path: &str, data: &[u8]) -> Result<(), AppError> {
        fs::write(self.full_path(path), data).await?;
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, AppError> {
        Ok(fs::read(self.full_path(path)).await?)
    }

    async fn exists(&self, path: &str) -> Result<bool, AppError> {
        Ok(try_exists(self.full_path(path)).await?)
    }

    fn resolve_display_path(&self, path: &str) -> PathBuf {
        self.full_path(path)
    }
}
