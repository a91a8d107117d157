//! Filesystem adapters for gemchat.
//!
//! Implements the `FileSystem` trait from `gemchat-core` for real filesystem I/O
//! and resolves the data directory layout (database, uploads, chat placeholders).

use std::path::{Path, PathBuf};

use gemchat_core::service::fs::FileSystem;
use gemchat_types::config::StorageConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "GEMCHAT_DATA_DIR";

/// Local filesystem implementation of the `FileSystem` trait.
///
/// All operations go through `tokio::fs` for async I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Create a new LocalFileSystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), std::io::Error> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, std::io::Error> {
        tokio::fs::read(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), std::io::Error> {
        tokio::fs::create_dir_all(path).await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `GEMCHAT_DATA_DIR` environment variable
/// 2. `~/.gemchat`
/// 3. `./.gemchat`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".gemchat");
    }

    // Last resort: current directory
    PathBuf::from(".gemchat")
}

/// Absolute locations of everything gemchat keeps on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub upload_dir: PathBuf,
    pub chat_dir: PathBuf,
}

impl DataLayout {
    /// Resolve storage paths; relative entries are taken from `data_dir`.
    pub fn new(data_dir: &Path, storage: &StorageConfig) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            database: data_dir.join(&storage.database),
            upload_dir: data_dir.join(&storage.upload_dir),
            chat_dir: data_dir.join(&storage.chat_dir),
        }
    }

    /// Create the data, upload and chat directories.
    pub async fn ensure_dirs<F: FileSystem>(&self, fs: &F) -> Result<(), std::io::Error> {
        fs.create_dir_all(&self.data_dir).await?;
        fs.create_dir_all(&self.upload_dir).await?;
        fs.create_dir_all(&self.chat_dir).await?;
        if let Some(parent) = self.database.parent() {
            fs.create_dir_all(parent).await?;
        }
        Ok(())
    }
}
