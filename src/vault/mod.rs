// Vault — storage interface the tool protocol writes into
//
// The host application's note vault is modeled as a trait so the protocol
// never touches the filesystem directly. FsVault is the real implementation,
// rooted at a directory; tests substitute an in-memory vault.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Storage surface for vault-mutating tool calls.
///
/// Paths are vault-relative, `/`-separated (e.g. "notes/ideas.md").
/// All operations fail with a message on permission or path problems.
#[async_trait]
pub trait Vault: Send + Sync {
    /// Whether a file or folder exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, String>;

    /// Create a folder (and any missing parents) at `path`.
    async fn create_folder(&self, path: &str) -> Result<(), String>;

    /// Write `content` at `path`, replacing any existing file.
    async fn write(&self, path: &str, content: &str) -> Result<(), String>;
}

/// Filesystem-backed vault rooted at a base directory.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Create an FsVault over an existing directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn new(root: PathBuf) -> Result<Self, String> {
        std::fs::create_dir_all(&root)
            .map_err(|e| format!("Failed to create vault root {:?}: {}", root, e))?;
        Ok(Self { root })
    }

    /// Resolve a vault-relative path against the root.
    ///
    /// Rejects absolute paths and `..` components so a tool call can never
    /// escape the vault.
    fn resolve(&self, path: &str) -> Result<PathBuf, String> {
        let rel = Path::new(path);
        if rel.is_absolute() {
            return Err(format!("Absolute paths are not allowed in the vault: {}", path));
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(format!("Path escapes the vault: {}", path)),
            }
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl Vault for FsVault {
    async fn exists(&self, path: &str) -> Result<bool, String> {
        let full = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&full).await.unwrap_or(false))
    }

    async fn create_folder(&self, path: &str) -> Result<(), String> {
        let full = self.resolve(path)?;
        tokio::fs::create_dir_all(&full)
            .await
            .map_err(|e| format!("Failed to create folder {}: {}", path, e))
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), String> {
        let full = self.resolve(path)?;
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path, e))
    }
}
