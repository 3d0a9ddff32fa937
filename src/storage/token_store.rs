use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::{ChatbotError, Result};

/// Client-local storage for the single bearer token
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any
    fn get(&self) -> Result<Option<String>>;

    /// Store the token, replacing any previous one
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the token. Removing an absent token is not an error.
    fn clear(&self) -> Result<()>;
}

/// On-disk layout: one key, `idToken`
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "idToken", default, skip_serializing_if = "Option::is_none")]
    id_token: Option<String>,
}

/// Token store backed by a small JSON file in the data directory
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredSession> {
        if !self.path.exists() {
            return Ok(StoredSession::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoredSession::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            ChatbotError::StorageError(format!("corrupt session file {}: {}", self.path.display(), e))
        })
    }

    fn write(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;

        // Owner-only before any token byte lands on disk
        let mut file = open_private(&self.path)?;
        restrict_permissions(&file)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().write(true).create(true).truncate(true).open(path)?)
}

/// `mode` only applies on creation; an existing file keeps its old mode
#[cfg(unix)]
fn restrict_permissions(file: &File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> Result<()> {
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.read()?.id_token)
    }

    fn set(&self, token: &str) -> Result<()> {
        self.write(&StoredSession {
            id_token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory token store, lives as long as the process
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.lock().clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}
