use directories::ProjectDirs;
use doc_model::{RecentFiles, SessionEntry};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_ENV: &str = "ROBBY_READER_CONFIG_DIR";

const SESSION_FILE: &str = "session.json";
const RECENT_FILE: &str = "recent.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve user config directory")]
    NoConfigDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Where the session and the recent list live.
///
/// Loads report missing files as empty data; only unreadable or malformed
/// files produce an error, and callers are expected to degrade to empty.
pub trait Persistence {
    fn load_session(&self) -> Result<Vec<SessionEntry>, StorageError>;
    fn save_session(&self, entries: &[SessionEntry]) -> Result<(), StorageError>;
    fn clear_session(&self) -> Result<(), StorageError>;
    fn load_recent(&self) -> Result<RecentFiles, StorageError>;
    fn save_recent(&self, recent: &RecentFiles) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// `$ROBBY_READER_CONFIG_DIR` if set, otherwise the platform config dir.
    pub fn resolve() -> Result<Self, StorageError> {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Ok(Self::with_root(dir)),
            _ => Self::from_default_project(),
        }
    }

    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "Robby", "robby-reader")
            .ok_or(StorageError::NoConfigDirectory)?;

        Ok(Self { root: dirs.config_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    pub fn recent_path(&self) -> PathBuf {
        self.root.join(RECENT_FILE)
    }

    fn write_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;

        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(path, bytes)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

impl Persistence for Storage {
    fn load_session(&self) -> Result<Vec<SessionEntry>, StorageError> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save_session(&self, entries: &[SessionEntry]) -> Result<(), StorageError> {
        self.write_json(&self.session_path(), entries)
    }

    fn clear_session(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn load_recent(&self) -> Result<RecentFiles, StorageError> {
        let path = self.recent_path();
        if !path.exists() {
            return Ok(RecentFiles::new());
        }

        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save_recent(&self, recent: &RecentFiles) -> Result<(), StorageError> {
        self.write_json(&self.recent_path(), recent)
    }
}
