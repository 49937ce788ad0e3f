//! Quote snapshot cache.
//!
//! `CacheStore` keeps exactly one `QuoteSnapshot` in a pluggable `StorageBackend`.
//! The file backend replaces the target through a sibling temporary file and a
//! rename, so a concurrent reader sees either the old or the new snapshot, never a
//! partial one. Every write goes through its own temporary file, so concurrent
//! writers never share one; the last rename wins.

use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::quote::QuoteSnapshot;
use crate::Result;

/// Sequence number of the next temporary cache file in this process.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Raw byte storage for the cached snapshot.
pub trait StorageBackend: Send + Sync {
    /// Stored bytes, or `None` if nothing has been stored yet.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored bytes.
    fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Human-readable location for log lines.
    fn describe(&self) -> String;
}

/// Snapshot stored as a JSON file on local disk.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Backend storing the snapshot at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBackend { path: path.into() }
    }

    /// Target file of the cache.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        name.push(format!(".{}.{}.tmp", std::process::id(), seq));
        self.path.with_file_name(name)
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        let tmp = self.temp_path();
        fs::write(&tmp, bytes)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process storage, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryBackend {
    /// Empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with `bytes`.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        MemoryBackend {
            bytes: Mutex::new(Some(bytes.into())),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.bytes.lock()?.clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        *self.bytes.lock()? = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Single-snapshot store over a storage backend.
pub struct CacheStore {
    backend: Box<dyn StorageBackend>,
}

impl CacheStore {
    /// Store over an arbitrary backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        CacheStore {
            backend: Box::new(backend),
        }
    }

    /// Store backed by the JSON file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(path))
    }

    /// Store backed by memory.
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Cached snapshot, if a readable one exists.
    ///
    /// Unreadable or undecodable content is logged and reported as absent.
    pub fn read(&self) -> Option<QuoteSnapshot> {
        let bytes = match self.backend.read() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache {} unreadable, ignoring it: {}", self.backend.describe(), e);
                return None;
            }
        };
        match QuoteSnapshot::from_json_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Cache {} is corrupt, ignoring it: {}", self.backend.describe(), e);
                None
            }
        }
    }

    /// Overwrite the cache with `snapshot`.
    pub fn save(&self, snapshot: &QuoteSnapshot) -> Result<()> {
        self.backend.write(&snapshot.to_json_bytes()?)?;
        debug!(
            "Cached {} quotes to {}",
            snapshot.len(),
            self.backend.describe()
        );
        Ok(())
    }

    /// Human-readable location of the backend, for logs.
    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}
