use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

// The single key this crate uses in the persisted document: one bearer
// token, nothing else.
const TOKEN_KEY: &str = "token";

/// StorageError
///
/// Failures surfaced by token persistence. Reads never produce these (a missing
/// or unreadable document is the normal logged-out steady state); only writes do.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage io failure: {0}")]
    Io(#[from] io::Error),
    #[error("session storage document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("mock storage error: simulation requested")]
    Simulated,
}

// 1. TokenStore Contract

/// TokenStore
///
/// Defines the abstract contract for the key-value storage that keeps the bearer
/// token across process restarts. This trait allows us to swap the concrete
/// implementation, from the real on-disk document (FileTokenStore) in the
/// running portal to the in-memory double (MemoryTokenStore) during testing,
/// without affecting the session context.
///
/// All operations are synchronous and local: storage access never suspends,
/// which is what lets `restore()` run to completion before the route table is
/// even constructed.
pub trait TokenStore: Send + Sync {
    /// Reads the persisted bearer token. `None` on first-ever run or after a
    /// logout; also `None` when the backing document is missing or unreadable,
    /// because a broken document must degrade to "logged out", never to a
    /// startup failure.
    fn load_token(&self) -> Option<String>;

    /// Persists the bearer token under the single well-known key, creating the
    /// backing document if needed.
    fn save_token(&self, token: &str) -> Result<(), StorageError>;

    /// Removes the persisted bearer token. Idempotent: clearing an absent token
    /// is a no-op with the same post-condition.
    fn clear_token(&self) -> Result<(), StorageError>;
}

// 2. The Real Implementation (On-Disk JSON Document)

/// FileTokenStore
///
/// The concrete implementation backing the session with a small JSON document on
/// local disk, scoped per user the way browser storage is scoped per origin.
/// The document is a flat string-to-string map so that future keys can coexist,
/// but this crate only ever touches `token`.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// read_document
    ///
    /// Loads the backing document, treating a missing file as an empty map.
    /// A malformed document is reported to the caller; `load_token` downgrades
    /// that to "no session" while writes surface it.
    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error.into()),
        }
    }

    /// write_document
    ///
    /// Serializes and writes the full document back, creating parent directories
    /// on first use.
    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load_token(&self) -> Option<String> {
        match self.read_document() {
            Ok(document) => document.get(TOKEN_KEY).cloned(),
            Err(error) => {
                // A corrupt or unreadable document means the user simply is not
                // logged in; restore() must never fail because of it.
                tracing::warn!(%error, path = %self.path.display(),
                    "session document unreadable; treating as logged out");
                None
            }
        }
    }

    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        let mut document = self.read_document().unwrap_or_default();
        document.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_document(&document)
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        let mut document = self.read_document().unwrap_or_default();
        if document.remove(TOKEN_KEY).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

// 3. The In-Memory Implementation (For Unit Tests and Ephemeral Sessions)

/// MemoryTokenStore
///
/// An in-memory implementation of `TokenStore` used for testing and for
/// "remember me off" style ephemeral sessions. The failure mode simulates a
/// full or read-only storage device for write-path assertions.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
    should_fail: bool,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the store pre-populated, as if a prior process had saved `token`.
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_string())),
            should_fail: false,
        }
    }

    /// When failing, all write operations return a simulated failure.
    pub fn new_failing() -> Self {
        Self {
            slot: Mutex::new(None),
            should_fail: true,
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> Option<String> {
        self.slot.lock().expect("token store lock poisoned").clone()
    }

    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Simulated);
        }
        *self.slot.lock().expect("token store lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Simulated);
        }
        *self.slot.lock().expect("token store lock poisoned") = None;
        Ok(())
    }
}

/// TokenStoreState
///
/// The concrete type used to share token storage access across the application.
pub type TokenStoreState = Arc<dyn TokenStore>;
