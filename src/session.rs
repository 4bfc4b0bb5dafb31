//! File-backed session store for the access/refresh token pair.
//!
//! Tokens survive restarts until an explicit logout or a 401-triggered purge.
//! The store itself never performs navigation or network calls; callers react
//! to an absent session by returning to the login flow.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Access/refresh token pair issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Persistent key-value store for the session token pair.
///
/// The in-memory copy is authoritative for the process lifetime; the backing
/// file is best-effort persistence, so a failed write only logs a warning.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    tokens: Option<TokenPair>,
}

impl SessionStore {
    /// Open a session store, loading any previously persisted token pair.
    /// A missing or unreadable file is treated as "no session".
    pub fn open(path: PathBuf) -> Self {
        let tokens = fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok());
        Self { path, tokens }
    }

    /// Create an empty store that persists to the given path.
    pub fn empty(path: PathBuf) -> Self {
        Self { path, tokens: None }
    }

    /// Default session file location: `$HOME/.rb_client/session.json`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
        Path::new(&home).join(".rb_client").join("session.json")
    }

    /// Current token pair, if a session is active.
    pub fn get(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    /// Bearer token for authenticated requests.
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|pair| pair.access_token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    /// Store a token pair and persist it for subsequent runs.
    pub fn set(&mut self, tokens: TokenPair) {
        self.tokens = Some(tokens);
        if let Err(e) = self.persist() {
            warn!("failed to persist session to {}: {e}", self.path.display());
        }
    }

    /// Purge the session, both in memory and on disk. Called on logout and
    /// whenever a protected call comes back 401.
    pub fn clear(&mut self) {
        self.tokens = None;
        if self.path.exists()
            && let Err(e) = fs::remove_file(&self.path)
        {
            warn!("failed to remove session file {}: {e}", self.path.display());
        }
    }

    fn persist(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.tokens)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, contents)
    }
}
