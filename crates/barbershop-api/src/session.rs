//! Session storage.
//!
//! The session (auth token plus the logged-in user) is an explicit,
//! injected dependency. [`HttpBookingApi`](crate::HttpBookingApi) reads it to
//! authorize requests; the login and logout commands write it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use barbershop_core::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};

/// A logged-in session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token, when the server hands one out.
    pub token: Option<String>,

    /// The authenticated user.
    pub user: User,

    /// When the login happened.
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session logged in now.
    pub fn new(token: Option<String>, user: User) -> Self {
        Self {
            token,
            user,
            logged_in_at: Utc::now(),
        }
    }
}

/// Where the current session lives.
pub trait SessionStore: Send + Sync {
    /// Returns the current session, if any.
    fn get(&self) -> ApiResult<Option<Session>>;

    /// Replaces the current session.
    fn set(&self, session: Session) -> ApiResult<()>;

    /// Forgets the current session.
    fn clear(&self) -> ApiResult<()>;

    /// Returns the bearer token of the current session, if any.
    fn token(&self) -> ApiResult<Option<String>> {
        Ok(self.get()?.and_then(|session| session.token))
    }
}

fn poisoned<T>(_: T) -> ApiError {
    ApiError::session("session lock poisoned")
}

/// In-memory session store for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding a session.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> ApiResult<Option<Session>> {
        Ok(self.session.read().map_err(poisoned)?.clone())
    }

    fn set(&self, session: Session) -> ApiResult<()> {
        *self.session.write().map_err(poisoned)? = Some(session);
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        *self.session.write().map_err(poisoned)? = None;
        Ok(())
    }
}

/// Session persisted as JSON on disk.
///
/// Writes go to a temp file first and are renamed into place. On Unix the
/// file is readable by the owner only.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    session: RwLock<Option<Session>>,
}

impl FileSessionStore {
    /// Creates a store at the given path. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            session: RwLock::new(None),
        }
    }

    /// Creates a store and loads any session already on disk.
    pub fn open(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Loads the session from disk into memory.
    ///
    /// Returns Ok(true) if a session was loaded, Ok(false) if none exists or
    /// the file does not hold a session.
    pub fn load(&self) -> ApiResult<bool> {
        if !self.path.exists() {
            debug!("no session file at {:?}", self.path);
            return Ok(false);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ApiError::session(format!("failed to read session file: {}", e)).with_source(e)
        })?;

        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                warn!("ignoring corrupt session file {:?}: {}", self.path, e);
                return Ok(false);
            }
        };

        info!("loaded session for {} from {:?}", session.user.email, self.path);
        *self.session.write().map_err(poisoned)? = Some(session);
        Ok(true)
    }

    fn save(&self, session: &Session) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::session(format!("failed to create session directory: {}", e))
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| ApiError::internal(format!("failed to serialize session: {}", e)))?;

        fs::write(&temp_path, &content)
            .map_err(|e| ApiError::session(format!("failed to write session file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(&temp_path, perms);
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| ApiError::session(format!("failed to rename session file: {}", e)))?;

        debug!("saved session to {:?}", self.path);
        Ok(())
    }

    /// Returns the session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> ApiResult<Option<Session>> {
        Ok(self.session.read().map_err(poisoned)?.clone())
    }

    fn set(&self, session: Session) -> ApiResult<()> {
        self.save(&session)?;
        *self.session.write().map_err(poisoned)? = Some(session);
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        *self.session.write().map_err(poisoned)? = None;
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| ApiError::session(format!("failed to remove session file: {}", e)))?;
            info!("cleared session from {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barbershop_core::UserKind;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            kind: Some(UserKind::Client),
        }
    }

    mod memory {
        use super::*;

        #[test]
        fn starts_empty() {
            let store = MemorySessionStore::new();
            assert!(store.get().unwrap().is_none());
            assert!(store.token().unwrap().is_none());
        }

        #[test]
        fn set_and_clear() {
            let store = MemorySessionStore::new();
            store
                .set(Session::new(Some("tok".to_string()), user()))
                .unwrap();
            assert_eq!(store.token().unwrap().as_deref(), Some("tok"));

            store.clear().unwrap();
            assert!(store.get().unwrap().is_none());
        }

        #[test]
        fn session_without_token() {
            let store = MemorySessionStore::with_session(Session::new(None, user()));
            assert!(store.get().unwrap().is_some());
            assert!(store.token().unwrap().is_none());
        }
    }

    mod file {
        use super::*;

        #[test]
        fn save_and_load() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("session.json");

            let store = FileSessionStore::new(&path);
            store
                .set(Session::new(Some("tok".to_string()), user()))
                .unwrap();
            assert!(path.exists());

            let reopened = FileSessionStore::open(&path).unwrap();
            let session = reopened.get().unwrap().unwrap();
            assert_eq!(session.token.as_deref(), Some("tok"));
            assert_eq!(session.user, user());
        }

        #[test]
        fn no_file() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileSessionStore::new(dir.path().join("session.json"));
            assert!(!store.load().unwrap());
            assert!(store.get().unwrap().is_none());
        }

        #[test]
        fn clear_removes_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("session.json");
            let store = FileSessionStore::new(&path);
            store.set(Session::new(None, user())).unwrap();

            store.clear().unwrap();
            assert!(!path.exists());
            assert!(store.get().unwrap().is_none());
        }

        #[test]
        fn corrupt_file_starts_logged_out() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("session.json");
            fs::write(&path, "{not json").unwrap();

            let store = FileSessionStore::open(&path).unwrap();
            assert!(store.get().unwrap().is_none());

            store
                .set(Session::new(Some("fresh".to_string()), user()))
                .unwrap();
            let reopened = FileSessionStore::open(&path).unwrap();
            assert_eq!(reopened.token().unwrap().as_deref(), Some("fresh"));
        }

        #[test]
        fn clear_removes_corrupt_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("session.json");
            fs::write(&path, "").unwrap();

            FileSessionStore::open(&path).unwrap().clear().unwrap();
            assert!(!path.exists());
        }

        #[test]
        fn unreadable_path_is_session_error() {
            let dir = tempfile::tempdir().unwrap();
            // A directory where the file should be cannot be read as text
            let err = FileSessionStore::open(dir.path()).unwrap_err();
            assert_eq!(err.code(), crate::ApiErrorCode::SessionStore);
        }

        #[cfg(unix)]
        #[test]
        fn file_is_owner_only() {
            use std::os::unix::fs::PermissionsExt;

            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("session.json");
            FileSessionStore::new(&path)
                .set(Session::new(Some("tok".to_string()), user()))
                .unwrap();

            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
