//! Signed-in session, persisted between runs
//!
//! The shell loads the session once at startup and passes it by reference to
//! whatever needs it. Every mutation is written back immediately.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{
    error::{AppError, AppResult},
    models::{PendingLogin, UserRole, UserSession},
};

/// Everything kept on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub user: Option<UserSession>,
    /// Login waiting for its OTP code
    #[serde(default)]
    pub pending: Option<PendingLogin>,
}

impl SessionState {
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.pending.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored session. A missing or unreadable file means signed out.
    pub fn load(&self) -> SessionState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return SessionState::default(),
            Err(e) => {
                tracing::warn!("Cannot read session file {}: {}", self.path.display(), e);
                return SessionState::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding corrupt session file {}: {}", self.path.display(), e);
            SessionState::default()
        })
    }

    /// Write `state`, or remove the file when there is nothing to keep
    pub fn save(&self, state: &SessionState) -> AppResult<()> {
        if state.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(AppError::Session(format!(
                    "Failed to remove {}: {}",
                    self.path.display(),
                    e
                ))),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Session(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;
        write_private(&self.path, json.as_bytes())
            .map_err(|e| AppError::Session(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

/// Write `contents` readable by the owner only; the file holds credentials
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        // `mode` only applies on creation
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Current session with save-on-change
#[derive(Debug)]
pub struct Session {
    store: SessionStore,
    state: SessionState,
}

impl Session {
    pub fn load(store: SessionStore) -> Self {
        let state = store.load();
        if let Some(ref user) = state.user {
            tracing::debug!("Restored session for {} ({})", user.email, user.role);
        }
        Self { store, state }
    }

    pub fn user(&self) -> Option<&UserSession> {
        self.state.user.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingLogin> {
        self.state.pending.as_ref()
    }

    pub fn token(&self) -> Option<String> {
        self.state.user.as_ref().and_then(|u| u.token.clone())
    }

    pub fn sign_in(&mut self, user: UserSession) -> AppResult<()> {
        self.update(|state| {
            state.user = Some(user);
            state.pending = None;
        })
    }

    pub fn begin_otp(&mut self, pending: PendingLogin) -> AppResult<()> {
        self.update(|state| {
            state.user = None;
            state.pending = Some(pending);
        })
    }

    pub fn sign_out(&mut self) -> AppResult<()> {
        self.update(|state| *state = SessionState::default())
    }

    pub fn require_user(&self) -> AppResult<&UserSession> {
        self.user()
            .ok_or_else(|| AppError::Authentication("Please sign in first".to_string()))
    }

    /// Signed-in user holding `role`
    pub fn require_role(&self, role: UserRole) -> AppResult<&UserSession> {
        let user = self.require_user()?;
        if user.role != role {
            return Err(AppError::Authorization(format!("{} role required", role)));
        }
        Ok(user)
    }

    fn update(&mut self, change: impl FnOnce(&mut SessionState)) -> AppResult<()> {
        change(&mut self.state);
        self.store.save(&self.state)
    }
}
