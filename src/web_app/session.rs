// web_app/session.rs - Signed-in user state
//
// The session persists the user as JSON under a single key in a
// `SessionStore`: `localStorage` in the browser, memory everywhere else.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Storage key holding the serialized user
pub const SESSION_KEY: &str = "user";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Role from a backend's free-form label; anything but "admin" is a user
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(label) if label.trim().eq_ignore_ascii_case("admin") => Self::Admin,
            _ => Self::User,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(rename = "roles")]
    pub role: Role,
    /// Backend auth token sent as a bearer credential
    #[serde(default)]
    pub token: Option<String>,
}

/// Email (or username) and password exchanged for a [`User`]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub identity: String,
    pub password: String,
}

// Keep passwords out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.identity.trim().is_empty() || self.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("not signed in")]
    NotAuthenticated,
    #[error("administrator role required")]
    Forbidden,
    #[error("session storage unavailable: {0}")]
    Storage(String),
}

/// Key/value persistence for the session
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn clear(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// `window.localStorage`, looked up on every access
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStore;

#[cfg(feature = "hydrate")]
impl BrowserSessionStore {
    fn storage() -> Result<web_sys::Storage, SessionError> {
        web_sys::window()
            .ok_or_else(|| SessionError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|e| SessionError::Storage(format!("{e:?}")))?
            .ok_or_else(|| SessionError::Storage("localStorage disabled".to_string()))
    }
}

#[cfg(feature = "hydrate")]
impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }

    fn clear(&self, key: &str) -> Result<(), SessionError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }
}

/// The signed-in administrator, or why there isn't one
pub fn check_admin(user: Option<&User>) -> Result<&User, SessionError> {
    let user = user.ok_or(SessionError::NotAuthenticated)?;
    if user.role != Role::Admin {
        return Err(SessionError::Forbidden);
    }
    Ok(user)
}

pub struct AuthSession<S: SessionStore> {
    store: S,
    user: Option<User>,
}

impl<S: SessionStore> AuthSession<S> {
    /// Load whatever user the store holds; unreadable data is cleared
    pub fn restore(store: S) -> Self {
        let user = match store.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Discarding unreadable session: {}", e);
                    if let Err(e) = store.clear(SESSION_KEY) {
                        warn!("Failed to clear session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read session: {}", e);
                None
            }
        };
        Self { store, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.token.as_deref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.require_admin().is_ok()
    }

    pub fn require_admin(&self) -> Result<&User, SessionError> {
        check_admin(self.user.as_ref())
    }

    /// Persist and adopt `user`; on a storage failure the user stays signed
    /// out
    pub fn login(&mut self, user: User) -> Result<(), SessionError> {
        let raw = serde_json::to_string(&user).map_err(|e| SessionError::Storage(e.to_string()))?;
        self.store.set(SESSION_KEY, &raw)?;
        self.user = Some(user);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.user = None;
        self.store.clear(SESSION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> User {
        User {
            id: "u1".to_string(),
            username: "nay".to_string(),
            role: Role::Admin,
            token: Some("tok".to_string()),
        }
    }

    #[test]
    fn test_restore_empty_store() {
        let session = AuthSession::restore(MemorySessionStore::new());
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
        assert_eq!(session.require_admin(), Err(SessionError::NotAuthenticated));
    }

    #[test]
    fn test_login_persists_and_restores() {
        let store = MemorySessionStore::new();
        let mut session = AuthSession::restore(store.clone());
        session.login(admin()).unwrap();

        let raw = store.get(SESSION_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""roles":"ADMIN""#));

        let restored = AuthSession::restore(store);
        assert_eq!(restored.user(), Some(&admin()));
        assert_eq!(restored.token(), Some("tok"));
        assert!(restored.is_admin());
    }

    #[test]
    fn test_corrupt_session_is_cleared() {
        let store = MemorySessionStore::new();
        store.set(SESSION_KEY, "{not json").unwrap();

        let session = AuthSession::restore(store.clone());
        assert!(!session.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_clears_store() {
        let store = MemorySessionStore::new();
        let mut session = AuthSession::restore(store.clone());
        session.login(admin()).unwrap();
        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_regular_user_is_not_admin() {
        let mut session = AuthSession::restore(MemorySessionStore::new());
        session
            .login(User { role: Role::User, token: None, ..admin() })
            .unwrap();

        assert!(session.is_authenticated());
        assert!(!session.is_admin());
        assert_eq!(session.token(), None);
        assert_eq!(session.require_admin(), Err(SessionError::Forbidden));
    }

    #[test]
    fn test_role_from_backend_label() {
        assert_eq!(Role::from_label(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::from_label(Some(" admin ")), Role::Admin);
        assert_eq!(Role::from_label(Some("USER")), Role::User);
        assert_eq!(Role::from_label(None), Role::User);
    }

    #[test]
    fn test_credentials_need_both_fields() {
        let ok = Credentials {
            identity: "ana@example.com".to_string(),
            password: "secreta123".to_string(),
        };
        assert_eq!(ok.validate(), Ok(()));
        let no_password = Credentials { password: String::new(), ..ok.clone() };
        assert_eq!(no_password.validate(), Err(SessionError::MissingCredentials));
        let no_identity = Credentials { identity: "  ".to_string(), ..ok.clone() };
        assert_eq!(no_identity.validate(), Err(SessionError::MissingCredentials));
        assert!(!format!("{ok:?}").contains("secreta123"));
    }

    #[test]
    fn test_check_admin_without_session() {
        let user = User { role: Role::User, ..admin() };
        assert_eq!(check_admin(None), Err(SessionError::NotAuthenticated));
        assert_eq!(check_admin(Some(&user)), Err(SessionError::Forbidden));
        assert_eq!(check_admin(Some(&admin())).map(|u| u.id.as_str()), Ok("u1"));
    }

    #[test]
    fn test_reads_legacy_user_without_token() {
        let store = MemorySessionStore::new();
        store
            .set(SESSION_KEY, r#"{"id":"u2","username":"ana","roles":"USER"}"#)
            .unwrap();
        let session = AuthSession::restore(store);
        assert_eq!(session.user().map(|u| u.role), Some(Role::User));
    }
}
