//! Explicit session context: the cached identity of the logged-in user.

mod store;

use std::path::PathBuf;

use fintrack_api_models::{RecordId, User};
use thiserror::Error;

pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Store key for the user identifier.
pub const USER_ID_KEY: &str = "fintrack.user_id";
/// Store key for the display name.
pub const USER_NAME_KEY: &str = "fintrack.user_name";
/// Store key for the preferred currency.
pub const USER_CURRENCY_KEY: &str = "fintrack.user_currency";

/// Convenience alias for session results.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A command that needs a user ran without one.
    #[error("You must be logged in to continue.")]
    NotAuthenticated,
    /// The backing file could not be read or written.
    #[error("session store I/O failure during {operation} at {path}")]
    Io {
        /// Operation that failed.
        operation: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The backing file is not a JSON object of strings.
    #[error("session store at {path} is corrupt")]
    Corrupt {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Cached identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Backend identifier.
    pub id: RecordId,
    /// Display name, when known.
    pub name: Option<String>,
    /// Preferred currency, when known.
    pub currency: Option<String>,
}

impl AuthenticatedUser {
    /// Name for greetings, falling back to `User`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("User")
    }
}

/// Whether someone is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nobody is logged in.
    #[default]
    Anonymous,
    /// A user is logged in.
    Authenticated(AuthenticatedUser),
}

/// Owns the store and the state derived from it.
#[derive(Debug)]
pub struct SessionContext<S> {
    store: S,
    state: SessionState,
}

impl<S: KeyValueStore> SessionContext<S> {
    /// Read the store once and derive the current state.
    ///
    /// An identifier that is not an integer reads as anonymous.
    #[must_use]
    pub fn init(store: S) -> Self {
        let state = store
            .get(USER_ID_KEY)
            .and_then(|raw| raw.trim().parse::<RecordId>().ok())
            .map_or(SessionState::Anonymous, |id| {
                SessionState::Authenticated(AuthenticatedUser {
                    id,
                    name: non_blank(store.get(USER_NAME_KEY)),
                    currency: non_blank(store.get(USER_CURRENCY_KEY)),
                })
            });
        Self { store, state }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&AuthenticatedUser> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    /// Entry check for commands that need a user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] when anonymous.
    pub fn require_authenticated(&self) -> SessionResult<&AuthenticatedUser> {
        self.user().ok_or(SessionError::NotAuthenticated)
    }

    /// Preferred currency of the logged-in user, else `fallback`.
    #[must_use]
    pub fn currency_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.user()
            .and_then(|user| user.currency.as_deref())
            .unwrap_or(fallback)
    }

    /// Record a successful login or registration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the store cannot be written.
    pub fn establish(&mut self, user: &User) -> SessionResult<&AuthenticatedUser> {
        let id = user.id.to_string();
        let name = non_blank(user.name.clone());
        let currency = non_blank(user.preferred_currency.clone());
        self.store.apply(&[
            (USER_ID_KEY, Some(id.as_str())),
            (USER_NAME_KEY, name.as_deref()),
            (USER_CURRENCY_KEY, currency.as_deref()),
        ])?;
        tracing::debug!(user_id = user.id, "session established");
        self.state = SessionState::Authenticated(AuthenticatedUser {
            id: user.id,
            name,
            currency,
        });
        self.require_authenticated()
    }

    /// Refresh cached name and currency after a profile update. Fields the
    /// backend did not return are kept.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] when anonymous, or a store
    /// error when the update cannot be written.
    pub fn apply_profile(&mut self, user: &User) -> SessionResult<()> {
        let SessionState::Authenticated(current) = &mut self.state else {
            return Err(SessionError::NotAuthenticated);
        };
        let name = non_blank(user.name.clone());
        let currency = non_blank(user.preferred_currency.clone());
        let changes: Vec<(&str, Option<&str>)> = [
            (USER_NAME_KEY, name.as_deref()),
            (USER_CURRENCY_KEY, currency.as_deref()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_some())
        .collect();
        self.store.apply(&changes)?;

        if name.is_some() {
            current.name = name;
        }
        if currency.is_some() {
            current.currency = currency;
        }
        Ok(())
    }

    /// Forget the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the store cannot be written.
    pub fn clear(&mut self) -> SessionResult<()> {
        self.store
            .apply(&[(USER_ID_KEY, None), (USER_NAME_KEY, None), (USER_CURRENCY_KEY, None)])?;
        self.state = SessionState::Anonymous;
        tracing::debug!("session cleared");
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> User {
        User {
            id: 7,
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            preferred_currency: Some("EUR".into()),
        }
    }

    #[test]
    fn empty_store_is_anonymous() {
        let session = SessionContext::init(MemoryStore::new());
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(matches!(
            session.require_authenticated(),
            Err(SessionError::NotAuthenticated)
        ));
        assert_eq!(session.currency_or("USD"), "USD");
    }

    #[test]
    fn non_numeric_id_is_anonymous() -> SessionResult<()> {
        let mut store = MemoryStore::new();
        store.set(USER_ID_KEY, "abc")?;
        store.set(USER_NAME_KEY, "Ada")?;
        let session = SessionContext::init(store);
        assert_eq!(session.state(), &SessionState::Anonymous);
        Ok(())
    }

    #[test]
    fn establish_writes_all_fields() -> SessionResult<()> {
        let mut session = SessionContext::init(MemoryStore::new());
        let user = session.establish(&ada())?.clone();
        assert_eq!(user.id, 7);
        assert_eq!(user.display_name(), "Ada");
        assert_eq!(session.store().get(USER_ID_KEY).as_deref(), Some("7"));
        assert_eq!(session.store().get(USER_CURRENCY_KEY).as_deref(), Some("EUR"));
        assert_eq!(session.currency_or("USD"), "EUR");

        let reloaded = SessionContext::init(session.store().clone());
        assert_eq!(reloaded.state(), session.state());
        Ok(())
    }

    #[test]
    fn establish_drops_stale_optional_fields() -> SessionResult<()> {
        let mut session = SessionContext::init(MemoryStore::new());
        session.establish(&ada())?;
        let bare = User {
            id: 8,
            name: None,
            email: None,
            preferred_currency: None,
        };
        session.establish(&bare)?;
        assert_eq!(session.store().get(USER_NAME_KEY), None);
        assert_eq!(session.currency_or("USD"), "USD");
        assert_eq!(session.require_authenticated()?.display_name(), "User");
        Ok(())
    }

    #[test]
    fn apply_profile_updates_name_and_currency_only() -> SessionResult<()> {
        let mut session = SessionContext::init(MemoryStore::new());
        session.establish(&ada())?;
        session.apply_profile(&User {
            id: 7,
            name: Some("Ada L.".into()),
            email: None,
            preferred_currency: None,
        })?;
        let user = session.require_authenticated()?;
        assert_eq!(user.name.as_deref(), Some("Ada L."));
        assert_eq!(user.currency.as_deref(), Some("EUR"));
        Ok(())
    }

    #[test]
    fn apply_profile_requires_login() {
        let mut session = SessionContext::init(MemoryStore::new());
        assert!(matches!(
            session.apply_profile(&ada()),
            Err(SessionError::NotAuthenticated)
        ));
    }

    #[test]
    fn clear_removes_every_key() -> SessionResult<()> {
        let mut session = SessionContext::init(MemoryStore::new());
        session.establish(&ada())?;
        session.clear()?;
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert_eq!(session.store(), &MemoryStore::new());
        Ok(())
    }

    #[test]
    fn failed_establish_keeps_previous_user() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("session.json");
        let mut session = SessionContext::init(FileStore::open(&path)?);
        session.establish(&ada())?;

        std::fs::create_dir(path.with_extension("tmp"))?;
        let other = User {
            id: 8,
            name: Some("Bo".into()),
            email: None,
            preferred_currency: Some("GBP".into()),
        };
        assert!(session.establish(&other).is_err());
        assert_eq!(session.require_authenticated()?.id, 7);

        let reopened = SessionContext::init(FileStore::open(&path)?);
        assert_eq!(reopened.state(), session.state());
        Ok(())
    }
}
