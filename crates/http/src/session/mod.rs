//! Session state: stored credentials, current user and authentication flag

pub mod navigator;
pub mod store;

pub use navigator::{Navigator, NoopNavigator, Route};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

use crate::types::{LoginResponse, UserProfile};
use std::sync::Arc;
use store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use tokio::sync::watch;

/// Owns the session credentials.
///
/// Other components read tokens through this type and never touch the
/// underlying [`TokenStore`]. Changes to the user and the authentication
/// flag are published on watch channels, only from `establish`,
/// `replace_access_token` and `logout`.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    user_tx: watch::Sender<Option<UserProfile>>,
    authenticated_tx: watch::Sender<bool>,
}

impl SessionManager {
    /// Restore a session from `store`.
    ///
    /// The authenticated flag is derived here, once, from the presence of a
    /// stored access token.
    pub fn new(store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        let authenticated = store.get(ACCESS_TOKEN_KEY).is_some();
        let user = load_user(store.as_ref());

        let (user_tx, _) = watch::channel(user);
        let (authenticated_tx, _) = watch::channel(authenticated);

        debug!(authenticated, "Session restored");

        Self {
            store,
            navigator,
            user_tx,
            authenticated_tx,
        }
    }

    /// Session backed by memory, with navigation requests ignored
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()), Arc::new(NoopNavigator))
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.user_tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated_tx.borrow()
    }

    /// Receive every change of the current user
    pub fn subscribe_user(&self) -> watch::Receiver<Option<UserProfile>> {
        self.user_tx.subscribe()
    }

    /// Receive every change of the authentication flag
    pub fn subscribe_authenticated(&self) -> watch::Receiver<bool> {
        self.authenticated_tx.subscribe()
    }

    /// Drop all credentials and send the user to the login view.
    ///
    /// Safe to call without a session; the navigation still happens.
    pub fn logout(&self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
        self.store.remove(USER_KEY);

        self.user_tx.send_replace(None);
        self.authenticated_tx.send_replace(false);

        info!("Session cleared");
        self.navigator.navigate(Route::Login);
    }

    /// Record a successful login
    pub(crate) fn establish(&self, response: &LoginResponse) {
        self.store.set(ACCESS_TOKEN_KEY, &response.access);
        self.store.set(REFRESH_TOKEN_KEY, &response.refresh);

        match &response.user {
            Some(user) => match serde_json::to_string(user) {
                Ok(serialized) => self.store.set(USER_KEY, &serialized),
                Err(e) => {
                    error!("Failed to serialize user profile: {}", e);
                    self.store.remove(USER_KEY);
                }
            },
            None => self.store.remove(USER_KEY),
        }

        self.user_tx.send_replace(response.user.clone());
        self.authenticated_tx.send_replace(true);

        info!(
            user = response.user.as_ref().map(|u| u.username.as_str()),
            "Session established"
        );
    }

    /// Overwrite the access token after a refresh; the refresh token is kept
    pub(crate) fn replace_access_token(&self, access: &str) {
        self.store.set(ACCESS_TOKEN_KEY, access);
        debug!("Access token refreshed");
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.current_user().map(|u| u.username))
            .finish_non_exhaustive()
    }
}

fn load_user(store: &dyn TokenStore) -> Option<UserProfile> {
    let raw = store.get(USER_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Ignoring unreadable stored user profile: {}", e);
            None
        }
    }
}
