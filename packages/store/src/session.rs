//! # Auth session store
//!
//! [`SessionStore`] is the single holder of the signed-in session. It is a cheap,
//! cloneable handle: construct one at startup and pass it to whatever needs it
//! (the API client, the auth flows, the UI provider). There is no global.
//!
//! The state can only change through five operations:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`set_token`](SessionStore::set_token) | Stores both tokens and marks the session authenticated. Always followed by `set_user`. |
//! | [`set_user`](SessionStore::set_user) | Replaces the user snapshot wholesale. |
//! | [`set_loading`](SessionStore::set_loading) | Transient UI flag, never persisted. |
//! | [`set_error`](SessionStore::set_error) | Transient UI message, never persisted. |
//! | [`clear_auth`](SessionStore::clear_auth) | Resets everything to [`Session::default`]. The only logout primitive. |
//!
//! Readers either take a [`snapshot`](SessionStore::snapshot) or
//! [`subscribe`](SessionStore::subscribe) to be woken on every change.
//!
//! The store never touches the network or persisted storage; the auth flows in
//! the `api` crate do both and then report the outcome here.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::User;

/// Snapshot of the authenticated session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Always equal to `access_token.is_some()`.
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Session {
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    state: Arc<watch::Sender<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Receiver that observes every subsequent mutation.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn set_token(&self, access_token: impl Into<String>, refresh_token: impl Into<String>) {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        self.state.send_modify(|s| {
            s.is_authenticated = !access_token.is_empty();
            s.access_token = Some(access_token).filter(|t| !t.is_empty());
            s.refresh_token = Some(refresh_token).filter(|t| !t.is_empty());
        });
    }

    pub fn set_user(&self, user: User) {
        self.state.send_modify(|s| s.user = Some(user));
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.send_if_modified(|s| {
            let changed = s.error != error;
            s.error = error;
            changed
        });
    }

    pub fn clear_auth(&self) {
        self.state.send_modify(|s| *s = Session::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "sub-1".into(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            role: "Attendee".into(),
            avatar: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_initial_state_is_empty() {
        let store = SessionStore::new();
        assert_eq!(store.snapshot(), Session::default());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_set_token_marks_authenticated() {
        let store = SessionStore::new();
        store.set_token("access", "refresh");
        store.set_user(user());

        let s = store.snapshot();
        assert!(s.is_authenticated);
        assert_eq!(s.access_token.as_deref(), Some("access"));
        assert_eq!(s.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(s.user_id(), Some("sub-1"));
    }

    #[test]
    fn test_authenticated_tracks_access_token() {
        let store = SessionStore::new();
        store.set_token("", "refresh");
        let s = store.snapshot();
        assert_eq!(s.is_authenticated, s.access_token.is_some());
        assert!(!s.is_authenticated);
    }

    #[test]
    fn test_clear_auth_resets_everything() {
        let store = SessionStore::new();
        store.set_token("access", "refresh");
        store.set_user(user());
        store.set_loading(true);
        store.set_error(Some("boom".into()));

        store.clear_auth();
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        other.set_loading(true);
        assert!(store.snapshot().loading);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.set_error(Some("Invalid credentials".into()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().error.as_deref(), Some("Invalid credentials"));

        // Setting the same value again does not wake subscribers.
        store.set_error(Some("Invalid credentials".into()));
        assert!(!rx.has_changed().unwrap());
    }
}
