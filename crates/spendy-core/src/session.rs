//! Account session handling.
//!
//! Services never look up the signed-in user themselves; callers hand them a
//! [`Session`] obtained from a [`SessionProvider`].

use spendy_domain::OwnerId;
use tracing::info;

use crate::CoreError;

/// Proof that a user is signed in, passed explicitly to services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    owner: OwnerId,
}

impl Session {
    pub fn new(owner: OwnerId) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Captures the provider's current user, failing when nobody is signed in.
    pub fn from_provider(provider: &dyn SessionProvider) -> Result<Self, CoreError> {
        provider
            .current_user()
            .map(Session::new)
            .ok_or(CoreError::NotAuthenticated)
    }
}

/// Lifecycle changes reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(OwnerId),
    LoggedOut(OwnerId),
}

/// Supplies the signed-in user and the login/logout lifecycle.
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<OwnerId>;
    fn login(&mut self, owner: OwnerId) -> Vec<SessionEvent>;
    fn logout(&mut self) -> Option<SessionEvent>;
}

/// In-process provider holding at most one signed-in user.
#[derive(Debug, Clone, Default)]
pub struct LocalSession {
    current: Option<OwnerId>,
}

impl LocalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(owner: OwnerId) -> Self {
        Self {
            current: Some(owner),
        }
    }
}

impl SessionProvider for LocalSession {
    fn current_user(&self) -> Option<OwnerId> {
        self.current.clone()
    }

    /// Signing in as someone else first signs the previous user out.
    fn login(&mut self, owner: OwnerId) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.current.as_ref() == Some(&owner) {
            return events;
        }
        if let Some(event) = self.logout() {
            events.push(event);
        }
        info!(user = %owner, "signed in");
        self.current = Some(owner.clone());
        events.push(SessionEvent::LoggedIn(owner));
        events
    }

    fn logout(&mut self) -> Option<SessionEvent> {
        let previous = self.current.take()?;
        info!(user = %previous, "signed out");
        Some(SessionEvent::LoggedOut(previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_requires_signed_in_user() {
        let provider = LocalSession::new();
        assert!(matches!(
            Session::from_provider(&provider),
            Err(CoreError::NotAuthenticated)
        ));
    }

    #[test]
    fn switching_users_emits_logout_then_login() {
        let mut provider = LocalSession::signed_in(OwnerId::new("alice"));
        let events = provider.login(OwnerId::new("bob"));
        assert_eq!(
            events,
            vec![
                SessionEvent::LoggedOut(OwnerId::new("alice")),
                SessionEvent::LoggedIn(OwnerId::new("bob")),
            ]
        );
        let session = Session::from_provider(&provider).unwrap();
        assert_eq!(session.owner().as_str(), "bob");
    }

    #[test]
    fn repeated_login_and_logout_are_quiet() {
        let mut provider = LocalSession::signed_in(OwnerId::new("alice"));
        assert!(provider.login(OwnerId::new("alice")).is_empty());
        assert!(provider.logout().is_some());
        assert!(provider.logout().is_none());
        assert_eq!(provider.current_user(), None);
    }
}
