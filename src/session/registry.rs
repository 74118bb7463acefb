//! Registry of the active session's cancellation handle.
//!
//! Holds at most one `(SessionId, CancellationToken)` pair behind its own
//! lock.  Supersession cancels whatever handle is registered at that moment.
//!
//! The global slot is released as soon as the primary race settles, while
//! the session's variants may keep streaming.  A later session that finds the
//! slot free registers itself over the still-running one.  What happens to
//! the displaced session is a policy choice passed to [`register`]:
//!
//! * `cancel_previous = false`: the displaced session's remaining calls run
//!   to completion untracked.
//! * `cancel_previous = true`: the displaced session is canceled on
//!   registration.
//!
//! [`register`]: SessionRegistry::register

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use super::SessionId;

#[derive(Debug, Clone)]
struct ActiveSession {
    id: SessionId,
    token: CancellationToken,
}

/// Cheap to clone; clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    active: Arc<Mutex<Option<ActiveSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the active session.  Returns the id it displaced, if any.
    pub fn register(
        &self,
        id: SessionId,
        token: CancellationToken,
        cancel_previous: bool,
    ) -> Option<SessionId> {
        let previous = self.lock().replace(ActiveSession { id, token });
        previous.map(|prev| {
            if cancel_previous {
                prev.token.cancel();
            }
            prev.id
        })
    }

    /// Cancel the registered session, if any.  The handle stays registered
    /// until its owner clears it.
    pub fn cancel_active(&self) -> Option<SessionId> {
        let guard = self.lock();
        guard.as_ref().map(|active| {
            active.token.cancel();
            active.id
        })
    }

    /// Drop the registration if it still belongs to `id`.
    pub fn clear_if(&self, id: SessionId) -> bool {
        let mut guard = self.lock();
        if guard.as_ref().is_some_and(|active| active.id == id) {
            *guard = None;
            true
        } else {
            false
        }
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.lock().as_ref().map(|active| active.id)
    }

    /// Critical sections here never panic, so a poisoned lock still holds
    /// consistent data.
    fn lock(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps `id` registered until the last clone is dropped.
///
/// The orchestrator holds one for the critical section and the fan-out
/// dispatcher one until every call settles.  Dropping the last clears the
/// registration, unless a newer session has taken it over.
#[derive(Debug)]
pub struct Registration {
    registry: SessionRegistry,
    id: SessionId,
}

impl Registration {
    pub fn new(registry: SessionRegistry, id: SessionId) -> Self {
        Self { registry, id }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.clear_if(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_clears_when_last_holder_drops() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        registry.register(id, CancellationToken::new(), false);

        let first = Arc::new(Registration::new(registry.clone(), id));
        let second = Arc::clone(&first);
        drop(first);
        assert_eq!(registry.active_id(), Some(id));
        drop(second);
        assert_eq!(registry.active_id(), None);
    }

    #[test]
    fn registration_leaves_newer_session_alone() {
        let registry = SessionRegistry::new();
        let (old, new) = (SessionId::new(), SessionId::new());
        registry.register(old, CancellationToken::new(), false);
        let registration = Registration::new(registry.clone(), old);

        registry.register(new, CancellationToken::new(), false);
        drop(registration);
        assert_eq!(registry.active_id(), Some(new));
    }

    #[test]
    fn register_then_cancel_active() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let token = CancellationToken::new();

        assert_eq!(registry.register(id, token.clone(), false), None);
        assert_eq!(registry.cancel_active(), Some(id));
        assert!(token.is_cancelled());
        assert_eq!(registry.active_id(), Some(id));
    }

    #[test]
    fn cancel_active_on_empty_registry() {
        assert_eq!(SessionRegistry::new().cancel_active(), None);
    }

    #[test]
    fn replacing_without_cancel_leaves_previous_running() {
        let registry = SessionRegistry::new();
        let (first, second) = (SessionId::new(), SessionId::new());
        let first_token = CancellationToken::new();

        registry.register(first, first_token.clone(), false);
        let displaced = registry.register(second, CancellationToken::new(), false);

        assert_eq!(displaced, Some(first));
        assert!(!first_token.is_cancelled());
        assert_eq!(registry.active_id(), Some(second));
    }

    #[test]
    fn replacing_with_cancel_stops_previous() {
        let registry = SessionRegistry::new();
        let first_token = CancellationToken::new();

        registry.register(SessionId::new(), first_token.clone(), true);
        registry.register(SessionId::new(), CancellationToken::new(), true);

        assert!(first_token.is_cancelled());
    }

    #[test]
    fn clear_if_only_clears_owner() {
        let registry = SessionRegistry::new();
        let (first, second) = (SessionId::new(), SessionId::new());

        registry.register(first, CancellationToken::new(), false);
        registry.register(second, CancellationToken::new(), false);

        assert!(!registry.clear_if(first));
        assert_eq!(registry.active_id(), Some(second));
        assert!(registry.clear_if(second));
        assert_eq!(registry.active_id(), None);
    }
}
