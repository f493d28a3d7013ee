//! Session-change listener registry.
//!
//! # Responsibility
//! - Fan out `SessionChange` events to registered listeners.
//! - Tie each registration to an RAII handle that unsubscribes on drop.
//!
//! # Invariants
//! - Listeners run outside the registry lock, so a listener may subscribe or
//!   drop handles without deadlocking.
//! - A dropped handle never receives further events.

use crate::auth::provider::SessionChange;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Callback invoked for every published session change.
pub type SessionListener = Arc<dyn Fn(&SessionChange) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, SessionListener>,
}

/// Listener registry shared by identity provider implementations.
#[derive(Default)]
pub struct SessionNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl SessionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: SessionListener) -> SessionSubscription {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, listener);
        SessionSubscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn publish(&self, change: &SessionChange) {
        let listeners = lock(&self.registry)
            .listeners
            .values()
            .cloned()
            .collect::<Vec<_>>();
        for listener in listeners {
            listener(change);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

/// Registration handle; unsubscribes when dropped.
pub struct SessionSubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl SessionSubscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).listeners.remove(&self.id);
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
