#![forbid(unsafe_code)]

//! Host listener registration.
//!
//! During a drag the host must listen for pointer movement and release on a
//! scope wider than the drag handle. [`ListenerRegistry`] is the seam: a
//! browser host implements it over `addEventListener`/`removeEventListener`,
//! tests and the replay harness use [`TrackedListeners`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a listener pair (pointer move + pointer up) is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerScope {
    #[default]
    Document,
    Window,
}

/// Opaque handle for one attached listener pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Attach and detach host listeners.
pub trait ListenerRegistry {
    /// Attach the move/up listener pair at `scope`.
    fn attach(&mut self, scope: ListenerScope) -> ListenerId;

    /// Detach a listener pair. Unknown ids are ignored.
    fn detach(&mut self, id: ListenerId);
}

impl<R: ListenerRegistry + ?Sized> ListenerRegistry for &mut R {
    fn attach(&mut self, scope: ListenerScope) -> ListenerId {
        (**self).attach(scope)
    }

    fn detach(&mut self, id: ListenerId) {
        (**self).detach(id);
    }
}

impl<R: ListenerRegistry + ?Sized> ListenerRegistry for Box<R> {
    fn attach(&mut self, scope: ListenerScope) -> ListenerId {
        (**self).attach(scope)
    }

    fn detach(&mut self, id: ListenerId) {
        (**self).detach(id);
    }
}

/// In-memory registry that records attachment history.
#[derive(Debug, Clone, Default)]
pub struct TrackedListeners {
    next_id: u64,
    attached: BTreeMap<ListenerId, ListenerScope>,
    attach_count: u64,
    detach_count: u64,
}

impl TrackedListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener pairs currently attached.
    #[must_use]
    pub fn attached(&self) -> usize {
        self.attached.len()
    }

    #[must_use]
    pub fn is_attached(&self, id: ListenerId) -> bool {
        self.attached.contains_key(&id)
    }

    #[must_use]
    pub fn scope_of(&self, id: ListenerId) -> Option<ListenerScope> {
        self.attached.get(&id).copied()
    }

    #[must_use]
    pub const fn attach_count(&self) -> u64 {
        self.attach_count
    }

    #[must_use]
    pub const fn detach_count(&self) -> u64 {
        self.detach_count
    }
}

impl ListenerRegistry for TrackedListeners {
    fn attach(&mut self, scope: ListenerScope) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.attached.insert(id, scope);
        self.attach_count += 1;
        id
    }

    fn detach(&mut self, id: ListenerId) {
        if self.attached.remove(&id).is_some() {
            self.detach_count += 1;
        } else {
            tracing::warn!(%id, "detach of unknown listener ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_then_detach_balances() {
        let mut listeners = TrackedListeners::new();
        let id = listeners.attach(ListenerScope::Document);
        assert!(listeners.is_attached(id));
        assert_eq!(listeners.scope_of(id), Some(ListenerScope::Document));
        listeners.detach(id);
        assert_eq!(listeners.attached(), 0);
        assert_eq!(listeners.attach_count(), 1);
        assert_eq!(listeners.detach_count(), 1);
    }

    #[test]
    fn double_detach_is_counted_once() {
        let mut listeners = TrackedListeners::new();
        let id = listeners.attach(ListenerScope::Window);
        listeners.detach(id);
        listeners.detach(id);
        assert_eq!(listeners.detach_count(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let mut listeners = TrackedListeners::new();
        let a = listeners.attach(ListenerScope::Document);
        let b = listeners.attach(ListenerScope::Document);
        assert_ne!(a, b);
        assert_eq!(listeners.attached(), 2);
    }
}
