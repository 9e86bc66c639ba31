// Event registry - Listener bookkeeping and dispatch for one subdivision
// Persistent, one-shot and bounded-repeat listener sets

use super::listener::{Listener, ListenerId};
use super::timeline::MusicalPosition;
use super::{ConductorError, ConductorResult};
use std::panic::{self, AssertUnwindSafe};

/// How long a registration stays active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    /// Fires on every edge until unregistered
    Persistent,
    /// Fires on the next edge, then is removed
    OneShot,
    /// Fires on the next `total` edges, then is removed
    Repeating { remaining: u32, total: u32 },
}

impl ListenerKind {
    /// Repeating kind with a full budget of `count` executions
    pub fn repeating(count: u32) -> ConductorResult<Self> {
        if count == 0 {
            return Err(ConductorError::InvalidRepeatCount(count));
        }
        Ok(ListenerKind::Repeating {
            remaining: count,
            total: count,
        })
    }
}

/// One registered listener
pub struct ListenerEntry {
    id: ListenerId,
    kind: ListenerKind,
    listener: Box<dyn Listener>,
}

impl ListenerEntry {
    pub fn new(id: ListenerId, kind: ListenerKind, listener: Box<dyn Listener>) -> Self {
        Self { id, kind, listener }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Invoke the listener, isolating panics so other listeners still fire
    fn invoke(&mut self, position: &MusicalPosition) {
        let listener = &mut self.listener;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(position)));
        if outcome.is_err() {
            log::error!("Listener {} panicked during dispatch, skipping it", self.id);
        }
    }
}

impl std::fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Listener sets attached to one subdivision
#[derive(Debug, Default)]
pub struct EventRegistry {
    persistent: Vec<ListenerEntry>,
    one_shots: Vec<ListenerEntry>,
    repeating: Vec<ListenerEntry>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire on every edge until unregistered
    pub fn register_persistent(&mut self, listener: Box<dyn Listener>) -> ListenerId {
        self.insert(ListenerId::next(), ListenerKind::Persistent, listener)
    }

    /// Fire on the next edge only
    pub fn register_one_shot(&mut self, listener: Box<dyn Listener>) -> ListenerId {
        self.insert(ListenerId::next(), ListenerKind::OneShot, listener)
    }

    /// Fire on each of the next `count` edges
    ///
    /// # Errors
    /// `InvalidRepeatCount` when `count` is 0; nothing is registered.
    pub fn register_repeating(
        &mut self,
        listener: Box<dyn Listener>,
        count: u32,
    ) -> ConductorResult<ListenerId> {
        let kind = ListenerKind::repeating(count)?;
        Ok(self.insert(ListenerId::next(), kind, listener))
    }

    /// Add a listener under a pre-allocated id
    pub fn insert(
        &mut self,
        id: ListenerId,
        kind: ListenerKind,
        listener: Box<dyn Listener>,
    ) -> ListenerId {
        self.insert_entry(ListenerEntry::new(id, kind, listener))
    }

    /// Add a prepared entry to the set matching its kind
    pub fn insert_entry(&mut self, entry: ListenerEntry) -> ListenerId {
        let id = entry.id;
        match entry.kind {
            ListenerKind::Persistent => self.persistent.push(entry),
            ListenerKind::OneShot => self.one_shots.push(entry),
            ListenerKind::Repeating { .. } => self.repeating.push(entry),
        }
        id
    }

    /// Remove `id` from every set
    /// Unknown or already-completed ids are ignored. Returns whether anything was removed.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.len();
        self.persistent.retain(|entry| entry.id != id);
        self.one_shots.retain(|entry| entry.id != id);
        self.repeating.retain(|entry| entry.id != id);
        self.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries().any(|entry| entry.id == id)
    }

    /// Kind (with remaining budget) of a live registration
    pub fn kind_of(&self, id: ListenerId) -> Option<ListenerKind> {
        self.entries()
            .find(|entry| entry.id == id)
            .map(|entry| entry.kind)
    }

    pub fn len(&self) -> usize {
        self.persistent.len() + self.one_shots.len() + self.repeating.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.persistent.clear();
        self.one_shots.clear();
        self.repeating.clear();
    }

    fn entries(&self) -> impl Iterator<Item = &ListenerEntry> {
        self.persistent
            .iter()
            .chain(self.one_shots.iter())
            .chain(self.repeating.iter())
    }

    /// Deliver one edge to every listener
    ///
    /// Order: persistent, then one-shots (set cleared), then repeating
    /// listeners, each in registration order. Repeating listeners see their
    /// pre-decrement budget, so the last dispatch reports remaining = 1.
    /// Returns the number of listeners invoked.
    pub fn dispatch(&mut self, position: &MusicalPosition) -> usize {
        let mut fired = 0;

        for entry in self.persistent.iter_mut() {
            entry.invoke(position);
            fired += 1;
        }

        let one_shots = std::mem::take(&mut self.one_shots);
        let one_shot_position = position.with_executions(1, 1);
        for mut entry in one_shots {
            entry.invoke(&one_shot_position);
            fired += 1;
        }

        self.repeating.retain_mut(|entry| {
            let ListenerKind::Repeating { remaining, total } = entry.kind else {
                return false;
            };
            if remaining == 0 {
                return false;
            }

            entry.invoke(&position.with_executions(remaining, total));
            fired += 1;

            let remaining = remaining - 1;
            entry.kind = ListenerKind::Repeating { remaining, total };
            remaining > 0
        });

        fired
    }
}
