// Listener - Callback interface invoked on subdivision edges

use super::timeline::MusicalPosition;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle identifying one registration
///
/// Returned by every register call and used to unregister.
/// Registering the same closure twice yields two independent ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receiver of musical events
///
/// Runs synchronously on the thread driving the conductor, so
/// implementations must be short and non-blocking.
///
/// Any `FnMut(&MusicalPosition) + Send` closure is a listener:
/// ```no_run
/// use conductor::sequencer::{Listener, MusicalPosition};
///
/// fn takes_listener(_listener: impl Listener) {}
///
/// takes_listener(|position: &MusicalPosition| {
///     println!("beat {} of measure {}", position.beat, position.measure);
/// });
/// ```
pub trait Listener: Send {
    fn on_event(&mut self, position: &MusicalPosition);
}

impl<F> Listener for F
where
    F: FnMut(&MusicalPosition) + Send,
{
    fn on_event(&mut self, position: &MusicalPosition) {
        self(position)
    }
}

/// Listener that ignores the position payload
pub struct Bare<F>(F);

impl<F> Listener for Bare<F>
where
    F: FnMut() + Send,
{
    fn on_event(&mut self, _position: &MusicalPosition) {
        (self.0)()
    }
}

/// Adapt a parameterless closure into a [`Listener`]
pub fn bare<F>(callback: F) -> Bare<F>
where
    F: FnMut() + Send,
{
    Bare(callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::timeline::TimeSignature;

    #[test]
    fn test_ids_are_unique() {
        let a = ListenerId::next();
        let b = ListenerId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |position: &MusicalPosition| seen.push(position.beat);
            let position = MusicalPosition::new(1, 3, 0.0, TimeSignature::four_four());
            listener.on_event(&position);
            listener.on_event(&position);
        }
        assert_eq!(seen, vec![3, 3]);
    }

    #[test]
    fn test_bare_listener() {
        let mut count = 0;
        {
            let mut listener = bare(|| count += 1);
            let position = MusicalPosition::new(2, 1, 0.5, TimeSignature::four_four());
            listener.on_event(&position);
        }
        assert_eq!(count, 1);
    }
}
