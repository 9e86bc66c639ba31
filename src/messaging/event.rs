// Conductor events - Edge notifications sent across threads

use crate::messaging::channels::EventProducer;
use crate::sequencer::{Listener, MusicalPosition, NoteValue};
use ringbuf::traits::Producer;

/// One subdivision edge, as seen by a remote consumer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConductorEvent {
    pub note: NoteValue,
    pub position: MusicalPosition,
}

/// Listener pushing every edge into a lock-free ring buffer
///
/// Never blocks the tick: when the consumer falls behind, events are
/// dropped and counted.
pub struct ForwardingListener {
    note: NoteValue,
    producer: EventProducer,
    dropped: u64,
}

impl ForwardingListener {
    pub fn new(note: NoteValue, producer: EventProducer) -> Self {
        Self {
            note,
            producer,
            dropped: 0,
        }
    }

    /// Events lost because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Listener for ForwardingListener {
    fn on_event(&mut self, position: &MusicalPosition) {
        let event = ConductorEvent {
            note: self.note,
            position: *position,
        };

        // try_push is not blocking
        if self.producer.try_push(event).is_err() {
            self.dropped += 1;
            log::warn!(
                "Event channel full, {} event at {} dropped ({} total)",
                self.note,
                position,
                self.dropped
            );
        }
    }
}
