// Subdivision tracker - Interval edge detection for one note value
// Converts elapsed time into an interval index and reports boundary crossings

use super::timeline::{NoteValue, Tempo};

/// Edge detector for a single subdivision
///
/// Fires once per interval boundary crossing, not once per tick.
#[derive(Debug, Clone)]
pub struct SubdivisionTracker {
    note: NoteValue,
    interval_length: f64,
    /// Last interval index that triggered (None = never triggered)
    last_index: Option<i64>,
    triggered: bool,
}

impl SubdivisionTracker {
    /// Create new tracker for `note` at the given tempo
    pub fn new(note: NoteValue, tempo: &Tempo) -> Self {
        Self {
            note,
            interval_length: note.interval_length(tempo),
            last_index: None,
            triggered: false,
        }
    }

    pub fn note(&self) -> NoteValue {
        self.note
    }

    /// Interval length in seconds
    pub fn interval_length(&self) -> f64 {
        self.interval_length
    }

    /// Last interval index that produced an edge
    pub fn last_index(&self) -> Option<i64> {
        self.last_index
    }

    /// Whether the latest `update` detected an edge
    pub fn has_triggered(&self) -> bool {
        self.triggered
    }

    /// Interval index containing `time_seconds`
    pub fn interval_index(&self, time_seconds: f64) -> i64 {
        (time_seconds / self.interval_length).floor() as i64
    }

    /// Check for an interval boundary crossing at `time_seconds`
    ///
    /// The first call only triggers once the index is non-negative, so
    /// pre-roll time (negative offset) produces no edges.
    /// Calling again with the same time never produces a second edge.
    pub fn update(&mut self, time_seconds: f64) -> bool {
        let index = self.interval_index(time_seconds);

        self.triggered = match self.last_index {
            None => index >= 0,
            Some(last) => index != last,
        };

        if self.triggered {
            self.last_index = Some(index);
        }

        self.triggered
    }

    /// Fractional position within the current interval, in [0, 1)
    /// Not edge-gated: valid for any time
    pub fn fraction_at(&self, time_seconds: f64) -> f64 {
        let fraction = (time_seconds / self.interval_length).rem_euclid(1.0);
        // rem_euclid may round up to exactly 1.0 for tiny negative inputs
        if fraction >= 1.0 { 0.0 } else { fraction }
    }

    /// Recompute the interval length after a tempo change
    ///
    /// Edge state is kept: an edge may be skipped or fire twice right
    /// after the change.
    pub fn set_tempo(&mut self, tempo: &Tempo) {
        self.interval_length = self.note.interval_length(tempo);
    }

    /// Forget the last triggered index (e.g. after the clock jumped back)
    pub fn reset(&mut self) {
        self.last_index = None;
        self.triggered = false;
    }
}
