// Meter - Beat and measure counting driven by beat-unit edges

use super::timeline::TimeSignature;

/// Counts beats and measures under a time signature
#[derive(Debug, Clone)]
pub struct TimeSignatureTracker {
    time_signature: TimeSignature,
    measure: u64, // 1-based, unbounded
    beat: u32,    // 1-based, wraps at beats_per_measure
}

impl TimeSignatureTracker {
    pub fn new(time_signature: TimeSignature) -> Self {
        Self {
            time_signature,
            measure: 1,
            beat: 1,
        }
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn measure(&self) -> u64 {
        self.measure
    }

    pub fn beat(&self) -> u32 {
        self.beat
    }

    /// Advance one beat, wrapping into the next measure
    /// Returns the new (measure, beat)
    pub fn on_beat_edge(&mut self) -> (u64, u32) {
        self.beat += 1;
        if self.beat > self.time_signature.beats_per_measure {
            self.beat = 1;
            self.measure += 1;
        }
        (self.measure, self.beat)
    }

    /// Switch time signature without resetting counters
    /// A beat past the new measure length is clamped to the last beat.
    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature;
        self.beat = self.beat.min(time_signature.beats_per_measure);
    }

    /// Back to measure 1, beat 1
    pub fn reset(&mut self) {
        self.measure = 1;
        self.beat = 1;
    }
}

impl Default for TimeSignatureTracker {
    fn default() -> Self {
        Self::new(TimeSignature::default())
    }
}
