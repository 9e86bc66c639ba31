// Timeline - Musical time representation
// Note values, time signatures, tempo and the position snapshot handed to listeners

use super::{ConductorError, ConductorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subdivision granularity tracked by the conductor
///
/// Variants are ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoteValue {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl NoteValue {
    /// Number of supported note values
    pub const COUNT: usize = 6;

    /// All note values, coarsest first
    pub const ALL: [NoteValue; Self::COUNT] = [
        NoteValue::Whole,
        NoteValue::Half,
        NoteValue::Quarter,
        NoteValue::Eighth,
        NoteValue::Sixteenth,
        NoteValue::ThirtySecond,
    ];

    /// Intervals per quarter-note beat
    /// Example: quarter = 1.0, eighth = 2.0, whole = 0.25
    pub fn multiplier(&self) -> f64 {
        match self {
            NoteValue::Whole => 0.25,
            NoteValue::Half => 0.5,
            NoteValue::Quarter => 1.0,
            NoteValue::Eighth => 2.0,
            NoteValue::Sixteenth => 4.0,
            NoteValue::ThirtySecond => 8.0,
        }
    }

    /// Slot index used by per-subdivision arrays
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Length of one interval of this note value in seconds
    pub fn interval_length(&self, tempo: &Tempo) -> f64 {
        60.0 / (tempo.bpm() * self.multiplier())
    }
}

impl fmt::Display for NoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoteValue::Whole => "whole",
            NoteValue::Half => "half",
            NoteValue::Quarter => "quarter",
            NoteValue::Eighth => "eighth",
            NoteValue::Sixteenth => "sixteenth",
            NoteValue::ThirtySecond => "thirty-second",
        };
        f.write_str(name)
    }
}

/// Time signature (beats per measure + the note value counted as one beat)
/// Example: 6/8 = TimeSignature { beats_per_measure: 6, beat_unit: Eighth }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats_per_measure: u32,
    pub beat_unit: NoteValue,
}

impl TimeSignature {
    /// Creates a new time signature
    pub fn new(beats_per_measure: u32, beat_unit: NoteValue) -> ConductorResult<Self> {
        let signature = Self {
            beats_per_measure,
            beat_unit,
        };
        signature.validate()?;
        Ok(signature)
    }

    /// Common 4/4 time signature
    pub fn four_four() -> Self {
        Self {
            beats_per_measure: 4,
            beat_unit: NoteValue::Quarter,
        }
    }

    /// Common 3/4 time signature (waltz)
    pub fn three_four() -> Self {
        Self {
            beats_per_measure: 3,
            beat_unit: NoteValue::Quarter,
        }
    }

    /// Common 6/8 time signature
    pub fn six_eight() -> Self {
        Self {
            beats_per_measure: 6,
            beat_unit: NoteValue::Eighth,
        }
    }

    /// Rejects signatures that can never complete a measure.
    /// Deserialized values bypass `new`, so config loading calls this too.
    pub fn validate(&self) -> ConductorResult<()> {
        if self.beats_per_measure == 0 {
            return Err(ConductorError::InvalidTimeSignature(
                "beats per measure must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let denominator = match self.beat_unit {
            NoteValue::Whole => 1,
            NoteValue::Half => 2,
            NoteValue::Quarter => 4,
            NoteValue::Eighth => 8,
            NoteValue::Sixteenth => 16,
            NoteValue::ThirtySecond => 32,
        };
        write!(f, "{}/{}", self.beats_per_measure, denominator)
    }
}

/// Tempo in BPM (quarter notes per minute)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    /// Creates a new tempo
    /// BPM must be finite and > 0
    pub fn new(bpm: f64) -> ConductorResult<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(ConductorError::InvalidTempo(bpm));
        }
        Ok(Self { bpm })
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one quarter-note beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: 120.0 }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}

/// Execution budget reported with each dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Executions {
    /// Persistent listener, fires until unregistered
    Unbounded,
    /// Bounded listener with the given count
    Count(u32),
}

impl Executions {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Executions::Unbounded)
    }
}

impl fmt::Display for Executions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Executions::Unbounded => f.write_str("inf"),
            Executions::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Musical position snapshot passed to listeners
///
/// Built fresh for every dispatch and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicalPosition {
    /// Measure number (1-based)
    pub measure: u64,
    /// Beat within measure (1-based, <= beats_per_measure)
    pub beat: u32,
    /// Position within the current beat-unit interval, in [0, 1)
    pub beat_fraction: f64,
    pub time_signature: TimeSignature,
    /// Executions left including this one
    pub remaining_executions: Executions,
    pub total_executions: Executions,
}

impl MusicalPosition {
    /// Position for a persistent listener
    pub fn new(measure: u64, beat: u32, beat_fraction: f64, time_signature: TimeSignature) -> Self {
        Self {
            measure,
            beat,
            beat_fraction,
            time_signature,
            remaining_executions: Executions::Unbounded,
            total_executions: Executions::Unbounded,
        }
    }

    /// Same position with a bounded execution budget attached
    pub fn with_executions(self, remaining: u32, total: u32) -> Self {
        Self {
            remaining_executions: Executions::Count(remaining),
            total_executions: Executions::Count(total),
            ..self
        }
    }

    /// Share of the execution budget already used before this dispatch
    /// Always 0 for unbounded listeners
    pub fn execution_progress(&self) -> f64 {
        match (self.remaining_executions, self.total_executions) {
            (Executions::Count(remaining), Executions::Count(total)) if total > 0 => {
                1.0 - remaining as f64 / total as f64
            }
            _ => 0.0,
        }
    }
}

impl fmt::Display for MusicalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02} +{:.3} ({})",
            self.measure, self.beat, self.beat_fraction, self.time_signature
        )
    }
}
