// Audio timing - Clock sources driving the conductor

use crate::sequencer::{ConductorError, ConductorResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Playback position provider
///
/// Must be monotonic non-decreasing while playing. A backward jump
/// (seek/loop) is treated by the conductor as a rewind.
pub trait ClockSource: Send {
    /// Current playback position in seconds
    fn current_time_seconds(&self) -> f64;
}

/// Sample-counting clock shared with an audio callback
///
/// The audio thread calls `advance` once per buffer, the conductor
/// thread reads the position. Clones share the same counter.
#[derive(Debug, Clone)]
pub struct SampleClock {
    /// Current sample position (incremented by audio callback)
    sample_position: Arc<AtomicU64>,
    sample_rate: f64,
}

impl SampleClock {
    pub fn new(sample_rate: f64) -> ConductorResult<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConductorError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_position: Arc::new(AtomicU64::new(0)),
            sample_rate,
        })
    }

    /// Get current sample position
    pub fn current_sample(&self) -> u64 {
        self.sample_position.load(Ordering::Relaxed)
    }

    /// Advance sample position (called from audio callback)
    pub fn advance(&self, frames: usize) {
        self.sample_position
            .fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Jump to an absolute sample position (seek/loop)
    pub fn set_position(&self, samples: u64) {
        self.sample_position.store(samples, Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Convert a sample count to seconds at this clock's rate
    pub fn samples_to_seconds(&self, samples: u64) -> f64 {
        samples as f64 / self.sample_rate
    }
}

impl ClockSource for SampleClock {
    fn current_time_seconds(&self) -> f64 {
        self.samples_to_seconds(self.current_sample())
    }
}

/// Clock set by hand, for simulations and tests
///
/// Clones share the same time value, stored as f64 bits.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time_bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.time_bits.store(seconds.to_bits(), Ordering::Relaxed);
    }

    pub fn advance(&self, seconds: f64) {
        self.set(self.current_time_seconds() + seconds);
    }
}

impl ClockSource for ManualClock {
    fn current_time_seconds(&self) -> f64 {
        f64::from_bits(self.time_bits.load(Ordering::Relaxed))
    }
}
