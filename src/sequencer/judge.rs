// Hit judge - Scores player input against the beat grid

use std::fmt;

/// Accuracy grade of one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    Perfect,
    Great,
    Good,
    Miss,
}

impl fmt::Display for Judgement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Judgement::Perfect => "Perfect",
            Judgement::Great => "Great",
            Judgement::Good => "Good",
            Judgement::Miss => "Miss",
        };
        f.write_str(label)
    }
}

/// Timing windows expressed as fractions of one interval
///
/// A hit in the first half of the interval is late relative to the
/// beat that just passed; a hit in the second half is early for the
/// next one. Distance is measured to the nearest beat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitJudge {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
}

impl HitJudge {
    pub fn new(perfect: f64, great: f64, good: f64) -> Self {
        Self {
            perfect,
            great,
            good,
        }
    }

    /// Signed offset to the nearest beat, in fractions of an interval
    /// Negative = early, positive = late
    pub fn offset(&self, beat_fraction: f64) -> f64 {
        if beat_fraction < 0.5 {
            beat_fraction
        } else {
            beat_fraction - 1.0
        }
    }

    /// Grade a hit at `beat_fraction`
    pub fn judge(&self, beat_fraction: f64) -> Judgement {
        let distance = self.offset(beat_fraction).abs();
        if distance <= self.perfect {
            Judgement::Perfect
        } else if distance <= self.great {
            Judgement::Great
        } else if distance <= self.good {
            Judgement::Good
        } else {
            Judgement::Miss
        }
    }

    /// Signed offset to the nearest beat in seconds
    pub fn deviation_seconds(&self, beat_fraction: f64, interval_length: f64) -> f64 {
        self.offset(beat_fraction) * interval_length
    }
}

impl Default for HitJudge {
    fn default() -> Self {
        Self::new(0.05, 0.10, 0.15)
    }
}
