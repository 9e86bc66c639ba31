// Sequencer module
// Musical time, subdivision edge detection and listener dispatch

pub mod conductor;
pub mod judge;
pub mod listener;
pub mod meter;
pub mod registry;
pub mod subdivision;
pub mod timeline;

pub use conductor::{Conductor, Registrar};
pub use judge::{HitJudge, Judgement};
pub use listener::{Bare, Listener, ListenerId, bare};
pub use meter::TimeSignatureTracker;
pub use registry::{EventRegistry, ListenerKind};
pub use subdivision::SubdivisionTracker;
pub use timeline::{Executions, MusicalPosition, NoteValue, Tempo, TimeSignature};

use thiserror::Error;

/// Errors reported by the conductor API
///
/// All of them are configuration errors raised at the call site;
/// tick processing itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConductorError {
    #[error("Invalid tempo: {0} BPM (must be finite and > 0)")]
    InvalidTempo(f64),

    #[error("Invalid repeat count: {0} (must be > 0)")]
    InvalidRepeatCount(u32),

    #[error("Invalid time signature: {0}")]
    InvalidTimeSignature(String),

    #[error("Invalid sample rate: {0} Hz (must be finite and > 0)")]
    InvalidSampleRate(f64),

    #[error("A conductor is already installed in this session")]
    DuplicateConductor,
}

pub type ConductorResult<T> = Result<T, ConductorError>;
