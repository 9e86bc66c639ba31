// Conductor - Library exports for the binary, tests and benchmarks

pub mod audio;
pub mod config;
pub mod messaging;
pub mod sequencer;
pub mod session;

// Re-export commonly used types for convenience
pub use audio::timing::{ClockSource, ManualClock, SampleClock};
pub use config::{ConductorConfig, ConfigError};
pub use sequencer::{
    Conductor, ConductorError, ConductorResult, Executions, HitJudge, Judgement, Listener,
    ListenerId, MusicalPosition, NoteValue, Registrar, Tempo, TimeSignature, bare,
};
pub use session::Session;
