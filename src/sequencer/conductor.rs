// Conductor - Turns a playback clock into beat, measure and subdivision events
// Owns one tracker + registry pair per note value and the beat/measure counters

use super::listener::{Listener, ListenerId};
use super::meter::TimeSignatureTracker;
use super::registry::{EventRegistry, ListenerEntry, ListenerKind};
use super::subdivision::SubdivisionTracker;
use super::timeline::{MusicalPosition, NoteValue, Tempo, TimeSignature};
use super::ConductorResult;
use crate::audio::timing::ClockSource;
use crate::config::ConductorConfig;
use std::sync::{Arc, Mutex};

/// Registration change requested while the conductor may be dispatching
enum PendingChange {
    Register { note: NoteValue, entry: ListenerEntry },
    Unregister { note: NoteValue, id: ListenerId },
}

type PendingQueue = Arc<Mutex<Vec<PendingChange>>>;

/// Deferred registration handle
///
/// Cloneable and `Send`, so listeners can capture it and (un)register
/// from inside a dispatch. Changes are applied by the conductor at the
/// start of the next tick and before each subdivision's dispatch:
/// changes to other subdivisions can take effect within the same tick,
/// changes to the dispatching subdivision apply from its next edge.
#[derive(Clone)]
pub struct Registrar {
    pending: PendingQueue,
}

impl Registrar {
    /// Queue a persistent or one-shot registration
    pub fn register(
        &self,
        note: NoteValue,
        listener: impl Listener + 'static,
        one_shot: bool,
    ) -> ListenerId {
        let kind = if one_shot {
            ListenerKind::OneShot
        } else {
            ListenerKind::Persistent
        };
        self.push_register(note, kind, Box::new(listener))
    }

    /// Queue a registration firing on the next `count` edges
    pub fn register_repeating(
        &self,
        note: NoteValue,
        listener: impl Listener + 'static,
        count: u32,
    ) -> ConductorResult<ListenerId> {
        let kind = ListenerKind::repeating(count).inspect_err(|e| {
            log::warn!("Rejected repeating registration on {}: {}", note, e);
        })?;
        Ok(self.push_register(note, kind, Box::new(listener)))
    }

    /// Queue removal of `id`; unknown ids are ignored when applied
    pub fn unregister(&self, note: NoteValue, id: ListenerId) {
        self.push(PendingChange::Unregister { note, id });
    }

    fn push_register(
        &self,
        note: NoteValue,
        kind: ListenerKind,
        listener: Box<dyn Listener>,
    ) -> ListenerId {
        let id = ListenerId::next();
        self.push(PendingChange::Register {
            note,
            entry: ListenerEntry::new(id, kind, listener),
        });
        id
    }

    fn push(&self, change: PendingChange) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(change);
        } else {
            log::error!("Registrar queue poisoned, change dropped");
        }
    }
}

/// Tracker and listeners for one note value
struct Slot {
    tracker: SubdivisionTracker,
    registry: EventRegistry,
}

/// Musical-time scheduler
///
/// Driven externally: call [`Conductor::tick`] once per frame/audio block.
/// Every subdivision whose interval index changed since the previous tick
/// dispatches to its listeners with a snapshot of the current position.
/// Subdivisions are processed finest first (thirty-second → whole), and all
/// subdivisions firing in one tick share the same snapshot.
pub struct Conductor {
    clock: Box<dyn ClockSource>,
    offset_seconds: f64,
    tempo: Tempo,
    meter: TimeSignatureTracker,
    slots: [Slot; NoteValue::COUNT],
    pending: PendingQueue,
    /// Musical time seen by the latest tick (None before the first tick)
    current_time: Option<f64>,
    beat_fraction: f64,
}

impl Conductor {
    /// Create a conductor at `bpm` reading time from `clock`
    pub fn new(
        bpm: f64,
        time_signature: TimeSignature,
        clock: impl ClockSource + 'static,
    ) -> ConductorResult<Self> {
        let tempo = Tempo::new(bpm)?;
        time_signature.validate()?;

        let slots = NoteValue::ALL.map(|note| Slot {
            tracker: SubdivisionTracker::new(note, &tempo),
            registry: EventRegistry::new(),
        });

        log::debug!("Conductor created at {} in {}", tempo, time_signature);

        Ok(Self {
            clock: Box::new(clock),
            offset_seconds: 0.0,
            tempo,
            meter: TimeSignatureTracker::new(time_signature),
            slots,
            pending: Arc::new(Mutex::new(Vec::new())),
            current_time: None,
            beat_fraction: 0.0,
        })
    }

    /// Create a conductor from a validated configuration
    pub fn from_config(
        config: &ConductorConfig,
        clock: impl ClockSource + 'static,
    ) -> ConductorResult<Self> {
        let mut conductor = Self::new(config.bpm, config.time_signature, clock)?;
        conductor.set_offset(config.offset_seconds);
        Ok(conductor)
    }

    // ---- Registration ----

    /// Register a listener on `note`
    /// One-shot listeners fire on the next edge only.
    pub fn register(
        &mut self,
        note: NoteValue,
        listener: impl Listener + 'static,
        one_shot: bool,
    ) -> ListenerId {
        let registry = self.registry_mut(note);
        if one_shot {
            registry.register_one_shot(Box::new(listener))
        } else {
            registry.register_persistent(Box::new(listener))
        }
    }

    /// Register a listener firing on the next `count` edges of `note`
    ///
    /// # Errors
    /// `InvalidRepeatCount` if `count` is 0; nothing is registered.
    pub fn register_repeating(
        &mut self,
        note: NoteValue,
        listener: impl Listener + 'static,
        count: u32,
    ) -> ConductorResult<ListenerId> {
        self.registry_mut(note)
            .register_repeating(Box::new(listener), count)
            .inspect_err(|e| log::warn!("Rejected repeating registration on {}: {}", note, e))
    }

    /// Remove a listener from `note`
    /// Unknown or completed ids are a no-op. Returns whether it was removed.
    pub fn unregister(&mut self, note: NoteValue, id: ListenerId) -> bool {
        self.registry_mut(note).unregister(id)
    }

    /// Handle for registering from inside listeners or other owners
    pub fn registrar(&self) -> Registrar {
        Registrar {
            pending: Arc::clone(&self.pending),
        }
    }

    /// Live registrations on `note`
    pub fn listener_count(&self, note: NoteValue) -> usize {
        self.slots[note.index()].registry.len()
    }

    pub fn is_registered(&self, note: NoteValue, id: ListenerId) -> bool {
        self.slots[note.index()].registry.contains(id)
    }

    fn registry_mut(&mut self, note: NoteValue) -> &mut EventRegistry {
        &mut self.slots[note.index()].registry
    }

    // ---- Configuration ----

    /// Change tempo, recomputing every interval length
    ///
    /// Edge state is not reset, so one edge may be skipped or doubled
    /// right after the change.
    pub fn set_tempo(&mut self, bpm: f64) -> ConductorResult<()> {
        self.tempo = Tempo::new(bpm)?;
        for slot in self.slots.iter_mut() {
            slot.tracker.set_tempo(&self.tempo);
        }
        log::debug!("Tempo set to {}", self.tempo);
        Ok(())
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Replace the time signature without resetting the counters
    pub fn set_time_signature(&mut self, time_signature: TimeSignature) -> ConductorResult<()> {
        time_signature.validate()?;
        self.meter.set_time_signature(time_signature);
        log::debug!("Time signature set to {}", time_signature);
        Ok(())
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.meter.time_signature()
    }

    /// Calibration constant added to the clock reading
    pub fn set_offset(&mut self, offset_seconds: f64) {
        self.offset_seconds = offset_seconds;
    }

    pub fn offset(&self) -> f64 {
        self.offset_seconds
    }

    // ---- Queries ----

    /// Measure counted for the next beat edge (1-based)
    pub fn measure(&self) -> u64 {
        self.meter.measure()
    }

    /// Beat counted for the next beat edge (1-based)
    pub fn beat(&self) -> u32 {
        self.meter.beat()
    }

    /// Fraction within the current beat-unit interval, refreshed every tick
    pub fn current_beat_fraction(&self) -> f64 {
        self.beat_fraction
    }

    /// Fraction within the current interval of `note` at the latest tick
    /// Not edge-gated: suitable for continuous animation.
    pub fn beat_fraction(&self, note: NoteValue) -> f64 {
        let time = self.current_time.unwrap_or(0.0);
        self.slots[note.index()].tracker.fraction_at(time)
    }

    /// Interval length of `note` in seconds at the current tempo
    pub fn interval_length(&self, note: NoteValue) -> f64 {
        self.slots[note.index()].tracker.interval_length()
    }

    /// Musical time of the latest tick, offset included
    pub fn current_time(&self) -> Option<f64> {
        self.current_time
    }

    // ---- Tick ----

    /// Poll the clock and process one tick
    /// Returns the number of subdivisions that hit an edge.
    pub fn tick(&mut self) -> usize {
        let time = self.clock.current_time_seconds() + self.offset_seconds;
        self.update(time)
    }

    /// Process one tick at an explicit musical time (offset not applied)
    /// Non-finite times are ignored: no edges, state untouched.
    pub fn update(&mut self, time_seconds: f64) -> usize {
        self.apply_pending();

        if !time_seconds.is_finite() {
            log::warn!("Ignoring non-finite clock reading {}", time_seconds);
            return 0;
        }

        if let Some(previous) = self.current_time {
            if time_seconds < previous {
                log::debug!(
                    "Clock moved back from {:.4}s to {:.4}s, resetting edge detection",
                    previous,
                    time_seconds
                );
                for slot in self.slots.iter_mut() {
                    slot.tracker.reset();
                }
            }
        }
        self.current_time = Some(time_seconds);

        let time_signature = self.meter.time_signature();
        let beat_unit = time_signature.beat_unit;
        self.beat_fraction = self.slots[beat_unit.index()]
            .tracker
            .fraction_at(time_seconds);

        // Detection phase: trackers are independent, dispatch waits for all of them
        let mut triggered = [false; NoteValue::COUNT];
        for (slot, hit) in self.slots.iter_mut().zip(triggered.iter_mut()) {
            *hit = slot.tracker.update(time_seconds);
        }

        let snapshot = MusicalPosition::new(
            self.meter.measure(),
            self.meter.beat(),
            self.beat_fraction,
            time_signature,
        );

        let mut edges = 0;
        for note in NoteValue::ALL.iter().rev() {
            if !triggered[note.index()] {
                continue;
            }
            edges += 1;

            self.apply_pending();
            let fired = self.slots[note.index()].registry.dispatch(&snapshot);
            log::trace!("{} edge at {:.4}s ({}), {} listeners", note, time_seconds, snapshot, fired);

            if *note == beat_unit {
                self.meter.on_beat_edge();
            }
        }

        self.apply_pending();
        edges
    }

    /// Drain the registrar queue into the registries
    fn apply_pending(&mut self) {
        let changes = match self.pending.lock() {
            Ok(mut pending) if !pending.is_empty() => std::mem::take(&mut *pending),
            Ok(_) => return,
            Err(_) => {
                log::error!("Registrar queue poisoned, pending changes skipped");
                return;
            }
        };

        for change in changes {
            match change {
                PendingChange::Register { note, entry } => {
                    let id = entry.id();
                    let kind = entry.kind();
                    self.registry_mut(note).insert_entry(entry);
                    log::trace!("Applied deferred {:?} registration {} on {}", kind, id, note);
                }
                PendingChange::Unregister { note, id } => {
                    self.registry_mut(note).unregister(id);
                }
            }
        }
    }
}
