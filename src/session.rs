// Session - Application-level owner of the conductor
// Holds at most one conductor; consumers borrow it from here instead of a global

use crate::sequencer::{Conductor, ConductorError, ConductorResult, Registrar};

/// Top-level owner of the session's conductor
#[derive(Default)]
pub struct Session {
    conductor: Option<Conductor>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the session's conductor
    ///
    /// The first conductor wins. A second one is dropped with a warning and
    /// the installed one is returned unchanged.
    pub fn install(&mut self, conductor: Conductor) -> &mut Conductor {
        if self.conductor.is_some() {
            log::warn!("{}; discarding the new instance", ConductorError::DuplicateConductor);
        } else {
            log::info!(
                "Conductor installed at {} in {}",
                conductor.tempo(),
                conductor.time_signature()
            );
        }
        self.conductor.get_or_insert(conductor)
    }

    /// Install, reporting a duplicate as an error instead of a warning
    pub fn try_install(&mut self, conductor: Conductor) -> ConductorResult<&mut Conductor> {
        if self.conductor.is_some() {
            return Err(ConductorError::DuplicateConductor);
        }
        Ok(self.install(conductor))
    }

    pub fn conductor(&self) -> Option<&Conductor> {
        self.conductor.as_ref()
    }

    pub fn conductor_mut(&mut self) -> Option<&mut Conductor> {
        self.conductor.as_mut()
    }

    /// Registration handle for consumers that do not own the conductor
    pub fn registrar(&self) -> Option<Registrar> {
        self.conductor.as_ref().map(Conductor::registrar)
    }

    /// Drive one tick if a conductor is installed
    pub fn tick(&mut self) -> usize {
        self.conductor.as_mut().map_or(0, Conductor::tick)
    }

    /// Tear down the conductor, returning it to the caller
    pub fn shutdown(&mut self) -> Option<Conductor> {
        let conductor = self.conductor.take();
        if conductor.is_some() {
            log::info!("Conductor removed from session");
        }
        conductor
    }
}
