// src/session/state.rs
// =============================================================================
// Everything a session knows, in one place: the targets, the response log,
// and the generation number of the most recent check.
//
// The controller owns the only AppState, so there is exactly one writer.
// =============================================================================

use super::log::ResponseLog;
use crate::checker::CheckError;
use crate::target::Target;

#[derive(Debug, Clone)]
pub struct AppState {
    targets: Vec<Target>,
    log: ResponseLog,
    // Bumped every time a check starts or is cancelled
    generation: u64,
}

impl AppState {
    pub fn new(targets: Vec<Target>) -> Self {
        AppState {
            targets,
            log: ResponseLog::new(),
            generation: 0,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Looks up a target by its 0-based index
    pub fn target(&self, index: usize) -> Result<&Target, CheckError> {
        self.targets.get(index).ok_or(CheckError::NoSuchTarget {
            index,
            len: self.targets.len(),
        })
    }

    // Only the name is editable; the list itself never grows or shrinks
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<(), CheckError> {
        let len = self.targets.len();
        let target = self
            .targets
            .get_mut(index)
            .ok_or(CheckError::NoSuchTarget { index, len })?;
        target.name = name.into();
        Ok(())
    }

    pub fn log(&self) -> &ResponseLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ResponseLog {
        &mut self.log
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new generation; everything tagged with an older one is stale.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
