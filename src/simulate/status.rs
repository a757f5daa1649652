// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The shared run status: an abort flag plus a first-error latch.

use std::sync::Mutex;

use crossbeam_utils::atomic::AtomicCell;

use super::SimulateError;

/// Shared by every worker lane for the duration of a run.
///
/// The flag is checked before any chunk starts numeric work; once it is set,
/// lanes drain their remaining queue entries without touching their buffers,
/// and the scheduler refuses to fold the affected channel. In-flight work is
/// deliberately allowed to finish so that no buffer is torn down mid-write.
pub(crate) struct RunStatus {
    aborted: AtomicCell<bool>,
    first_error: Mutex<Option<SimulateError>>,
}

impl RunStatus {
    pub(crate) fn new() -> RunStatus {
        RunStatus {
            aborted: AtomicCell::new(false),
            first_error: Mutex::new(None),
        }
    }

    /// Latch an error. Only the first recorded error is kept; later ones are
    /// dropped, as they're usually knock-on effects of the first.
    pub(crate) fn record(&self, error: SimulateError) {
        let mut slot = self
            .first_error
            .lock()
            .expect("only poisoned if a lane panicked while recording");
        if slot.is_none() {
            *slot = Some(error);
        }
        drop(slot);
        self.aborted.store(true);
    }

    /// Set the abort flag without an error. Used when a lane unwinds; the
    /// panic itself propagates through the thread scope.
    pub(crate) fn mark_aborted(&self) {
        self.aborted.store(true);
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.aborted.load()
    }

    /// Called at a channel barrier, after all lanes have finished: surface
    /// the first recorded error, if there is one.
    pub(crate) fn check(&self) -> Result<(), SimulateError> {
        if !self.is_aborted() {
            return Ok(());
        }
        let mut slot = self
            .first_error
            .lock()
            .expect("only poisoned if a lane panicked while recording");
        match slot.take() {
            Some(error) => Err(error),
            None => Err(SimulateError::LaneStopped),
        }
    }
}
