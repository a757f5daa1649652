// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Simulate the visibilities that a radio interferometer would measure from a
sky-model source list.

The interesting part of this crate is the simulation engine in [`simulate`]:
the sky model is partitioned into bounded-memory chunks, chunks are dispatched
dynamically across a fixed pool of device-bound worker lanes, per-lane partial
sums are folded into a global visibility dataset one frequency channel at a
time, and any failure is latched into a shared run status without corrupting
buffers that other lanes are still writing.

Settings parsing, sky-model file formats and visibility file formats are
deliberately not handled here; supply an in-memory [`srclist::SourceList`] and
[`context::ObsContext`], and receive a [`visibilities::VisData`].
 */

pub mod constants;
pub mod context;
pub mod device;
mod error;
pub mod io;
pub(crate) mod math;
pub mod model;
pub mod simulate;
pub mod srclist;
pub mod visibilities;

pub use error::SkysimError;

use crossbeam_utils::atomic::AtomicCell;

/// Should progress bars be drawn? This defaults to false, and should be set by
/// the calling application before any simulation starts.
pub static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
