// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The correlation primitive: given a sky chunk and a frequency, compute
//! partial visibilities for every baseline and time sample.

mod cpu;
mod error;

pub use cpu::CorrelatorCpu;
pub use error::ModelError;

use marlu::Jones;
use ndarray::ArrayViewMut2;

use crate::srclist::SkyChunk;

/// An object that computes one sky chunk's contribution to the visibilities
/// of a single frequency channel.
///
/// Implementations must be pure with respect to their inputs: the chunk and
/// any shared telescope state are only read, so `correlate` is safe to call
/// concurrently from independent lanes as long as each call gets a disjoint
/// output buffer.
pub trait SkyCorrelator: Sync {
    /// Compute the chunk's visibility contribution at `freq_hz` and *add* it
    /// into `vis_tb`; the buffer is not cleared first.
    ///
    /// `vis_tb`: A mutable view into an `ndarray` with dimensions
    /// `[n1][n2]`, where `n1` is the number of cross-correlation baselines
    /// and `n2` is the number of time samples.
    ///
    /// # Errors
    ///
    /// This function will return an error if the buffer dimensions don't
    /// match the telescope/observation being simulated, or if the underlying
    /// device reported a failure.
    fn correlate(
        &self,
        chunk: &SkyChunk,
        freq_hz: f64,
        vis_tb: ArrayViewMut2<Jones<f32>>,
    ) -> Result<(), ModelError>;
}
