// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The global visibility dataset produced by a simulation run.

use marlu::{Jones, UVW};
use ndarray::{Array2, Array3};

/// Simulated visibilities for a whole run, plus the baseline [`UVW`]
/// coordinates.
///
/// This is only ever handed out complete: the engine never exposes a
/// partially-summed `VisData`.
pub struct VisData {
    /// Visibility amplitudes, with dimensions `[channel][baseline][time
    /// sample]`.
    pub vis: Array3<Jones<f32>>,

    /// The [`UVW`] coordinate of each baseline at each timestep \[metres\],
    /// with dimensions `[time sample][baseline]`.
    pub uvws: Array2<UVW>,
}

impl VisData {
    pub fn num_channels(&self) -> usize {
        self.vis.len_of(ndarray::Axis(0))
    }

    pub fn num_baselines(&self) -> usize {
        self.vis.len_of(ndarray::Axis(1))
    }

    pub fn num_timesteps(&self) -> usize {
        self.vis.len_of(ndarray::Axis(2))
    }
}
