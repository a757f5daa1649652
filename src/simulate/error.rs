// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all simulation-engine errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulateError {
    #[error("No output writers were supplied; the simulated visibilities would go nowhere")]
    NoOutput,

    #[error(
        "Refusing to allocate visibility buffers of {num_channels} channels × {num_baselines} baselines × {num_timesteps} time samples"
    )]
    Alloc {
        num_channels: usize,
        num_baselines: usize,
        num_timesteps: usize,
    },

    #[error("The telescope has {num_stations} stations, but {got} station noise RMS values were supplied")]
    NoiseRmsMismatch { num_stations: usize, got: usize },

    #[error("Station {station} has noise RMS {rms}; RMS values must be finite and non-negative")]
    InvalidNoiseRms { station: usize, rms: f64 },

    #[error("A worker lane stopped without recording an error")]
    LaneStopped,

    #[error(transparent)]
    Device(#[from] crate::device::DeviceError),

    #[error(transparent)]
    Correlation(#[from] crate::model::ModelError),

    #[error(transparent)]
    VisWrite(#[from] crate::io::VisWriteError),
}
