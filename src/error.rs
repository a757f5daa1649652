// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all skysim-related errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkysimError {
    #[error(transparent)]
    Device(#[from] crate::device::DeviceError),

    #[error(transparent)]
    Model(#[from] crate::model::ModelError),

    #[error(transparent)]
    Simulate(#[from] crate::simulate::SimulateError),

    #[error(transparent)]
    VisWrite(#[from] crate::io::VisWriteError),
}
