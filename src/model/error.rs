// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all correlation-primitive errors.

use std::borrow::Cow;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Correlation failed on chunk {chunk}: {message}")]
    Correlation {
        chunk: usize,
        message: Cow<'static, str>,
    },

    #[error(
        "The visibility buffer has shape {got:?}, but this observation needs {expected:?} (baselines × time samples)"
    )]
    BufferShape {
        got: (usize, usize),
        expected: (usize, usize),
    },

    #[error(transparent)]
    Device(#[from] crate::device::DeviceError),
}
