// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The seam between the simulation engine and external visibility writers.
//!
//! No file format is mandated here; uvfits/measurement-set/plain-text writers
//! all live outside this crate and implement [`VisWriter`].

use std::borrow::Cow;

use thiserror::Error;

use crate::{context::ObsContext, visibilities::VisData};

/// Something that can consume a finished visibility dataset.
pub trait VisWriter {
    /// Write out a complete, final dataset. This is only called once per run,
    /// after all channels have been folded and post-processing is done.
    fn write_vis(&mut self, vis: &VisData, obs: &ObsContext) -> Result<(), VisWriteError>;
}

#[derive(Error, Debug)]
pub enum VisWriteError {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("{0}")]
    Sink(Cow<'static, str>),
}
