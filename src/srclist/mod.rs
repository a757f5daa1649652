// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types for sky-model sources and source lists, and the partitioning of a
//! source list into bounded-memory chunks.

mod chunk;
mod flux_density;
mod source;

pub use chunk::SkyChunk;
pub use flux_density::{FluxDensity, FluxDensityType};
pub use source::{ComponentType, Source, SourceComponent, SourceList};
