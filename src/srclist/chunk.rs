// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Partitioning of a source list into bounded-memory chunks.

use std::num::NonZeroUsize;
use std::ops::Range;

use log::debug;
use marlu::{LmnRime, RADec};

use super::{ComponentType, FluxDensityType, SourceList};

/// A bounded, immutable partition of a source list, ready for correlation.
///
/// Components are stored as per-field arrays so the correlation primitive can
/// iterate them without chasing references. The direction cosines are
/// pre-computed against the observation phase centre at partition time;
/// nothing in a chunk changes after construction.
pub struct SkyChunk {
    /// Which chunk this is, out of however many the partition produced.
    pub index: usize,

    /// The range of flattened component indices this chunk covers. Chunk `i`
    /// always covers the same range for the same source list and chunk size,
    /// so runs are reproducible.
    pub comp_range: Range<usize>,

    pub(crate) radecs: Vec<RADec>,
    /// Direction cosines w.r.t. the phase centre, pre-multiplied for the
    /// measurement equation (2π l, 2π m, 2π (n - 1)).
    pub(crate) lmns: Vec<LmnRime>,
    pub(crate) flux_types: Vec<FluxDensityType>,
    pub(crate) comp_types: Vec<ComponentType>,
}

impl SkyChunk {
    /// Deterministically partition a source list into chunks of at most
    /// `max_chunk_size` components.
    ///
    /// Components are flattened in source-list order and cut contiguously, so
    /// the number of chunks and each chunk's contents depend only on the
    /// source list and the chunk size. An empty source list yields no chunks.
    pub fn partition(
        source_list: &SourceList,
        phase_centre: RADec,
        max_chunk_size: NonZeroUsize,
    ) -> Vec<SkyChunk> {
        let num_components = source_list.num_components();
        let max_chunk_size = max_chunk_size.get();
        let num_chunks = num_components.div_ceil(max_chunk_size);

        let mut chunks = Vec::with_capacity(num_chunks);
        let mut components = source_list
            .values()
            .flat_map(|src| src.components.iter())
            .enumerate()
            .peekable();

        for index in 0..num_chunks {
            let start = index * max_chunk_size;
            let end = ((index + 1) * max_chunk_size).min(num_components);
            let size = end - start;

            let mut radecs = Vec::with_capacity(size);
            let mut lmns = Vec::with_capacity(size);
            let mut flux_types = Vec::with_capacity(size);
            let mut comp_types = Vec::with_capacity(size);
            while components.peek().is_some_and(|(i, _)| *i < end) {
                let (_, comp) = components.next().expect("peeked");
                radecs.push(comp.radec);
                lmns.push(comp.radec.to_lmn(phase_centre).prepare_for_rime());
                flux_types.push(comp.flux_type.clone());
                comp_types.push(comp.comp_type);
            }

            chunks.push(SkyChunk {
                index,
                comp_range: start..end,
                radecs,
                lmns,
                flux_types,
                comp_types,
            });
        }

        debug!(
            "Partitioned {} sky-model components into {} chunks (max {} components each)",
            num_components,
            chunks.len(),
            max_chunk_size
        );
        chunks
    }

    pub fn num_components(&self) -> usize {
        self.radecs.len()
    }
}
