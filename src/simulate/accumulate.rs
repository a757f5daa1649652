// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-lane visibility buffers and the accumulation/fold steps.

use marlu::Jones;
use ndarray::{Array2, ArrayViewMut2};

/// The two visibility buffers owned by one worker lane.
///
/// `amp` holds only the most recent chunk's partial result; `acc` holds the
/// running sum over all chunks this lane has processed for the *current
/// channel*. Nothing else ever writes to these buffers, so no locking is
/// needed: the scheduler hands each lane's buffers to exactly one worker.
pub(crate) struct LaneBuffers {
    pub(crate) lane: usize,

    /// The latest chunk's contribution, `[baseline][time sample]`.
    pub(crate) amp: Array2<Jones<f32>>,

    /// The lane's running sum for the current channel, `[baseline][time
    /// sample]`. Must be cleared before the next channel's dispatch begins.
    pub(crate) acc: Array2<Jones<f32>>,
}

impl LaneBuffers {
    pub(crate) fn new(lane: usize, num_baselines: usize, num_timesteps: usize) -> LaneBuffers {
        LaneBuffers {
            lane,
            amp: Array2::default((num_baselines, num_timesteps)),
            acc: Array2::default((num_baselines, num_timesteps)),
        }
    }

    /// Zero the amplitude buffer ahead of the next chunk. The correlation
    /// primitive adds rather than overwrites, so this must happen once per
    /// chunk.
    pub(crate) fn clear_amp(&mut self) {
        self.amp.fill(Jones::default());
    }

    /// Add the latest chunk's amplitudes into this lane's accumulator.
    /// Element-wise complex addition: associative and commutative, so the
    /// order chunks land on this lane doesn't affect the channel total.
    pub(crate) fn accumulate(&mut self) {
        self.acc += &self.amp;
    }
}

/// Sum every lane's accumulator into a channel's slab of the global dataset,
/// then clear the accumulators for the next channel.
///
/// Lanes are always summed in lane-index order, not completion order, so that
/// repeated runs produce bit-identical floating-point results.
pub(crate) fn fold_into_global(mut slab: ArrayViewMut2<Jones<f32>>, lanes: &mut [LaneBuffers]) {
    for buffers in lanes.iter_mut() {
        slab += &buffers.acc;
        buffers.acc.fill(Jones::default());
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use marlu::c32;
    use ndarray::Array2;

    use super::*;

    fn jones(re: f32) -> Jones<f32> {
        Jones::from([
            c32::new(re, 0.0),
            c32::default(),
            c32::default(),
            c32::new(re, 0.0),
        ])
    }

    #[test]
    fn accumulate_sums_chunks() {
        let mut buffers = LaneBuffers::new(0, 2, 3);
        buffers.amp.fill(jones(1.0));
        buffers.accumulate();
        buffers.amp.fill(jones(2.5));
        buffers.accumulate();

        for j in buffers.acc.iter() {
            assert_abs_diff_eq!(j[0].re, 3.5);
        }
        // The amplitude buffer still holds only the most recent chunk.
        for j in buffers.amp.iter() {
            assert_abs_diff_eq!(j[0].re, 2.5);
        }
    }

    #[test]
    fn fold_sums_lanes_and_resets_accumulators() {
        let mut lanes = vec![LaneBuffers::new(0, 2, 2), LaneBuffers::new(1, 2, 2)];
        lanes[0].acc.fill(jones(1.0));
        lanes[1].acc.fill(jones(2.0));

        let mut slab: Array2<Jones<f32>> = Array2::default((2, 2));
        fold_into_global(slab.view_mut(), &mut lanes);

        for j in slab.iter() {
            assert_abs_diff_eq!(j[0].re, 3.0);
        }
        // Every lane accumulator must be exactly zero before the next
        // channel starts.
        for buffers in &lanes {
            for j in buffers.acc.iter() {
                assert_eq!(*j, Jones::default());
            }
        }
    }

    #[test]
    fn fold_adds_into_existing_slab_contents() {
        let mut lanes = vec![LaneBuffers::new(0, 1, 1)];
        lanes[0].acc.fill(jones(1.0));

        let mut slab: Array2<Jones<f32>> = Array2::from_elem((1, 1), jones(10.0));
        fold_into_global(slab.view_mut(), &mut lanes);
        assert_abs_diff_eq!(slab[(0, 0)][0].re, 11.0);
    }
}
