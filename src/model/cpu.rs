// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! CPU implementation of the correlation primitive.

use std::f64::consts::{FRAC_PI_2, LN_2};

use itertools::izip;
use marlu::{Jones, LmnRime, UVW};
use ndarray::{parallel::prelude::*, prelude::*};
use rayon::prelude::*;

use super::{ModelError, SkyCorrelator};
use crate::{
    constants::VEL_C,
    context::ObsContext,
    math::{cexp, num_cross_baselines, sinc},
    srclist::{ComponentType, SkyChunk},
};

const GAUSSIAN_EXP_CONST: f64 = -(FRAC_PI_2 * FRAC_PI_2) / LN_2;

/// Computes chunk visibilities on the CPU, in double precision.
///
/// The baseline [`UVW`]s for every timestep are computed once at construction
/// (they don't depend on frequency or chunk), so `correlate` only does the
/// per-source fringe sums.
pub struct CorrelatorCpu<'a> {
    obs: &'a ObsContext,

    /// The [`UVW`] coordinate of each cross-correlation baseline at each
    /// timestep \[metres\]. The outer index is the timestep.
    timestep_uvws: Vec<Vec<UVW>>,

    num_baselines: usize,
}

impl<'a> CorrelatorCpu<'a> {
    pub fn new(obs: &'a ObsContext) -> CorrelatorCpu<'a> {
        let timestep_uvws = obs
            .timestamps
            .as_slice()
            .par_iter()
            .map(|&timestamp| obs.cross_uvws(timestamp))
            .collect();

        CorrelatorCpu {
            obs,
            timestep_uvws,
            num_baselines: num_cross_baselines(obs.num_stations()),
        }
    }
}

impl SkyCorrelator for CorrelatorCpu<'_> {
    fn correlate(
        &self,
        chunk: &SkyChunk,
        freq_hz: f64,
        mut vis_tb: ArrayViewMut2<Jones<f32>>,
    ) -> Result<(), ModelError> {
        let expected = (self.num_baselines, self.obs.num_timesteps());
        if vis_tb.dim() != expected {
            return Err(ModelError::BufferShape {
                got: vis_tb.dim(),
                expected,
            });
        }
        if chunk.num_components() == 0 {
            return Ok(());
        }

        // Per-component flux densities at this frequency, as instrumental
        // Stokes. These don't depend on the baseline or timestep.
        let fds: Vec<Jones<f64>> = chunk
            .flux_types
            .iter()
            .map(|flux_type| flux_type.estimate_at_freq(freq_hz).to_inst_stokes())
            .collect();

        let frac_bandwidth = self.obs.freq_res_hz / freq_hz;

        // Iterate over the baseline axis.
        vis_tb
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i_baseline, mut vis_t)| {
                // Timestep axis.
                vis_t.iter_mut().enumerate().for_each(|(i_time, vis)| {
                    // Divide UVW by lambda to make UVW dimensionless.
                    let UVW { u, v, w } =
                        self.timestep_uvws[i_time][i_baseline] * (freq_hz / VEL_C);

                    // Accumulate the double-precision visibilities into a
                    // double-precision Jones matrix before putting that into
                    // `vis_tb`.
                    let mut jones_accum: Jones<f64> = Jones::default();

                    izip!(fds.iter(), chunk.lmns.iter(), chunk.comp_types.iter()).for_each(
                        |(fd, &LmnRime { l, m, n }, comp_type)| {
                            let envelope = match comp_type {
                                ComponentType::Point => 1.0,
                                ComponentType::Gaussian { maj, min, pa } => {
                                    let (s_pa, c_pa) = pa.sin_cos();
                                    // Temporary variables for clarity.
                                    let k_x = u * s_pa + v * c_pa;
                                    let k_y = u * c_pa - v * s_pa;
                                    (GAUSSIAN_EXP_CONST
                                        * (maj.powi(2) * k_x.powi(2) + min.powi(2) * k_y.powi(2)))
                                    .exp()
                                }
                            };
                            // Bandwidth-smearing attenuation. The lmns are
                            // pre-multiplied by 2π, so the fringe argument is
                            // already in radians.
                            let smear = sinc(0.5 * frac_bandwidth * (u * l + v * m));

                            jones_accum += *fd * cexp(u * l + v * m + w * n) * (envelope * smear);
                        });
                    // Demote to single precision now that all operations are
                    // done.
                    *vis += Jones::from(jones_accum);
                });
            });

        Ok(())
    }
}
