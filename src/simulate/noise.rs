// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Uncorrelated system-noise injection.

use marlu::{c32, Jones};
use ndarray::Array3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::Normal;

use super::SimulateError;
use crate::{context::ObsContext, math::BaselineMaps};

/// Add uncorrelated Gaussian noise to every visibility, drawn from the
/// per-station noise RMS values in the observation context.
///
/// A baseline between stations p and q gets noise with RMS sqrt(σ_p σ_q).
/// Values are drawn in a fixed order (channel, then baseline, then time
/// sample, then Jones element, real before imaginary), so a given seed always
/// produces bit-identical noise.
pub(crate) fn add_system_noise(
    vis: &mut Array3<Jones<f32>>,
    obs: &ObsContext,
    maps: &BaselineMaps,
    seed: u64,
) -> Result<(), SimulateError> {
    let rms = &obs.station_noise_rms;
    if rms.len() != obs.num_stations() {
        return Err(SimulateError::NoiseRmsMismatch {
            num_stations: obs.num_stations(),
            got: rms.len(),
        });
    }
    if let Some((station, &bad)) = rms
        .iter()
        .enumerate()
        .find(|(_, rms)| !rms.is_finite() || **rms < 0.0)
    {
        return Err(SimulateError::InvalidNoiseRms { station, rms: bad });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for mut vis_bt in vis.outer_iter_mut() {
        for (mut vis_t, &(station1, station2)) in vis_bt
            .outer_iter_mut()
            .zip(maps.baseline_to_station_pair.iter())
        {
            let sigma = (rms[station1] * rms[station2]).sqrt();
            let normal = Normal::new(0.0, sigma).map_err(|_| SimulateError::InvalidNoiseRms {
                station: station1,
                rms: sigma,
            })?;
            for vis in vis_t.iter_mut() {
                let mut draw = || {
                    let re: f64 = rng.sample(normal);
                    let im: f64 = rng.sample(normal);
                    c32::new(re as f32, im as f32)
                };
                *vis += Jones::from([draw(), draw(), draw(), draw()]);
            }
        }
    }

    Ok(())
}
