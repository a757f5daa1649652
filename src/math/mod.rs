// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.

#[cfg(test)]
mod tests;

use marlu::c64;

/// Complex exponential.
///
/// This function doesn't actually use complex numbers; it just returns the
/// real and imag components from Euler's formula (i.e. e^{ix} = cos{x} + i
/// sin{x}).
///
/// # Examples
///
/// `assert_abs_diff_eq!(cexp(PI), c64::new(-1.0, 0.0));`
#[inline]
pub(crate) fn cexp(x: f64) -> c64 {
    let (im, re) = x.sin_cos();
    c64::new(re, im)
}

/// The unnormalised sinc function, sin(x)/x, with the limit value 1 at x = 0.
#[inline]
pub(crate) fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        x.sin() / x
    }
}

/// How many cross-correlation baselines does an array of `num_stations`
/// stations form?
#[inline]
pub(crate) fn num_cross_baselines(num_stations: usize) -> usize {
    num_stations * num_stations.saturating_sub(1) / 2
}

/// Mapping between cross-correlation baseline indices and station pairs.
///
/// Baseline 0 is always stations (0, 1), baseline 1 is (0, 2), etc.; the
/// ordering is fixed by the station order so that the visibility baseline axis
/// means the same thing everywhere in this crate.
pub(crate) struct BaselineMaps {
    /// The station pair for each cross-correlation baseline index.
    pub(crate) baseline_to_station_pair: Vec<(usize, usize)>,
}

impl BaselineMaps {
    pub(crate) fn new(num_stations: usize) -> BaselineMaps {
        let mut baseline_to_station_pair = Vec::with_capacity(num_cross_baselines(num_stations));
        for station1 in 0..num_stations {
            for station2 in station1 + 1..num_stations {
                baseline_to_station_pair.push((station1, station2));
            }
        }

        BaselineMaps {
            baseline_to_station_pair,
        }
    }

    pub(crate) fn num_baselines(&self) -> usize {
        self.baseline_to_station_pair.len()
    }
}
