// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Flux-density structures.

use log::trace;
use marlu::{c64, Jones};
use vec1::Vec1;

use crate::constants::DEFAULT_SPEC_INDEX;

/// At a frequency, four flux densities for each Stokes parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FluxDensity {
    /// The frequency that these flux densities apply to \[Hz\]
    pub freq: f64,

    /// The flux density of Stokes I \[Jy\]
    pub i: f64,

    /// The flux density of Stokes Q \[Jy\]
    pub q: f64,

    /// The flux density of Stokes U \[Jy\]
    pub u: f64,

    /// The flux density of Stokes V \[Jy\]
    pub v: f64,
}

impl FluxDensity {
    /// Given two flux densities, calculate the spectral index that fits them.
    /// Uses only Stokes I.
    fn calc_spec_index(&self, fd2: &Self) -> f64 {
        (fd2.i / self.i).ln() / (fd2.freq / self.freq).ln()
    }

    /// Convert a `FluxDensity` into a [`Jones`] matrix representing
    /// instrumental Stokes (i.e. XX, XY, YX, YY), with X east-west and Y
    /// north-south.
    pub(crate) fn to_inst_stokes(self) -> Jones<f64> {
        Jones::from([
            c64::new(self.i - self.q, 0.0),
            c64::new(self.u, -self.v),
            c64::new(self.u, self.v),
            c64::new(self.i + self.q, 0.0),
        ])
    }
}

impl std::ops::Mul<f64> for FluxDensity {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        FluxDensity {
            freq: self.freq,
            i: self.i * rhs,
            q: self.q * rhs,
            u: self.u * rhs,
            v: self.v * rhs,
        }
    }
}

/// How a component's flux density behaves over frequency.
#[derive(Debug, Clone, PartialEq)]
pub enum FluxDensityType {
    /// A list of flux densities specified at multiple frequencies.
    /// Interpolation/extrapolation is needed to get flux densities at
    /// non-specified frequencies. The list must be sorted by frequency.
    List(Vec1<FluxDensity>),

    /// $S_\nu = a \nu^{\alpha}$
    PowerLaw {
        /// Spectral index (alpha)
        si: f64,
        /// Flux density (a)
        fd: FluxDensity,
    },

    /// Similar to a power law. See Callingham et al. 2017, section 4.1.
    ///
    /// S_\nu = a \nu^{\alpha} e^{q(\ln{\nu})^2}
    CurvedPowerLaw {
        /// Spectral index (alpha)
        si: f64,
        /// Flux density (a)
        fd: FluxDensity,
        /// Spectral curvature (q)
        q: f64,
    },
}

impl FluxDensityType {
    /// Given flux density information, estimate the flux density at a
    /// particular frequency. For power laws / curved power laws, the "ratio"
    /// of the reference frequency and the specified frequency is used to scale
    /// the reference flux density.
    ///
    /// If the enum variant is [`FluxDensityType::List`], the entries must be
    /// sorted by frequency. The estimated spectral index is based off of the
    /// Stokes I component, so any other Stokes parameters may be poorly
    /// estimated.
    pub fn estimate_at_freq(&self, freq_hz: f64) -> FluxDensity {
        match self {
            FluxDensityType::PowerLaw { si, fd } => {
                let ratio = calc_flux_ratio(freq_hz, fd.freq, *si);
                let mut new_fd = *fd * ratio;
                new_fd.freq = freq_hz;
                new_fd
            }

            FluxDensityType::CurvedPowerLaw { si, fd, q } => {
                let mut power_law_component = *fd * calc_flux_ratio(freq_hz, fd.freq, *si);
                power_law_component.freq = freq_hz;
                let curved_component = (q * (freq_hz / fd.freq).ln().powi(2)).exp();
                power_law_component * curved_component
            }

            FluxDensityType::List(fds) => {
                let (spec_index, anchor_fd) = {
                    // If there's only one flux density, we must assume a
                    // spectral index for extrapolation.
                    if fds.len() == 1 {
                        trace!(
                            "Only one flux density in a component's list; extrapolating with spectral index {}",
                            DEFAULT_SPEC_INDEX
                        );
                        (DEFAULT_SPEC_INDEX, &fds[0])
                    } else {
                        // Find the two list entries bracketing the given
                        // frequency (or the closest pair if the frequency is
                        // outside the list).
                        let mut pair: (&FluxDensity, &FluxDensity) = (&fds[0], &fds[1]);
                        for window in fds.windows(2) {
                            pair = (&window[0], &window[1]);
                            if window[1].freq > freq_hz {
                                break;
                            }
                        }
                        (pair.0.calc_spec_index(pair.1), pair.0)
                    }
                };

                // Scale the anchor flux density by the calculated spectral
                // index.
                let flux_ratio = calc_flux_ratio(freq_hz, anchor_fd.freq, spec_index);
                FluxDensity {
                    freq: freq_hz,
                    ..*anchor_fd
                } * flux_ratio
            }
        }
    }
}

/// Given a spectral index, determine the flux-density ratio of two
/// frequencies.
pub(crate) fn calc_flux_ratio(desired_freq_hz: f64, cat_freq_hz: f64, spec_index: f64) -> f64 {
    (desired_freq_hz / cat_freq_hz).powf(spec_index)
}
