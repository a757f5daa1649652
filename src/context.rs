// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Metadata on the telescope and the observation being simulated.

use std::borrow::Cow;

use hifitime::{Duration, Epoch};
use log::debug;
use marlu::{
    pos::xyz::xyzs_to_cross_uvws,
    precession::{get_lmst, precess_time},
    RADec, XyzGeodetic, UVW,
};
use vec1::Vec1;

use crate::math::num_cross_baselines;

/// Everything the simulation engine needs to know about the telescope and the
/// observation, kept together so it can be shared read-only across all worker
/// lanes.
///
/// This struct is a substitute for instrument-specific metadata contexts; it
/// carries no information about file formats. All positions are geodetic
/// station positions relative to the array centre \[metres\].
pub struct ObsContext {
    /// The geodetic positions of all stations \[metres\].
    pub station_xyzs: Vec<XyzGeodetic>,

    /// The system-noise RMS of each station \[Jy\]. Must have the same length
    /// as `station_xyzs`; used only when noise injection is enabled.
    pub station_noise_rms: Vec<f64>,

    /// The phase centre of the observation.
    pub phase_centre: RADec,

    /// The longitude of the array \[radians\].
    pub array_longitude_rad: f64,

    /// The latitude of the array \[radians\].
    pub array_latitude_rad: f64,

    /// The timestamps to simulate. These are stored as `hifitime::Epoch`
    /// structs to help keep the code flexible.
    pub timestamps: Vec1<Epoch>,

    /// The time resolution of the simulated data.
    pub time_res: Duration,

    /// The frequencies of the channels to simulate \[Hz\].
    pub fine_chan_freqs: Vec1<f64>,

    /// The width of each simulated channel \[Hz\]. Used for bandwidth-smearing
    /// attenuation.
    pub freq_res_hz: f64,

    /// UT1 - UTC. If this is 0, effectively UT1 == UTC, which is a wrong
    /// assumption by up to 0.9s.
    pub dut1: Duration,

    /// Shift baselines and LSTs back to J2000?
    pub apply_precession: bool,
}

impl ObsContext {
    /// Evenly-spaced channel frequencies from a start frequency and increment
    /// \[Hz\].
    pub fn channel_freqs(
        num_channels: usize,
        start_freq_hz: f64,
        freq_inc_hz: f64,
    ) -> Option<Vec1<f64>> {
        Vec1::try_from_vec(
            (0..num_channels)
                .map(|c| start_freq_hz + c as f64 * freq_inc_hz)
                .collect(),
        )
        .ok()
    }

    pub fn num_stations(&self) -> usize {
        self.station_xyzs.len()
    }

    pub fn num_cross_baselines(&self) -> usize {
        num_cross_baselines(self.station_xyzs.len())
    }

    pub fn num_timesteps(&self) -> usize {
        self.timestamps.len()
    }

    pub fn num_channels(&self) -> usize {
        self.fine_chan_freqs.len()
    }

    /// For a timestamp, get the LST and station [`XyzGeodetic`] positions.
    /// These depend on whether we're precessing, so rather than copy+pasting
    /// this code around the place, put it in one spot.
    pub(crate) fn get_lst_and_xyzs(&self, timestamp: Epoch) -> (f64, Cow<'_, [XyzGeodetic]>) {
        if self.apply_precession {
            let precession_info = precess_time(
                self.array_longitude_rad,
                self.array_latitude_rad,
                self.phase_centre,
                timestamp,
                self.dut1,
            );
            // Apply precession to the station XYZ positions.
            let precessed_xyzs = precession_info.precess_xyz(&self.station_xyzs);
            debug!(
                "Simulating GPS timestamp {}, LMST {}°, J2000 LMST {}°",
                timestamp.to_gpst_seconds(),
                precession_info.lmst.to_degrees(),
                precession_info.lmst_j2000.to_degrees()
            );
            (precession_info.lmst_j2000, Cow::from(precessed_xyzs))
        } else {
            let lst = get_lmst(self.array_longitude_rad, timestamp, self.dut1);
            debug!(
                "Simulating GPS timestamp {}, LMST {}°",
                timestamp.to_gpst_seconds(),
                lst.to_degrees()
            );
            (lst, Cow::from(self.station_xyzs.as_slice()))
        }
    }

    /// The [`UVW`] coordinate of every cross-correlation baseline at a
    /// timestamp \[metres\]. The baseline order matches the visibility
    /// baseline axis.
    pub(crate) fn cross_uvws(&self, timestamp: Epoch) -> Vec<UVW> {
        let (lst, xyzs) = self.get_lst_and_xyzs(timestamp);
        xyzs_to_cross_uvws(&xyzs, self.phase_centre.to_hadec(lst))
    }
}
