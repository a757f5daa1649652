// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::num::NonZeroUsize;

use criterion::*;
use hifitime::{Duration, Epoch};
use marlu::{
    constants::{MWA_LAT_RAD, MWA_LONG_RAD},
    Jones, RADec, XyzGeodetic,
};
use ndarray::Array2;
use vec1::{vec1, Vec1};

use skysim::{
    context::ObsContext,
    model::{CorrelatorCpu, SkyCorrelator},
    srclist::{
        ComponentType, FluxDensity, FluxDensityType, SkyChunk, Source, SourceComponent, SourceList,
    },
};

fn get_obs(num_stations: usize, num_timesteps: usize) -> ObsContext {
    let station_xyzs = (0..num_stations)
        .map(|i| XyzGeodetic {
            x: 10.0 * i as f64,
            y: 5.0 * i as f64,
            z: 0.0,
        })
        .collect();
    let first = Epoch::from_gpst_seconds(1090008640.0);
    let time_res = Duration::from_seconds(2.0);
    let timestamps = Vec1::try_from_vec(
        (0..num_timesteps)
            .map(|t| first + time_res * t as f64)
            .collect(),
    )
    .unwrap();
    ObsContext {
        station_xyzs,
        station_noise_rms: vec![1.0; num_stations],
        phase_centre: RADec::from_degrees(0.0, -27.0),
        array_longitude_rad: MWA_LONG_RAD,
        array_latitude_rad: MWA_LAT_RAD,
        timestamps,
        time_res,
        fine_chan_freqs: vec1![150e6],
        freq_res_hz: 40e3,
        dut1: Duration::default(),
        apply_precession: true,
    }
}

fn get_source_list(num_points: usize, num_gaussians: usize) -> SourceList {
    let fd = |i| FluxDensityType::PowerLaw {
        si: -0.8,
        fd: FluxDensity {
            freq: 150e6,
            i,
            ..Default::default()
        },
    };
    let mut sl = SourceList::new();
    for i in 0..num_points {
        sl.insert(
            format!("point{i}"),
            Source {
                components: vec![SourceComponent {
                    radec: RADec::from_degrees(0.1 * i as f64, -27.0 + 0.05 * i as f64),
                    comp_type: ComponentType::Point,
                    flux_type: fd(1.0),
                }],
            },
        );
    }
    for i in 0..num_gaussians {
        sl.insert(
            format!("gaussian{i}"),
            Source {
                components: vec![SourceComponent {
                    radec: RADec::from_degrees(0.1 * i as f64, -26.0 + 0.05 * i as f64),
                    comp_type: ComponentType::Gaussian {
                        maj: 1e-3,
                        min: 5e-4,
                        pa: 0.5,
                    },
                    flux_type: fd(2.0),
                }],
            },
        );
    }
    sl
}

fn correlate(c: &mut Criterion) {
    let num_stations = 128;
    let num_timesteps = 4;
    let obs = get_obs(num_stations, num_timesteps);
    let num_baselines = obs.num_cross_baselines();
    let correlator = CorrelatorCpu::new(&obs);

    for (name, sl) in [
        ("correlate 256 points", get_source_list(256, 0)),
        ("correlate 256 gaussians", get_source_list(0, 256)),
    ] {
        let chunks = SkyChunk::partition(&sl, obs.phase_centre, NonZeroUsize::new(256).unwrap());
        let chunk = &chunks[0];
        c.bench_function(name, |b| {
            let mut vis: Array2<Jones<f32>> = Array2::default((num_baselines, num_timesteps));
            b.iter(|| {
                correlator
                    .correlate(chunk, 150e6, vis.view_mut())
                    .unwrap();
            });
        });
    }
}

criterion_group!(benches, correlate);
criterion_main!(benches);
