// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The simulation engine: chunk scheduling across device-bound worker lanes,
//! per-channel accumulation, and the top-level orchestrator.
//!
//! Channels are strictly sequential; within a channel, chunks are dispatched
//! dynamically to whichever lane becomes free next, and the per-lane partial
//! sums are folded into the global dataset once all chunks have settled. A
//! failure on any chunk latches the shared [`RunStatus`]; in-flight work is
//! allowed to finish, the failing channel is never folded, and the run aborts
//! at the channel barrier.

mod accumulate;
mod error;
mod noise;
mod status;

pub use error::SimulateError;

use std::{mem::size_of, num::NonZeroUsize, thread, time::Instant};

use crossbeam_channel::unbounded;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use marlu::{Jones, UVW};
use ndarray::{Array2, Array3};
use scopeguard::defer_on_unwind;

use accumulate::LaneBuffers;
use status::RunStatus;

use crate::{
    context::ObsContext,
    device::{DeviceLane, DevicePool},
    io::VisWriter,
    math::BaselineMaps,
    model::{CorrelatorCpu, SkyCorrelator},
    srclist::{SkyChunk, SourceList},
    visibilities::VisData,
    PROGRESS_BARS,
};

/// Settings for deterministic system-noise injection.
#[derive(Debug, Clone, Copy)]
pub struct NoiseParams {
    pub seed: u64,
}

/// Parameters needed to simulate visibilities from a sky-model source list.
pub struct VisSimParams {
    /// Sky-model source list.
    pub source_list: SourceList,

    /// The telescope and observation being simulated.
    pub obs: ObsContext,

    /// How many worker lanes (each bound to one device) to use.
    pub num_devices: NonZeroUsize,

    /// Which physical devices to bind lanes to. `None` means devices
    /// 0..num_devices.
    pub device_ids: Option<Vec<i32>>,

    /// The maximum number of sky-model components per chunk. Smaller values
    /// trade parallel granularity for memory footprint.
    pub max_chunk_size: NonZeroUsize,

    /// Inject system noise? `None` leaves the visibilities noiseless.
    pub noise: Option<NoiseParams>,
}

impl VisSimParams {
    /// Run the full simulation and hand the finished dataset to each writer.
    ///
    /// Stages run in order: device acquisition, sky partitioning, the
    /// per-channel scheduler, noise injection, UVW computation, then the
    /// writers. The first error halts all remaining stages; acquired devices
    /// are released on every path, and no partially-summed dataset is ever
    /// handed out.
    pub fn run(&self, writers: &mut [Box<dyn VisWriter + '_>]) -> Result<VisData, SimulateError> {
        // Fail before any devices are touched if the results would go
        // nowhere.
        if writers.is_empty() {
            return Err(SimulateError::NoOutput);
        }

        info!("Acquiring {} device lane(s)", self.num_devices);
        let pool = DevicePool::acquire(self.num_devices, self.device_ids.as_deref())?;

        let chunks = SkyChunk::partition(
            &self.source_list,
            self.obs.phase_centre,
            self.max_chunk_size,
        );
        let correlator = CorrelatorCpu::new(&self.obs);

        info!("Starting simulation");
        let start = Instant::now();
        let vis = simulate_channels(&correlator, &self.obs, &pool, &chunks)?;
        info!(
            "Simulation completed in {:.3} s",
            start.elapsed().as_secs_f64()
        );

        let mut data = VisData {
            vis,
            uvws: evaluate_uvws(&self.obs),
        };

        if let Some(NoiseParams { seed }) = self.noise {
            info!("Adding system noise (seed {seed})");
            let maps = BaselineMaps::new(self.obs.num_stations());
            noise::add_system_noise(&mut data.vis, &self.obs, &maps, seed)?;
        }

        for writer in writers.iter_mut() {
            writer.write_vis(&data, &self.obs)?;
        }

        Ok(data)
    }
}

/// The channel scheduler: for every frequency channel, dispatch all sky
/// chunks across the pool's lanes, wait for them to settle, then fold the
/// per-lane sums into the returned dataset.
///
/// Chunks are claimed first-come-first-served from a shared queue, so a slow
/// device naturally takes fewer chunks. The scope join is the barrier between
/// dispatch and fold; the fold itself is single-threaded.
pub(crate) fn simulate_channels(
    correlator: &dyn SkyCorrelator,
    obs: &ObsContext,
    pool: &DevicePool,
    chunks: &[SkyChunk],
) -> Result<Array3<Jones<f32>>, SimulateError> {
    let num_channels = obs.num_channels();
    let num_baselines = obs.num_cross_baselines();
    let num_timesteps = obs.num_timesteps();

    // Refuse obviously-unallocatable buffer sizes up front rather than
    // aborting inside ndarray.
    num_channels
        .checked_mul(num_baselines)
        .and_then(|n| n.checked_mul(num_timesteps))
        .and_then(|n| n.checked_mul(size_of::<Jones<f32>>()))
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or(SimulateError::Alloc {
            num_channels,
            num_baselines,
            num_timesteps,
        })?;

    let mut vis: Array3<Jones<f32>> = Array3::default((num_channels, num_baselines, num_timesteps));
    let mut lanes: Vec<LaneBuffers> = pool
        .lanes()
        .iter()
        .map(|lane| LaneBuffers::new(lane.index(), num_baselines, num_timesteps))
        .collect();
    let status = RunStatus::new();

    let progress = ProgressBar::with_draw_target(
        Some(num_channels as u64),
        if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} channels ({elapsed_precise}<{eta_precise})")
            .unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message("Simulating");
    progress.tick();

    for (i_chan, (&freq, mut slab)) in obs
        .fine_chan_freqs
        .iter()
        .zip(vis.outer_iter_mut())
        .enumerate()
    {
        debug!(
            "Channel {:3}/{} [{:.4} MHz]",
            i_chan + 1,
            num_channels,
            freq / 1e6
        );

        // The work queue: one entry per chunk index, drained by the lanes.
        let (tx, rx) = unbounded();
        for i_chunk in 0..chunks.len() {
            tx.send(i_chunk).expect("receiver is alive");
        }
        drop(tx);

        thread::scope(|scope| {
            for (lane, buffers) in pool.lanes().iter().zip(lanes.iter_mut()) {
                let rx = rx.clone();
                let status = &status;
                thread::Builder::new()
                    .name(format!("lane-{}", lane.index()))
                    .spawn_scoped(scope, move || {
                        defer_on_unwind! { status.mark_aborted(); }
                        while let Ok(i_chunk) = rx.recv() {
                            // Once any lane has failed, remaining queue
                            // entries are drained without starting numeric
                            // work.
                            if status.is_aborted() {
                                continue;
                            }
                            if let Err(e) =
                                process_chunk(correlator, lane, buffers, &chunks[i_chunk], freq)
                            {
                                status.record(e);
                            }
                        }
                    })
                    .expect("OS can create threads");
            }
        });

        // The scope join above is the channel barrier: every dispatched chunk
        // has either completed or recorded its failure. Folding a channel
        // that contains a failed chunk would write a wrong partial sum into
        // the global dataset, so abort instead.
        status.check()?;

        accumulate::fold_into_global(slab.view_mut(), &mut lanes);
        progress.inc(1);
    }

    progress.abandon_with_message("Finished simulating");
    Ok(vis)
}

/// One dispatched task: everything a lane does with a single claimed chunk.
fn process_chunk(
    correlator: &dyn SkyCorrelator,
    lane: &DeviceLane,
    buffers: &mut LaneBuffers,
    chunk: &SkyChunk,
    freq_hz: f64,
) -> Result<(), SimulateError> {
    // The OS thread running this lane may have been running another lane's
    // task in other runtimes; the device context is lane-scoped state, so
    // re-assert it before touching the device.
    lane.bind()?;
    buffers.clear_amp();
    correlator.correlate(chunk, freq_hz, buffers.amp.view_mut())?;
    buffers.accumulate();
    debug!(
        "Lane {} finished chunk {} (components {:?})",
        buffers.lane, chunk.index, chunk.comp_range
    );
    Ok(())
}

/// The [`UVW`] coordinate of every baseline at every timestep \[metres\].
pub(crate) fn evaluate_uvws(obs: &ObsContext) -> Array2<UVW> {
    let mut uvws = Array2::default((obs.num_timesteps(), obs.num_cross_baselines()));
    for (&timestamp, mut row) in obs.timestamps.iter().zip(uvws.outer_iter_mut()) {
        for (slot, uvw) in row.iter_mut().zip(obs.cross_uvws(timestamp)) {
            *slot = uvw;
        }
    }
    uvws
}
