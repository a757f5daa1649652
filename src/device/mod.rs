// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Enumeration of compute devices and binding of worker lanes to them.
//!
//! Without the "cuda" or "hip" features, "devices" are host CPU threads:
//! enumeration reports the available parallelism and binding a lane is a
//! no-op. With a GPU feature, each lane owns one GPU context, and binding
//! switches the calling thread's active device.


use std::num::NonZeroUsize;

use log::debug;
use thiserror::Error;

#[cfg(feature = "cuda")]
use cuda_runtime_sys::{
    cudaDeviceSynchronize as gpuDeviceSynchronize, cudaError::cudaSuccess as gpuSuccess,
    cudaGetDeviceCount as gpuGetDeviceCount, cudaSetDevice as gpuSetDevice,
};
#[cfg(feature = "hip")]
use hip_sys::hiprt::{
    hipDeviceSynchronize as gpuDeviceSynchronize, hipError_t::hipSuccess as gpuSuccess,
    hipGetDeviceCount as gpuGetDeviceCount, hipSetDevice as gpuSetDevice,
};

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Requested {requested} devices, but only {available} are available")]
    DeviceUnavailable { requested: usize, available: usize },

    #[error("Requested {requested} devices, but the device-ID list only names {got}")]
    BadDeviceIds { requested: usize, got: usize },

    #[error("Couldn't determine the available parallelism: {0}")]
    Cpu(#[from] std::io::Error),

    #[cfg(any(feature = "cuda", feature = "hip"))]
    #[error("GPU device call failed with code {code} during {action}")]
    Gpu { code: i32, action: &'static str },
}

/// How many devices could worker lanes be bound to?
pub fn num_available_devices() -> Result<usize, DeviceError> {
    cfg_if::cfg_if! {
        if #[cfg(any(feature = "cuda", feature = "hip"))] {
            let mut count: i32 = 0;
            let code = unsafe { gpuGetDeviceCount(&mut count) };
            if code != gpuSuccess {
                return Err(DeviceError::Gpu {
                    code: code as i32,
                    action: "device enumeration",
                });
            }
            Ok(count.max(0) as usize)
        } else {
            Ok(std::thread::available_parallelism()?.get())
        }
    }
}

/// A handle to one worker lane's device, held for the lifetime of a run.
///
/// Lane-to-device assignment is fixed, but the OS thread executing a lane's
/// work may change between tasks, and the "current device" of a thread is
/// whatever was last bound on it. [`DeviceLane::bind`] must therefore be
/// called at the top of every dispatched task, not once per lane.
pub struct DeviceLane {
    index: usize,
    device_id: i32,
}

impl DeviceLane {
    /// This lane's index within the pool (0-based, dense).
    pub fn index(&self) -> usize {
        self.index
    }

    /// The physical device this lane is bound to.
    pub fn device_id(&self) -> i32 {
        self.device_id
    }

    /// Make this lane's device the calling thread's active device.
    pub fn bind(&self) -> Result<(), DeviceError> {
        #[cfg(any(feature = "cuda", feature = "hip"))]
        {
            let code = unsafe { gpuSetDevice(self.device_id) };
            if code != gpuSuccess {
                return Err(DeviceError::Gpu {
                    code: code as i32,
                    action: "device binding",
                });
            }
        }
        Ok(())
    }
}

/// An ordered set of worker lanes, each bound to one device for a run.
pub struct DevicePool {
    lanes: Vec<DeviceLane>,
}

impl DevicePool {
    /// Bind `requested` lanes to devices. `device_ids` selects which physical
    /// devices to use; when `None`, devices 0..requested are used.
    ///
    /// # Errors
    ///
    /// Fails with [`DeviceError::DeviceUnavailable`] if fewer physical
    /// devices exist than requested. No partial pool is ever handed out.
    pub fn acquire(
        requested: NonZeroUsize,
        device_ids: Option<&[i32]>,
    ) -> Result<DevicePool, DeviceError> {
        let requested = requested.get();
        let available = num_available_devices()?;
        if available < requested {
            return Err(DeviceError::DeviceUnavailable {
                requested,
                available,
            });
        }
        if let Some(ids) = device_ids {
            if ids.len() < requested {
                return Err(DeviceError::BadDeviceIds {
                    requested,
                    got: ids.len(),
                });
            }
        }

        let lanes = (0..requested)
            .map(|index| {
                let device_id = match device_ids {
                    Some(ids) => ids[index],
                    None => index as i32,
                };
                DeviceLane { index, device_id }
            })
            .collect::<Vec<_>>();

        // Check that every lane's device can actually be made current before
        // any work is dispatched.
        for lane in &lanes {
            lane.bind()?;
        }
        debug!("Acquired {requested} device lanes ({available} devices available)");

        Ok(DevicePool { lanes })
    }

    pub fn lanes(&self) -> &[DeviceLane] {
        &self.lanes
    }

    pub fn num_lanes(&self) -> usize {
        self.lanes.len()
    }
}

impl Drop for DevicePool {
    fn drop(&mut self) {
        // Let any in-flight device work settle before the pool goes away.
        // Tearing down while kernels are running is unsafe; errors here are
        // unreportable, so they are ignored.
        #[cfg(any(feature = "cuda", feature = "hip"))]
        for lane in &self.lanes {
            unsafe {
                let _ = gpuSetDevice(lane.device_id);
                let _ = gpuDeviceSynchronize();
            }
        }
    }
}
