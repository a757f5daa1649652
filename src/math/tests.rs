// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests on the helper maths.

use approx::assert_abs_diff_eq;
use marlu::c64;

use super::*;
use crate::constants::{FRAC_PI_2, PI};

#[test]
fn test_cexp() {
    assert_abs_diff_eq!(cexp(0.0), c64::new(1.0, 0.0));
    assert_abs_diff_eq!(cexp(PI), c64::new(-1.0, 0.0), epsilon = 1e-15);
    assert_abs_diff_eq!(cexp(FRAC_PI_2), c64::new(0.0, 1.0), epsilon = 1e-15);
}

#[test]
fn test_sinc() {
    assert_abs_diff_eq!(sinc(0.0), 1.0);
    assert_abs_diff_eq!(sinc(PI), 0.0, epsilon = 1e-15);
    assert_abs_diff_eq!(sinc(FRAC_PI_2), 1.0 / FRAC_PI_2, epsilon = 1e-15);
}

#[test]
fn baseline_maps_are_ordered_by_station() {
    let maps = BaselineMaps::new(4);
    assert_eq!(maps.num_baselines(), 6);
    assert_eq!(
        maps.baseline_to_station_pair,
        [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
    );

    // Degenerate arrays form no baselines.
    assert_eq!(BaselineMaps::new(0).num_baselines(), 0);
    assert_eq!(BaselineMaps::new(1).num_baselines(), 0);
    assert_eq!(num_cross_baselines(128), 8128);
}
