//! Two-body orbital propagation: pure math, no hierarchy or camera knowledge.
//!
//! f64 throughout: secular rates are per Julian century, so `rate × centuries`
//! grows large and f32 loses the fractional angle.

pub mod circular;
pub mod elements;
pub mod frame;
pub mod kepler;

pub use circular::{circular_position, CircularOrbit};
pub use elements::{OrbitalElements, SecularRates, MAX_ECCENTRICITY};
pub use frame::{ecliptic_to_scene, keplerian_position, perifocal_to_ecliptic};
pub use kepler::{orbital_plane_position, solve_kepler, true_anomaly, KeplerSolution};

use std::f64::consts::TAU;

/// Days in a Julian century.
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Convert days since epoch to Julian centuries since epoch.
#[inline]
pub fn days_to_centuries(days: f64) -> f64 {
    days / DAYS_PER_CENTURY
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_stays_in_range() {
        for i in -40..40 {
            let a = i as f64 * 0.77;
            let w = wrap_angle(a);
            assert!((0.0..TAU).contains(&w), "wrap({a}) = {w}");
            assert!(((a - w) / TAU - ((a - w) / TAU).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn wrap_angle_tiny_negative() {
        assert_eq!(wrap_angle(-1e-18), 0.0);
    }

    #[test]
    fn century_conversion() {
        assert!((days_to_centuries(36525.0) - 1.0).abs() < 1e-15);
    }
}
