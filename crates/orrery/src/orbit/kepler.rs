//! Kepler's equation and the anomaly conversions that follow from it.

use glam::DVec3;
use std::f64::consts::PI;

/// Newton-Raphson stops once a step moves E by less than this (radians).
pub const KEPLER_TOLERANCE: f64 = 1e-6;

/// Iteration cap. Not expected to trigger for `e < 1`.
pub const KEPLER_MAX_ITERATIONS: u32 = 50;

/// Result of one Kepler solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly `E` (radians), best estimate even when not converged.
    pub eccentric_anomaly: f64,
    pub iterations: u32,
    pub converged: bool,
}

/// Solve `E - e·sin(E) = M` for the eccentric anomaly.
///
/// Newton-Raphson from `E0 = M`. Steps that would leave the bracket known to hold
/// the root are replaced by bisection, so high eccentricities (where the first
/// Newton step overshoots by radians) still settle.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    if !mean_anomaly.is_finite() {
        return KeplerSolution { eccentric_anomaly: mean_anomaly, iterations: 0, converged: false };
    }

    // Reduce to [0, π] and use the odd symmetry of Kepler's equation.
    let turns = (mean_anomaly / (2.0 * PI)).round();
    let m_reduced = mean_anomaly - turns * 2.0 * PI;
    let sign = if m_reduced < 0.0 { -1.0 } else { 1.0 };
    let m = m_reduced.abs();
    let e = eccentricity;

    // E - M = e·sin(E) ∈ [0, e] on this half-turn.
    let mut lo = m;
    let mut hi = (m + e).min(PI);
    let mut ea = m; // initial guess
    let mut f = ea - e * ea.sin() - m;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < KEPLER_MAX_ITERATIONS {
        iterations += 1;
        if f > 0.0 {
            hi = ea;
        } else {
            lo = ea;
        }
        let derivative = 1.0 - e * ea.cos();
        let mut next = ea - f / derivative;
        // Also catches NaN
        if !(next >= lo && next <= hi) {
            next = 0.5 * (lo + hi);
        }
        let delta = next - ea;
        ea = next;
        f = ea - e * ea.sin() - m;
        if delta.abs() < KEPLER_TOLERANCE && f.abs() < KEPLER_TOLERANCE {
            converged = true;
            break;
        }
    }

    KeplerSolution {
        eccentric_anomaly: sign * ea + turns * 2.0 * PI,
        iterations,
        converged,
    }
}

/// True anomaly `ν` from the eccentric anomaly.
#[inline]
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin()).atan2((1.0 - eccentricity).sqrt() * half.cos())
}

/// Position in the orbital plane, perihelion along +x: `(r·cos ν, r·sin ν, 0)`.
pub fn orbital_plane_position(semi_major_axis: f64, eccentricity: f64, eccentric_anomaly: f64) -> DVec3 {
    let nu = true_anomaly(eccentric_anomaly, eccentricity);
    let r = semi_major_axis * (1.0 - eccentricity * eccentric_anomaly.cos());
    DVec3::new(r * nu.cos(), r * nu.sin(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residual(ea: f64, e: f64, m: f64) -> f64 {
        ea - e * ea.sin() - m
    }

    #[test]
    fn circular_orbit_is_identity() {
        let sol = solve_kepler(1.0, 0.0);
        assert!((sol.eccentric_anomaly - 1.0).abs() < 1e-12);
        assert!(sol.converged);
    }

    #[test]
    fn non_finite_anomaly_reports_failure() {
        let sol = solve_kepler(f64::NAN, 0.5);
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 0);
        assert!(sol.eccentric_anomaly.is_nan());
    }

    #[test]
    fn mercury_eccentricity() {
        let m = 1.5;
        let sol = solve_kepler(m, 0.2056);
        let r = residual(sol.eccentric_anomaly, 0.2056, m);
        assert!(r.abs() < 1e-6, "residual = {r}");
    }

    #[test]
    fn residual_bounded_across_eccentricities() {
        for ei in 0..100 {
            let e = ei as f64 * 0.01;
            for mi in -60..=120 {
                let m = mi as f64 * 0.1047;
                let sol = solve_kepler(m, e);
                let r = residual(sol.eccentric_anomaly, e, m);
                assert!(sol.converged, "no convergence at e={e}, M={m}");
                assert!(r.abs() < 1e-6, "e={e}, M={m}, residual={r}");
            }
        }
    }

    #[test]
    fn near_parabolic_small_anomaly() {
        let (m, e) = (1e-3, 0.999);
        let sol = solve_kepler(m, e);
        assert!(residual(sol.eccentric_anomaly, e, m).abs() < 1e-6);
        assert!(sol.iterations <= KEPLER_MAX_ITERATIONS);
    }

    #[test]
    fn true_anomaly_at_apsides() {
        assert!(true_anomaly(0.0, 0.5).abs() < 1e-12);
        assert!((true_anomaly(PI, 0.5) - PI).abs() < 1e-9);
    }

    #[test]
    fn plane_position_radius_between_apsides() {
        let (a, e) = (1.0, 0.0167);
        for i in 0..64 {
            let m = i as f64 / 64.0 * 2.0 * PI;
            let ea = solve_kepler(m, e).eccentric_anomaly;
            let r = orbital_plane_position(a, e, ea).length();
            assert!(r >= a * (1.0 - e) - 1e-9 && r <= a * (1.0 + e) + 1e-9, "r = {r}");
        }
    }
}
