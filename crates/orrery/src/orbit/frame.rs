//! Rotation from the orbital plane into the shared scene frame.
//!
//! Two steps: the classical 3-1-3 Euler rotation (ω about the orbit normal,
//! i about the line of nodes, Ω about the ecliptic pole) yields ecliptic
//! coordinates with +z at the pole; `ecliptic_to_scene` then turns that into
//! the Y-up scene frame the renderer uses, with the ecliptic in the XZ plane.

use glam::DVec3;

use super::elements::OrbitalElements;
use super::kepler::{orbital_plane_position, solve_kepler, KeplerSolution};

/// Rotate an orbital-plane (perifocal) vector into ecliptic coordinates.
pub fn perifocal_to_ecliptic(p: DVec3, arg_perihelion: f64, inclination: f64, ascending_node: f64) -> DVec3 {
    let (sin_o, cos_o) = ascending_node.sin_cos();
    let (sin_i, cos_i) = inclination.sin_cos();
    let (sin_w, cos_w) = arg_perihelion.sin_cos();

    let x = p.x * (cos_o * cos_w - sin_o * sin_w * cos_i)
        - p.y * (cos_o * sin_w + sin_o * cos_w * cos_i);
    let y = p.x * (sin_o * cos_w + cos_o * sin_w * cos_i)
        + p.y * (cos_o * cos_w * cos_i - sin_o * sin_w);
    let z = p.x * (sin_w * sin_i) + p.y * (cos_w * sin_i);

    DVec3::new(x, y, z)
}

/// Ecliptic (z = pole) → scene (y = up). A +90° rotation about X.
#[inline]
pub fn ecliptic_to_scene(v: DVec3) -> DVec3 {
    DVec3::new(v.x, -v.z, v.y)
}

/// Full chain: drift elements to `centuries`, solve Kepler, rotate into the scene.
/// The result is relative to the orbital focus (the parent body).
pub fn keplerian_position(elements: &OrbitalElements, centuries: f64) -> (DVec3, KeplerSolution) {
    let el = elements.at(centuries);
    let solution = solve_kepler(el.mean_anomaly(), el.eccentricity);
    let plane = orbital_plane_position(el.semi_major_axis, el.eccentricity, solution.eccentric_anomaly);
    let ecliptic = perifocal_to_ecliptic(plane, el.arg_perihelion, el.inclination, el.ascending_node);
    (ecliptic_to_scene(ecliptic), solution)
}
