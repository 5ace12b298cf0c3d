//! The built-in solar system: Sun, nine planets, principal moons, and a
//! deterministic main-belt sample.
//!
//! Planet elements are J2000 values from Standish (1992) / JPL approximate
//! planetary positions. Those tables give the longitude of perihelion `ϖ` and
//! mean longitude `L`, both measured from the equinox; the orbit code works with
//! the argument of perihelion `ω = ϖ - Ω` and a longitude measured from the node,
//! so the conversion happens here once.
//!
//! Body radii and moon distances are exaggerated for readability. Planet
//! distances are to scale at [`AU`] scene units per astronomical unit.

use crate::config::{BodyEntry, OrbitEntry, OrreryConfig, RateEntry, SystemManifest};
use crate::core::rng::Rng;

/// Scene units per astronomical unit.
pub const AU: f64 = 100.0;

pub const SUN: &str = "Sun";
pub const PLANET_NAMES: [&str; 9] = [
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune", "Pluto",
];

pub const ASTEROID_COUNT: usize = 50;
/// Main-belt semi-major axis range (AU).
pub const ASTEROID_AU_MIN: f64 = 2.2;
pub const ASTEROID_AU_MAX: f64 = 3.2;
pub const ASTEROID_ECC_MAX: f64 = 0.15;
pub const ASTEROID_INCL_MAX_DEG: f64 = 10.0;
const ASTEROID_SEED: u64 = 0xA57E_201D;

/// One row of the planet table, in the units the tables use.
struct PlanetRow {
    name: &'static str,
    /// AU
    a: f64,
    e: f64,
    i_deg: f64,
    node_deg: f64,
    /// Longitude of perihelion ϖ.
    peri_long_deg: f64,
    /// Mean longitude L at J2000.
    l_deg: f64,
    /// Degrees per century.
    l_dot: f64,
    peri_long_dot: f64,
    radius: f64,
    spin_period_days: f64,
    axial_tilt_deg: f64,
}

#[rustfmt::skip]
const PLANETS: [PlanetRow; 9] = [
    PlanetRow { name: "Mercury", a: 0.38710, e: 0.20563, i_deg: 7.005, node_deg: 48.331, peri_long_deg: 77.457, l_deg: 252.251, l_dot: 149472.675, peri_long_dot: 0.159, radius: 1.2, spin_period_days: 58.646, axial_tilt_deg: 0.03 },
    PlanetRow { name: "Venus",   a: 0.72333, e: 0.00677, i_deg: 3.395, node_deg: 76.680, peri_long_deg: 131.564, l_deg: 181.980, l_dot: 58517.816, peri_long_dot: 0.053, radius: 2.0, spin_period_days: 243.025, axial_tilt_deg: 177.36 },
    PlanetRow { name: "Earth",   a: 1.00000, e: 0.01671, i_deg: 0.000, node_deg: 0.0, peri_long_deg: 102.937, l_deg: 100.464, l_dot: 35999.373, peri_long_dot: 0.323, radius: 2.1, spin_period_days: 0.99727, axial_tilt_deg: 23.44 },
    PlanetRow { name: "Mars",    a: 1.52368, e: 0.09340, i_deg: 1.850, node_deg: 49.558, peri_long_deg: 336.060, l_deg: 355.453, l_dot: 19140.300, peri_long_dot: 0.443, radius: 1.5, spin_period_days: 1.02596, axial_tilt_deg: 25.19 },
    PlanetRow { name: "Jupiter", a: 5.20260, e: 0.04849, i_deg: 1.303, node_deg: 100.464, peri_long_deg: 14.331, l_deg: 34.351, l_dot: 3034.906, peri_long_dot: 0.172, radius: 6.0, spin_period_days: 0.41354, axial_tilt_deg: 3.13 },
    PlanetRow { name: "Saturn",  a: 9.55491, e: 0.05551, i_deg: 2.489, node_deg: 113.666, peri_long_deg: 93.057, l_deg: 50.077, l_dot: 1222.114, peri_long_dot: 0.312, radius: 5.0, spin_period_days: 0.44401, axial_tilt_deg: 26.73 },
    PlanetRow { name: "Uranus",  a: 19.21845, e: 0.04630, i_deg: 0.773, node_deg: 74.006, peri_long_deg: 173.005, l_deg: 314.055, l_dot: 428.467, peri_long_dot: 0.030, radius: 3.5, spin_period_days: 0.71833, axial_tilt_deg: 97.77 },
    PlanetRow { name: "Neptune", a: 30.11039, e: 0.00899, i_deg: 1.770, node_deg: 131.784, peri_long_deg: 48.120, l_deg: 304.349, l_dot: 218.486, peri_long_dot: 0.012, radius: 3.4, spin_period_days: 0.67125, axial_tilt_deg: 28.32 },
    PlanetRow { name: "Pluto",   a: 39.48200, e: 0.24880, i_deg: 17.140, node_deg: 110.299, peri_long_deg: 224.067, l_deg: 238.929, l_dot: 145.180, peri_long_dot: 0.006, radius: 0.8, spin_period_days: 6.387, axial_tilt_deg: 122.53 },
];

struct MoonRow {
    name: &'static str,
    parent: &'static str,
    /// Scene units from the parent.
    orbit_radius: f64,
    /// Negative = retrograde.
    period_days: f64,
    inclination_deg: f64,
    radius: f64,
}

#[rustfmt::skip]
const MOONS: [MoonRow; 10] = [
    MoonRow { name: "Moon",     parent: "Earth",   orbit_radius: 5.0,  period_days: 27.32,  inclination_deg: 5.145, radius: 0.6 },
    MoonRow { name: "Phobos",   parent: "Mars",    orbit_radius: 2.6,  period_days: 0.32,   inclination_deg: 1.09,  radius: 0.25 },
    MoonRow { name: "Deimos",   parent: "Mars",    orbit_radius: 3.6,  period_days: 1.26,   inclination_deg: 0.93,  radius: 0.2 },
    MoonRow { name: "Io",       parent: "Jupiter", orbit_radius: 9.0,  period_days: 1.77,   inclination_deg: 0.05,  radius: 0.6 },
    MoonRow { name: "Europa",   parent: "Jupiter", orbit_radius: 11.0, period_days: 3.55,   inclination_deg: 0.47,  radius: 0.55 },
    MoonRow { name: "Ganymede", parent: "Jupiter", orbit_radius: 13.5, period_days: 7.15,   inclination_deg: 0.2,   radius: 0.8 },
    MoonRow { name: "Callisto", parent: "Jupiter", orbit_radius: 16.0, period_days: 16.69,  inclination_deg: 0.19,  radius: 0.75 },
    MoonRow { name: "Titan",    parent: "Saturn",  orbit_radius: 10.0, period_days: 15.95,  inclination_deg: 0.35,  radius: 0.8 },
    MoonRow { name: "Triton",   parent: "Neptune", orbit_radius: 6.0,  period_days: -5.877, inclination_deg: 23.0,  radius: 0.5 },
    MoonRow { name: "Charon",   parent: "Pluto",   orbit_radius: 2.2,  period_days: 6.387,  inclination_deg: 0.0,   radius: 0.4 },
];

/// Screen-fill ratio for moons: smaller than planets so they aren't framed
/// tight enough to fill the view.
const MOON_FRAMING_RATIO: f64 = 0.15;
const ASTEROID_FRAMING_RATIO: f64 = 0.05;

/// The built-in system with default settings.
pub fn solar_system() -> SystemManifest {
    let mut bodies = Vec::with_capacity(1 + PLANETS.len() + MOONS.len() + ASTEROID_COUNT);

    bodies.push(BodyEntry {
        name: SUN.to_string(),
        parent: None,
        radius: 12.0,
        orbit: None,
        spin_period_days: Some(25.38),
        axial_tilt_deg: 7.25,
        framing_ratio: Some(0.5),
        phase_deg: None,
        animated: true,
    });
    bodies.extend(PLANETS.iter().map(planet_entry));
    bodies.extend(MOONS.iter().map(moon_entry));
    bodies.extend((0..ASTEROID_COUNT).map(asteroid_entry));

    SystemManifest { settings: OrreryConfig::default(), bodies }
}

fn planet_entry(row: &PlanetRow) -> BodyEntry {
    BodyEntry {
        name: row.name.to_string(),
        parent: Some(SUN.to_string()),
        radius: row.radius,
        orbit: Some(OrbitEntry::Keplerian {
            semi_major_axis: row.a * AU,
            eccentricity: row.e,
            inclination_deg: row.i_deg,
            ascending_node_deg: row.node_deg,
            arg_perihelion_deg: row.peri_long_deg - row.node_deg,
            mean_longitude_deg: row.l_deg - row.node_deg,
            rates: RateEntry {
                arg_perihelion_deg: row.peri_long_dot,
                mean_longitude_deg: row.l_dot,
                ..RateEntry::default()
            },
        }),
        spin_period_days: Some(row.spin_period_days),
        axial_tilt_deg: row.axial_tilt_deg,
        framing_ratio: None,
        phase_deg: None,
        animated: true,
    }
}

fn moon_entry(row: &MoonRow) -> BodyEntry {
    BodyEntry {
        name: row.name.to_string(),
        parent: Some(row.parent.to_string()),
        radius: row.radius,
        orbit: Some(OrbitEntry::Circular {
            radius: row.orbit_radius,
            period_days: row.period_days,
            inclination_deg: row.inclination_deg,
        }),
        // tidally locked
        spin_period_days: Some(row.period_days),
        axial_tilt_deg: 0.0,
        framing_ratio: Some(MOON_FRAMING_RATIO),
        phase_deg: None,
        animated: true,
    }
}

fn asteroid_entry(index: usize) -> BodyEntry {
    let mut rng = Rng::for_index(ASTEROID_SEED, index as u64);
    let a = rng.next_range(ASTEROID_AU_MIN, ASTEROID_AU_MAX);
    let e = rng.next_range(0.0, ASTEROID_ECC_MAX);
    let i_deg = rng.next_range(0.0, ASTEROID_INCL_MAX_DEG);
    let node_deg = rng.next_range(0.0, 360.0);
    let w_deg = rng.next_range(0.0, 360.0);
    let l_deg = rng.next_range(0.0, 360.0);
    // Kepler's third law: one revolution per a^1.5 years
    let l_dot = 36525.0 * 360.0 / (a.powf(1.5) * 365.25);

    BodyEntry {
        name: format!("Asteroid {:03}", index + 1),
        parent: Some(SUN.to_string()),
        radius: 0.15,
        orbit: Some(OrbitEntry::Keplerian {
            semi_major_axis: a * AU,
            eccentricity: e,
            inclination_deg: i_deg,
            ascending_node_deg: node_deg,
            arg_perihelion_deg: w_deg,
            mean_longitude_deg: l_deg,
            rates: RateEntry { mean_longitude_deg: l_dot, ..RateEntry::default() },
        }),
        spin_period_days: None,
        axial_tilt_deg: 0.0,
        framing_ratio: Some(ASTEROID_FRAMING_RATIO),
        phase_deg: None,
        animated: true,
    }
}
