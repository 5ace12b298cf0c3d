use serde::{Deserialize, Serialize};

use super::{ConfigError, OrreryConfig};
use crate::components::body::BodyDesc;
use crate::orbit::{CircularOrbit, OrbitalElements, SecularRates};

/// System description loaded from JSON: global settings plus the body table.
///
/// Angles are degrees, lengths are scene units, rates are per Julian century.
/// Everything is converted to radians once, in [`BodyEntry::to_desc`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemManifest {
    #[serde(default)]
    pub settings: OrreryConfig,
    pub bodies: Vec<BodyEntry>,
}

/// One body as written in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyEntry {
    pub name: String,
    /// Name of the body this one orbits. Absent = system origin.
    #[serde(default)]
    pub parent: Option<String>,
    /// Render and pick radius.
    pub radius: f64,
    /// Absent = pinned to its focus (a star).
    #[serde(default)]
    pub orbit: Option<OrbitEntry>,
    /// Sidereal rotation period. Negative = retrograde, absent = no spin.
    #[serde(default)]
    pub spin_period_days: Option<f64>,
    #[serde(default)]
    pub axial_tilt_deg: f64,
    /// Desired screen-fill ratio when focused.
    #[serde(default)]
    pub framing_ratio: Option<f64>,
    /// Initial angle of a circular orbit. Absent = seeded random phase.
    #[serde(default)]
    pub phase_deg: Option<f64>,
    /// `false` = never advances, even while animation is on.
    #[serde(default = "default_animated")]
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrbitEntry {
    Keplerian {
        semi_major_axis: f64,
        eccentricity: f64,
        #[serde(default)]
        inclination_deg: f64,
        #[serde(default)]
        ascending_node_deg: f64,
        #[serde(default)]
        arg_perihelion_deg: f64,
        #[serde(default)]
        mean_longitude_deg: f64,
        #[serde(default)]
        rates: RateEntry,
    },
    Circular {
        radius: f64,
        /// Days per revolution. Negative = retrograde.
        period_days: f64,
        #[serde(default)]
        inclination_deg: f64,
    },
}

/// Per-century rates; angular rates in degrees per century.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateEntry {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub ascending_node_deg: f64,
    pub arg_perihelion_deg: f64,
    pub mean_longitude_deg: f64,
}

fn default_animated() -> bool {
    true
}

impl SystemManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Parse)
    }

    /// Body descriptors in manifest order.
    pub fn body_descs(&self) -> Vec<BodyDesc> {
        self.bodies.iter().map(BodyEntry::to_desc).collect()
    }
}

impl RateEntry {
    fn to_rates(self) -> SecularRates {
        SecularRates {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: self.inclination_deg.to_radians(),
            ascending_node: self.ascending_node_deg.to_radians(),
            arg_perihelion: self.arg_perihelion_deg.to_radians(),
            mean_longitude: self.mean_longitude_deg.to_radians(),
        }
    }
}

impl BodyEntry {
    pub fn to_desc(&self) -> BodyDesc {
        let mut desc = match &self.orbit {
            None => BodyDesc::star(&self.name, self.radius),
            Some(OrbitEntry::Keplerian {
                semi_major_axis,
                eccentricity,
                inclination_deg,
                ascending_node_deg,
                arg_perihelion_deg,
                mean_longitude_deg,
                rates,
            }) => {
                let elements = OrbitalElements::new(*semi_major_axis, *eccentricity)
                    .with_inclination(inclination_deg.to_radians())
                    .with_ascending_node(ascending_node_deg.to_radians())
                    .with_arg_perihelion(arg_perihelion_deg.to_radians())
                    .with_mean_longitude(mean_longitude_deg.to_radians())
                    .with_rates(rates.to_rates());
                BodyDesc::keplerian(&self.name, self.radius, elements)
            }
            Some(OrbitEntry::Circular { radius, period_days, inclination_deg }) => {
                let orbit = CircularOrbit::with_period_days(*radius, *period_days)
                    .with_inclination(inclination_deg.to_radians());
                BodyDesc::circular(&self.name, self.radius, orbit)
            }
        };

        if let Some(parent) = &self.parent {
            desc = desc.orbiting(parent);
        }
        if let Some(period) = self.spin_period_days {
            desc = desc.with_spin_period_days(period);
        }
        if let Some(ratio) = self.framing_ratio {
            desc = desc.with_framing_ratio(ratio);
        }
        if let Some(phase) = self.phase_deg {
            desc = desc.with_phase(phase.to_radians());
        }
        desc = desc.with_axial_tilt(self.axial_tilt_deg.to_radians());
        if !self.animated {
            desc = desc.fixed();
        }
        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::body::OrbitModel;

    const JSON: &str = r#"{
        "settings": { "double_click_ms": 250, "time_scale": 2.0 },
        "bodies": [
            { "name": "Sun", "radius": 10 },
            {
                "name": "Earth", "parent": "Sun", "radius": 1.2,
                "orbit": {
                    "kind": "keplerian",
                    "semi_major_axis": 100, "eccentricity": 0.0167,
                    "arg_perihelion_deg": 103,
                    "rates": { "mean_longitude_deg": 35999.37 }
                },
                "spin_period_days": 0.997, "axial_tilt_deg": 23.44
            },
            {
                "name": "Moon", "parent": "Earth", "radius": 0.3,
                "orbit": { "kind": "circular", "radius": 4, "period_days": 27.32, "inclination_deg": 5.1 },
                "framing_ratio": 0.2, "phase_deg": 90, "animated": false
            }
        ]
    }"#;

    #[test]
    fn parse_full_manifest() {
        let manifest = SystemManifest::from_json(JSON).unwrap();
        assert_eq!(manifest.settings.double_click_ms, 250.0);
        assert_eq!(manifest.settings.user_idle_timeout_ms, 5000.0);
        assert_eq!(manifest.bodies.len(), 3);
        assert_eq!(manifest.bodies[1].parent.as_deref(), Some("Sun"));
        assert!(manifest.bodies[0].animated);
        assert!(!manifest.bodies[2].animated);
    }

    #[test]
    fn degrees_become_radians() {
        let descs = SystemManifest::from_json(JSON).unwrap().body_descs();
        let OrbitModel::Keplerian(earth) = descs[1].orbit else {
            panic!("Earth should be keplerian");
        };
        assert!((earth.arg_perihelion - 103.0_f64.to_radians()).abs() < 1e-12);
        assert!((earth.rates.mean_longitude - 35999.37_f64.to_radians()).abs() < 1e-9);
        assert!((descs[1].axial_tilt - 23.44_f64.to_radians()).abs() < 1e-12);

        let OrbitModel::Circular(moon) = descs[2].orbit else {
            panic!("Moon should be circular");
        };
        assert!((moon.inclination - 5.1_f64.to_radians()).abs() < 1e-12);
        assert!((descs[2].phase.unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(!descs[2].animated);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = SystemManifest::from_json(r#"{ "bodies": [ { "name": 3 } ] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_orbit_kind_rejected() {
        let json = r#"{ "bodies": [ { "name": "X", "radius": 1, "orbit": { "kind": "hyperbolic" } } ] }"#;
        assert!(SystemManifest::from_json(json).is_err());
    }

    #[test]
    fn json_round_trip_keeps_bodies() {
        let manifest = SystemManifest::from_json(JSON).unwrap();
        let again = SystemManifest::from_json(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(again.bodies, manifest.bodies);
    }
}
