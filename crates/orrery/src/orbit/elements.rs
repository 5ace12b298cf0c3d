//! Keplerian orbital elements with secular rates.
//!
//! Angles are radians, lengths are scene units, rates are per Julian century.
//! Elements are immutable after construction: `at()` returns a new, drifted copy.

use crate::config::ConfigError;
use super::wrap_angle;

/// Highest eccentricity the drift in `at()` may reach. Keeps the Kepler solve
/// on bound orbits even when a secular rate would push `e` past 1.
pub const MAX_ECCENTRICITY: f64 = 0.999;

/// Per-century rates of change for each element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SecularRates {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node: f64,
    pub arg_perihelion: f64,
    /// Mean motion, radians per century.
    pub mean_longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis `a`.
    pub semi_major_axis: f64,
    /// Eccentricity `e`, in `[0, 1)`.
    pub eccentricity: f64,
    /// Inclination `i`.
    pub inclination: f64,
    /// Longitude of the ascending node `Ω`.
    pub ascending_node: f64,
    /// Argument of perihelion `ω`.
    pub arg_perihelion: f64,
    /// Mean longitude at epoch `L0`.
    pub mean_longitude: f64,
    pub rates: SecularRates,
}

impl OrbitalElements {
    /// Orbit in the reference plane with the given size and shape.
    pub fn new(semi_major_axis: f64, eccentricity: f64) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination: 0.0,
            ascending_node: 0.0,
            arg_perihelion: 0.0,
            mean_longitude: 0.0,
            rates: SecularRates::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_inclination(mut self, inclination: f64) -> Self {
        self.inclination = inclination;
        self
    }

    pub fn with_ascending_node(mut self, ascending_node: f64) -> Self {
        self.ascending_node = ascending_node;
        self
    }

    pub fn with_arg_perihelion(mut self, arg_perihelion: f64) -> Self {
        self.arg_perihelion = arg_perihelion;
        self
    }

    pub fn with_mean_longitude(mut self, mean_longitude: f64) -> Self {
        self.mean_longitude = mean_longitude;
        self
    }

    pub fn with_rates(mut self, rates: SecularRates) -> Self {
        self.rates = rates;
        self
    }

    /// Elements drifted linearly by their secular rates over `centuries`.
    pub fn at(&self, centuries: f64) -> Self {
        let r = &self.rates;
        Self {
            semi_major_axis: (self.semi_major_axis + r.semi_major_axis * centuries).max(0.0),
            eccentricity: (self.eccentricity + r.eccentricity * centuries).clamp(0.0, MAX_ECCENTRICITY),
            inclination: self.inclination + r.inclination * centuries,
            ascending_node: self.ascending_node + r.ascending_node * centuries,
            arg_perihelion: self.arg_perihelion + r.arg_perihelion * centuries,
            mean_longitude: self.mean_longitude + r.mean_longitude * centuries,
            rates: self.rates,
        }
    }

    /// Mean longitude after `centuries`, wrapped to `[0, 2π)`.
    pub fn mean_longitude_at(&self, centuries: f64) -> f64 {
        wrap_angle(self.mean_longitude + self.rates.mean_longitude * centuries)
    }

    /// Mean anomaly `M = normalize(L - ω)` of these (already drifted) elements.
    pub fn mean_anomaly(&self) -> f64 {
        wrap_angle(self.mean_longitude - self.arg_perihelion)
    }

    /// Farthest distance from the focus (aphelion).
    pub fn aphelion(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Closest distance to the focus (perihelion).
    pub fn perihelion(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Reject unbound or non-finite orbits.
    pub fn validate(&self, body: &str) -> Result<(), ConfigError> {
        let fields = [
            ("semi_major_axis", self.semi_major_axis),
            ("eccentricity", self.eccentricity),
            ("inclination", self.inclination),
            ("ascending_node", self.ascending_node),
            ("arg_perihelion", self.arg_perihelion),
            ("mean_longitude", self.mean_longitude),
            ("rates.semi_major_axis", self.rates.semi_major_axis),
            ("rates.eccentricity", self.rates.eccentricity),
            ("rates.inclination", self.rates.inclination),
            ("rates.ascending_node", self.rates.ascending_node),
            ("rates.arg_perihelion", self.rates.arg_perihelion),
            ("rates.mean_longitude", self.rates.mean_longitude),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { body: body.to_string(), field });
            }
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(ConfigError::InvalidEccentricity {
                body: body.to_string(),
                eccentricity: self.eccentricity,
            });
        }
        if self.semi_major_axis < 0.0 {
            return Err(ConfigError::InvalidOrbit {
                body: body.to_string(),
                reason: format!("negative semi-major axis {}", self.semi_major_axis),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn drift_applies_rates() {
        let el = OrbitalElements::new(1.0, 0.1).with_rates(SecularRates {
            semi_major_axis: 0.5,
            mean_longitude: TAU,
            ..SecularRates::default()
        });
        let later = el.at(2.0);
        assert!((later.semi_major_axis - 2.0).abs() < 1e-12);
        assert!((later.mean_longitude - 2.0 * TAU).abs() < 1e-12);
        assert!((el.mean_longitude_at(2.0)).abs() < 1e-9);
    }

    #[test]
    fn drift_never_unbinds() {
        let el = OrbitalElements::new(1.0, 0.9).with_rates(SecularRates {
            eccentricity: 1.0,
            ..SecularRates::default()
        });
        assert!(el.at(100.0).eccentricity < 1.0);
        assert!(el.at(-100.0).eccentricity >= 0.0);
    }

    #[test]
    fn mean_anomaly_is_wrapped_difference() {
        let el = OrbitalElements::new(1.0, 0.0)
            .with_mean_longitude(0.5)
            .with_arg_perihelion(1.5);
        assert!((el.mean_anomaly() - (TAU - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_hyperbolic() {
        let err = OrbitalElements::new(1.0, 1.0).validate("Comet").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEccentricity { .. }));
        assert!(OrbitalElements::new(1.0, -0.1).validate("Comet").is_err());
    }

    #[test]
    fn validate_rejects_nan() {
        let el = OrbitalElements::new(1.0, 0.1).with_inclination(f64::NAN);
        let err = el.validate("Broken").unwrap_err();
        assert!(matches!(err, ConfigError::NonFinite { field: "inclination", .. }));
    }

    #[test]
    fn apsides() {
        let el = OrbitalElements::new(2.0, 0.5).with_inclination(PI / 4.0);
        assert!((el.aphelion() - 3.0).abs() < 1e-12);
        assert!((el.perihelion() - 1.0).abs() < 1e-12);
        assert!(el.validate("Ok").is_ok());
    }
}
