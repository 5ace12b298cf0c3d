// Simplified circular orbit: no Kepler solve, angle integrated linearly.

use glam::DVec3;
use std::f64::consts::TAU;

use crate::config::ConfigError;

/// Circular orbit around the parent, tilted by `inclination` about the X axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    /// Distance from the parent (scene units).
    pub radius: f64,
    /// Angular speed, radians per day. Negative = retrograde.
    pub angular_speed: f64,
    /// Tilt of the orbit plane (radians).
    pub inclination: f64,
}

impl CircularOrbit {
    pub fn new(radius: f64, angular_speed: f64) -> Self {
        Self { radius, angular_speed, inclination: 0.0 }
    }

    /// Orbit completing one revolution every `period_days` (negative = retrograde).
    pub fn with_period_days(radius: f64, period_days: f64) -> Self {
        let angular_speed = if period_days == 0.0 { 0.0 } else { TAU / period_days };
        Self::new(radius, angular_speed)
    }

    pub fn with_inclination(mut self, inclination: f64) -> Self {
        self.inclination = inclination;
        self
    }

    /// Simulated days per revolution, `None` for a stationary orbit.
    pub fn period_days(&self) -> Option<f64> {
        (self.angular_speed != 0.0).then(|| TAU / self.angular_speed.abs())
    }

    /// Position at orbital angle `theta`.
    #[inline]
    pub fn position(&self, theta: f64) -> DVec3 {
        circular_position(theta, self.radius, self.inclination)
    }

    pub fn validate(&self, body: &str) -> Result<(), ConfigError> {
        for (field, value) in [
            ("orbit.radius", self.radius),
            ("orbit.angular_speed", self.angular_speed),
            ("orbit.inclination", self.inclination),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { body: body.to_string(), field });
            }
        }
        if self.radius < 0.0 {
            return Err(ConfigError::InvalidOrbit {
                body: body.to_string(),
                reason: format!("negative orbit radius {}", self.radius),
            });
        }
        Ok(())
    }
}

/// `(cos θ·r, −sin θ·r·sin(incl), sin θ·r·cos(incl))`
#[inline]
pub fn circular_position(theta: f64, radius: f64, inclination: f64) -> DVec3 {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_i, cos_i) = inclination.sin_cos();
    DVec3::new(cos_t * radius, -sin_t * radius * sin_i, sin_t * radius * cos_i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn constant_radius() {
        let orbit = CircularOrbit::new(5.0, 1.0).with_inclination(0.3);
        for k in 0..16 {
            let r = orbit.position(k as f64 * 0.4).length();
            assert!((r - 5.0).abs() < 1e-12, "r = {r}");
        }
    }

    #[test]
    fn flat_orbit_stays_in_ecliptic() {
        let p = circular_position(FRAC_PI_2, 2.0, 0.0);
        assert!(p.y.abs() < 1e-12);
        assert!((p.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn period_from_speed() {
        let orbit = CircularOrbit::with_period_days(1.0, -27.32);
        assert!(orbit.angular_speed < 0.0);
        assert!((orbit.period_days().unwrap() - 27.32).abs() < 1e-9);
        assert_eq!(CircularOrbit::new(0.0, 0.0).period_days(), None);
    }

    #[test]
    fn negative_radius_rejected() {
        assert!(CircularOrbit::new(-1.0, 0.1).validate("Moon").is_err());
    }
}
