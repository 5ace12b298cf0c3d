use glam::DVec3;
use std::f64::consts::TAU;

use crate::api::types::BodyId;
use crate::config::ConfigError;
use crate::orbit::{
    days_to_centuries, keplerian_position, wrap_angle, CircularOrbit, KeplerSolution,
    OrbitalElements,
};

/// How a body moves around its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitModel {
    /// Full two-body ellipse, evaluated in closed form at the body's epoch.
    Keplerian(OrbitalElements),
    /// Tilted circle with a linearly integrated angle.
    Circular(CircularOrbit),
}

impl OrbitModel {
    /// Largest distance from the parent the body can reach.
    pub fn extent(&self) -> f64 {
        match self {
            OrbitModel::Keplerian(el) => el.aphelion(),
            OrbitModel::Circular(c) => c.radius,
        }
    }

    pub fn validate(&self, body: &str) -> Result<(), ConfigError> {
        match self {
            OrbitModel::Keplerian(el) => el.validate(body),
            OrbitModel::Circular(c) => c.validate(body),
        }
    }
}

/// Construction-time description of one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub name: String,
    /// Body this one orbits. `None` = system origin.
    pub parent: Option<String>,
    /// Render and pick radius.
    pub radius: f64,
    pub orbit: OrbitModel,
    /// Days per rotation; negative = retrograde, `None` = no spin.
    pub spin_period_days: Option<f64>,
    pub axial_tilt: f64,
    /// Desired screen-fill ratio when focused. `None` = global default.
    pub framing_ratio: Option<f64>,
    /// Initial circular-orbit angle. `None` = seeded random.
    pub phase: Option<f64>,
    /// `false` freezes the body regardless of the global animation flag.
    pub animated: bool,
}

impl BodyDesc {
    fn new(name: impl Into<String>, radius: f64, orbit: OrbitModel) -> Self {
        Self {
            name: name.into(),
            parent: None,
            radius,
            orbit,
            spin_period_days: None,
            axial_tilt: 0.0,
            framing_ratio: None,
            phase: None,
            animated: true,
        }
    }

    /// A body pinned at its focus.
    pub fn star(name: impl Into<String>, radius: f64) -> Self {
        Self::new(name, radius, OrbitModel::Circular(CircularOrbit::new(0.0, 0.0)))
    }

    pub fn keplerian(name: impl Into<String>, radius: f64, elements: OrbitalElements) -> Self {
        Self::new(name, radius, OrbitModel::Keplerian(elements))
    }

    pub fn circular(name: impl Into<String>, radius: f64, orbit: CircularOrbit) -> Self {
        Self::new(name, radius, OrbitModel::Circular(orbit))
    }

    // -- Builder pattern --

    pub fn orbiting(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_spin_period_days(mut self, period: f64) -> Self {
        self.spin_period_days = Some(period);
        self
    }

    pub fn with_axial_tilt(mut self, tilt: f64) -> Self {
        self.axial_tilt = tilt;
        self
    }

    pub fn with_framing_ratio(mut self, ratio: f64) -> Self {
        self.framing_ratio = Some(ratio);
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Never advances; still resolved, selectable and focusable.
    pub fn fixed(mut self) -> Self {
        self.animated = false;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let body = self.name.as_str();
        let non_finite = |field: &'static str| ConfigError::NonFinite { body: body.to_string(), field };

        if !self.radius.is_finite() {
            return Err(non_finite("radius"));
        }
        if self.radius < 0.0 {
            return Err(ConfigError::NegativeRadius { body: body.to_string(), radius: self.radius });
        }
        self.orbit.validate(body)?;

        if self.spin_period_days.is_some_and(|p| !p.is_finite()) {
            return Err(non_finite("spin_period_days"));
        }
        if !self.axial_tilt.is_finite() {
            return Err(non_finite("axial_tilt"));
        }
        if self.phase.is_some_and(|p| !p.is_finite()) {
            return Err(non_finite("phase"));
        }
        if let Some(ratio) = self.framing_ratio {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError::InvalidFramingRatio { body: body.to_string(), ratio });
            }
        }
        Ok(())
    }
}

/// Per-body mutable state, rewritten every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Orbital angle in [0, 2π). Mean longitude for Keplerian bodies.
    pub angle: f64,
    /// Spin angle in [0, 2π).
    pub spin: f64,
    /// Simulated days since epoch, as seen by this body. Frozen bodies lag.
    pub epoch_days: f64,
    /// Circular-orbit angle at epoch 0.
    pub phase0: f64,
    /// Offset from the parent.
    pub local: DVec3,
    /// Parent world + local. Valid after a hierarchy pass.
    pub world: DVec3,
}

/// A body in the hierarchy.
#[derive(Debug, Clone)]
pub struct BodyNode {
    pub id: BodyId,
    pub name: String,
    pub parent: Option<BodyId>,
    pub children: Vec<BodyId>,
    /// 1 for roots.
    pub depth: usize,
    pub radius: f64,
    pub orbit: OrbitModel,
    /// Radians per day.
    pub spin_speed: f64,
    pub axial_tilt: f64,
    pub framing_ratio: Option<f64>,
    pub animated: bool,
    pub state: OrbitState,
    /// Kepler solves on this body that hit the iteration cap.
    pub non_converged: u64,
}

impl BodyNode {
    /// `phase0` is the circular-orbit angle at epoch 0; ignored for Keplerian orbits.
    pub fn new(id: BodyId, desc: &BodyDesc, phase0: f64) -> Self {
        let spin_speed = match desc.spin_period_days {
            Some(p) if p != 0.0 => TAU / p,
            _ => 0.0,
        };
        let mut node = Self {
            id,
            name: desc.name.clone(),
            parent: None,
            children: Vec::new(),
            depth: 1,
            radius: desc.radius,
            orbit: desc.orbit,
            spin_speed,
            axial_tilt: desc.axial_tilt,
            framing_ratio: desc.framing_ratio,
            animated: desc.animated,
            state: OrbitState {
                angle: 0.0,
                spin: 0.0,
                epoch_days: 0.0,
                phase0: wrap_angle(phase0),
                local: DVec3::ZERO,
                world: DVec3::ZERO,
            },
            non_converged: 0,
        };
        node.set_epoch_days(0.0);
        node
    }

    /// Jump to an absolute epoch, ignoring the animation flags.
    pub fn set_epoch_days(&mut self, days: f64) {
        self.state.epoch_days = days;
        self.state.angle = match &self.orbit {
            OrbitModel::Circular(c) => wrap_angle(self.state.phase0 + c.angular_speed * days),
            OrbitModel::Keplerian(el) => el.mean_longitude_at(days_to_centuries(days)),
        };
        self.state.spin = wrap_angle(self.spin_speed * days);
    }

    /// Move the body forward by `delta_days`. No-op when animation is off
    /// globally or for this body.
    pub fn advance(&mut self, delta_days: f64, animation_enabled: bool) {
        if !animation_enabled || !self.animated || delta_days == 0.0 {
            return;
        }
        let state = &mut self.state;
        state.epoch_days += delta_days;
        state.angle = match &self.orbit {
            OrbitModel::Circular(c) => wrap_angle(state.angle + c.angular_speed * delta_days),
            OrbitModel::Keplerian(el) => el.mean_longitude_at(days_to_centuries(state.epoch_days)),
        };
        state.spin = wrap_angle(state.spin + self.spin_speed * delta_days);
    }

    /// Recompute the offset from the parent. Returns the Kepler solve for
    /// Keplerian bodies so the caller can count non-convergence.
    pub fn resolve_local(&mut self) -> Option<KeplerSolution> {
        match &self.orbit {
            OrbitModel::Circular(c) => {
                self.state.local = c.position(self.state.angle);
                None
            }
            OrbitModel::Keplerian(el) => {
                let (local, solution) = keplerian_position(el, days_to_centuries(self.state.epoch_days));
                // A non-finite solve keeps the last good offset.
                if local.is_finite() {
                    self.state.local = local;
                }
                if !solution.converged {
                    self.non_converged += 1;
                }
                Some(solution)
            }
        }
    }

    /// `world = parent_world + local`. A root with no orbit is pinned at the origin.
    pub fn resolve_world(&mut self, parent_world: Option<DVec3>) {
        self.state.world = match parent_world {
            Some(parent) => parent + self.state.local,
            None if self.is_pinned() => DVec3::ZERO,
            None => self.state.local,
        };
    }

    /// No orbit to speak of: zero extent.
    pub fn is_pinned(&self) -> bool {
        self.orbit.extent() == 0.0
    }

    pub fn extent(&self) -> f64 {
        self.orbit.extent()
    }

    pub fn world_position(&self) -> DVec3 {
        self.state.world
    }

    /// Simulated days per orbit, `None` for a body that doesn't move.
    pub fn orbital_period_days(&self) -> Option<f64> {
        match &self.orbit {
            OrbitModel::Circular(c) => c.period_days(),
            OrbitModel::Keplerian(el) => {
                let rate = el.rates.mean_longitude;
                (rate != 0.0).then(|| TAU / rate.abs() * crate::orbit::DAYS_PER_CENTURY)
            }
        }
    }
}
