//! Camera authority: who drives the viewpoint right now.
//!
//! ```text
//!   Overview ──focus──▶ Transitioning ──done──▶ Following
//!      ▲                    │   ▲                  │
//!      │                    │   └──focus/reset─────┤
//!      │                 user input             user input
//!      │                    ▼                      ▼
//!      └──reset/idle──── UserOverride ◀────────────┘
//!                           │ idle timeout, target set
//!                           └──────────▶ Following (re-centring)
//! ```
//!
//! Every timeout compares stored timestamps with the tick's `now_ms`; nothing is
//! scheduled.

use glam::DVec3;

use super::easing::Easing;
use super::pose::{follow_factor, CameraPose, PerspectiveCamera};
use super::transition::CameraTransition;
use crate::api::types::BodyId;
use crate::components::body::BodyNode;
use crate::config::OrreryConfig;
use crate::core::hierarchy::BodySystem;

/// Smallest radius used for framing, so a point-like body still gets a
/// camera distance.
const MIN_FRAMING_RADIUS: f64 = 1e-3;

/// Discriminant of [`FocusState`], also the wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusMode {
    Overview,
    Transitioning,
    Following,
    UserOverride,
}

impl FocusMode {
    pub fn code(self) -> u32 {
        match self {
            FocusMode::Overview => 0,
            FocusMode::Transitioning => 1,
            FocusMode::Following => 2,
            FocusMode::UserOverride => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusState {
    /// No focus; the camera holds its pose.
    Overview,
    /// Scripted move. `target: None` is a move back to the overview framing.
    Transitioning {
        target: Option<BodyId>,
        transition: CameraTransition,
    },
    /// Trailing the target. `recentering` uses the fast factor until close.
    Following { target: BodyId, recentering: bool },
    /// The user drives. Auto-follow is suspended until `last_input_ms` is
    /// older than the idle timeout.
    UserOverride {
        target: Option<BodyId>,
        last_input_ms: f64,
    },
}

impl FocusState {
    pub fn mode(&self) -> FocusMode {
        match self {
            FocusState::Overview => FocusMode::Overview,
            FocusState::Transitioning { .. } => FocusMode::Transitioning,
            FocusState::Following { .. } => FocusMode::Following,
            FocusState::UserOverride { .. } => FocusMode::UserOverride,
        }
    }

    pub fn target(&self) -> Option<BodyId> {
        match *self {
            FocusState::Overview => None,
            FocusState::Transitioning { target, .. } => target,
            FocusState::Following { target, .. } => Some(target),
            FocusState::UserOverride { target, .. } => target,
        }
    }
}

/// A state change, reported to the host as an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusChange {
    pub from: FocusMode,
    pub to: FocusMode,
    pub target: Option<BodyId>,
}

/// Framing and timing policy, taken from [`OrreryConfig`] at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusPolicy {
    pub default_framing_ratio: f64,
    pub framing_bias: f64,
    pub follow_smoothing: f64,
    pub recenter_smoothing: f64,
    pub recenter_tolerance: f64,
    pub user_idle_timeout_ms: f64,
    pub transition_duration_ms: f64,
    pub transition_easing: Easing,
    pub overview_margin: f64,
    /// Radians above the ecliptic.
    pub overview_elevation: f64,
}

impl FocusPolicy {
    pub fn from_config(config: &OrreryConfig) -> Self {
        Self {
            default_framing_ratio: config.default_framing_ratio,
            framing_bias: config.framing_bias,
            follow_smoothing: config.follow_smoothing,
            recenter_smoothing: config.recenter_smoothing,
            recenter_tolerance: config.recenter_tolerance,
            user_idle_timeout_ms: config.user_idle_timeout_ms,
            transition_duration_ms: config.transition_duration_ms,
            transition_easing: config.transition_easing,
            overview_margin: config.overview_margin,
            overview_elevation: config.overview_elevation_deg.to_radians(),
        }
    }
}

impl Default for FocusPolicy {
    fn default() -> Self {
        Self::from_config(&OrreryConfig::default())
    }
}

/// Owns the camera pose and the state machine that decides who moves it.
#[derive(Debug, Clone)]
pub struct FocusController {
    state: FocusState,
    pose: CameraPose,
    camera: PerspectiveCamera,
    policy: FocusPolicy,
    changes: Vec<FocusChange>,
}

impl FocusController {
    pub fn new(policy: FocusPolicy, camera: PerspectiveCamera, pose: CameraPose) -> Self {
        Self {
            state: FocusState::Overview,
            pose,
            camera,
            policy,
            changes: Vec::new(),
        }
    }

    /// Start in the overview framing of `bodies`.
    pub fn overview(policy: FocusPolicy, camera: PerspectiveCamera, bodies: &BodySystem) -> Self {
        let mut controller = Self::new(policy, camera, CameraPose::new(DVec3::Z, DVec3::ZERO));
        controller.pose = controller.overview_pose(bodies);
        controller
    }

    fn set_state(&mut self, next: FocusState) {
        let from = self.state.mode();
        let to = next.mode();
        let target = next.target();
        if from != to || self.state.target() != target {
            log::debug!("focus: {from:?} -> {to:?} ({target:?})");
            self.changes.push(FocusChange { from, to, target });
        }
        self.state = next;
    }

    /// Start a transition onto `target` from wherever the camera is now.
    /// Unknown targets are ignored; returns whether the request was taken.
    pub fn request_focus(&mut self, target: BodyId, bodies: &BodySystem, now_ms: f64) -> bool {
        let Some(node) = bodies.get(target) else {
            log::warn!("focus request for unknown body {target:?} ignored");
            return false;
        };
        let anchor = node.world_position();
        let transition = CameraTransition::new(
            self.pose,
            self.ideal_pose(node),
            anchor,
            now_ms,
            self.policy.transition_duration_ms,
            self.policy.transition_easing,
        );
        self.set_state(FocusState::Transitioning { target: Some(target), transition });
        true
    }

    /// Clear the target and move to the whole-system framing.
    pub fn request_reset(&mut self, bodies: &BodySystem, now_ms: f64) {
        let transition = CameraTransition::new(
            self.pose,
            self.overview_pose(bodies),
            DVec3::ZERO,
            now_ms,
            self.policy.transition_duration_ms,
            self.policy.transition_easing,
        );
        self.set_state(FocusState::Transitioning { target: None, transition });
    }

    /// The user grabbed the camera. Takes effect at once, from any state; an
    /// in-flight transition stops where it is.
    pub fn user_control_start(&mut self, now_ms: f64) {
        let target = self.state.target();
        self.set_state(FocusState::UserOverride { target, last_input_ms: now_ms });
    }

    /// The user's controls moved the camera. Restarts the idle timeout.
    pub fn user_control_change(&mut self, pose: Option<CameraPose>, now_ms: f64) {
        if let Some(pose) = pose {
            if pose.is_finite() {
                self.pose = pose;
            } else {
                log::warn!("non-finite user camera pose ignored");
            }
        }
        if let FocusState::UserOverride { last_input_ms, .. } = &mut self.state {
            *last_input_ms = now_ms;
        } else {
            self.user_control_start(now_ms);
        }
    }

    /// Advance the state machine. `bodies` must already be resolved for this tick.
    pub fn update(&mut self, bodies: &BodySystem, now_ms: f64, dt: f64) {
        match self.state {
            FocusState::Overview => {}

            FocusState::Transitioning { target, transition } => {
                let anchor = match target {
                    None => transition.anchor,
                    Some(id) => match bodies.world_position(id) {
                        Some(world) => world,
                        None => {
                            log::warn!("focus target {id:?} was removed mid-transition");
                            self.set_state(FocusState::Overview);
                            return;
                        }
                    },
                };
                if transition.is_complete(now_ms) {
                    self.pose = transition.end_pose(anchor);
                    match target {
                        Some(id) => self.set_state(FocusState::Following { target: id, recentering: false }),
                        None => self.set_state(FocusState::Overview),
                    }
                } else {
                    self.pose = transition.pose_at(now_ms, anchor);
                }
            }

            FocusState::Following { target, recentering } => {
                self.follow_step(bodies, target, recentering, dt);
            }

            FocusState::UserOverride { target, last_input_ms } => {
                if now_ms - last_input_ms <= self.policy.user_idle_timeout_ms {
                    return;
                }
                match target.filter(|&id| bodies.contains(id)) {
                    Some(id) => {
                        self.set_state(FocusState::Following { target: id, recentering: true });
                        self.follow_step(bodies, id, true, dt);
                    }
                    None => {
                        if target.is_some() {
                            log::warn!("focus target {target:?} was removed during user control");
                        }
                        self.set_state(FocusState::Overview);
                    }
                }
            }
        }
    }

    fn follow_step(&mut self, bodies: &BodySystem, target: BodyId, recentering: bool, dt: f64) {
        let Some(node) = bodies.get(target) else {
            log::warn!("followed body {target:?} was removed");
            self.set_state(FocusState::Overview);
            return;
        };
        let ideal = self.ideal_pose(node);
        let smoothing = if recentering {
            self.policy.recenter_smoothing
        } else {
            self.policy.follow_smoothing
        };
        self.pose = self.pose.lerp(&ideal, follow_factor(smoothing, dt));

        if recentering {
            let tolerance = self.policy.recenter_tolerance * self.follow_distance(node);
            if self.pose.distance_to(&ideal) <= tolerance {
                log::trace!("re-centred on {target:?}");
                self.state = FocusState::Following { target, recentering: false };
            }
        }
    }

    /// Camera distance that makes `node` fill its framing ratio of the view.
    pub fn follow_distance(&self, node: &BodyNode) -> f64 {
        let ratio = node.framing_ratio.unwrap_or(self.policy.default_framing_ratio);
        self.camera.framing_distance(node.radius.max(MIN_FRAMING_RADIUS), ratio)
    }

    /// Pose that frames `node` at its current position, offset diagonally so the
    /// body isn't viewed straight down an axis.
    pub fn ideal_pose(&self, node: &BodyNode) -> CameraPose {
        let distance = self.follow_distance(node);
        let bias = self.policy.framing_bias * distance;
        let world = node.world_position();
        CameraPose::new(world + DVec3::new(bias, bias, distance), world)
    }

    /// Whole-system framing: looks at the origin from above the ecliptic, far
    /// enough that the outermost reach fits.
    pub fn overview_pose(&self, bodies: &BodySystem) -> CameraPose {
        let radius = bodies.system_radius().max(MIN_FRAMING_RADIUS);
        let distance = self.policy.overview_margin * radius / (self.camera.fov_y / 2.0).tan();
        let (sin_e, cos_e) = self.policy.overview_elevation.sin_cos();
        CameraPose::new(DVec3::new(0.0, distance * sin_e, distance * cos_e), DVec3::ZERO)
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn mode(&self) -> FocusMode {
        self.state.mode()
    }

    pub fn target(&self) -> Option<BodyId> {
        self.state.target()
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.resize(width, height);
    }

    pub fn policy(&self) -> &FocusPolicy {
        &self.policy
    }

    /// State changes since the last call.
    pub fn drain_changes(&mut self) -> Vec<FocusChange> {
        std::mem::take(&mut self.changes)
    }
}
