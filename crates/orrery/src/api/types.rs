use crate::camera::FocusMode;

/// Stable identifier of a body. Assigned at construction, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Something the host may want to react to, collected during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrreryEvent {
    /// Single click on a body.
    BodySelected(BodyId),
    /// Double click: show the info panel for this body.
    BodyInfoRequested(BodyId),
    FocusChanged {
        from: FocusMode,
        to: FocusMode,
        target: Option<BodyId>,
    },
}

impl OrreryEvent {
    pub const BODY_SELECTED: u32 = 1;
    pub const BODY_INFO_REQUESTED: u32 = 2;
    pub const FOCUS_CHANGED: u32 = 3;

    /// Numeric kind used on the wire.
    pub fn kind(&self) -> u32 {
        match self {
            OrreryEvent::BodySelected(_) => Self::BODY_SELECTED,
            OrreryEvent::BodyInfoRequested(_) => Self::BODY_INFO_REQUESTED,
            OrreryEvent::FocusChanged { .. } => Self::FOCUS_CHANGED,
        }
    }
}

/// Counters for conditions that are absorbed rather than reported as errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Kepler solves that did not converge.
    pub kepler_non_converged: u64,
    /// Focus or removal requests naming a body that does not exist.
    pub ignored_requests: u64,
    pub ticks: u64,
}

/// What the renderer needs for one body each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub id: BodyId,
    pub position: glam::DVec3,
    /// Spin angle about the body's tilted axis (radians).
    pub spin: f64,
    pub axial_tilt: f64,
    pub radius: f64,
}
