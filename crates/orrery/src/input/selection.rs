//! Pointer picking and the single/double click protocol.

use crate::api::types::BodyId;
use crate::camera::{CameraPose, PerspectiveCamera};
use crate::core::hierarchy::BodySystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Bookkeeping only.
    Single,
    /// Second activation of the same body inside the window: show info and focus.
    Double,
}

/// Two-field rolling click state. Every click overwrites it; there is no
/// explicit reset and no timer.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    threshold_ms: f64,
    last_body: Option<BodyId>,
    last_ms: f64,
}

impl ClickTracker {
    pub fn new(threshold_ms: f64) -> Self {
        Self { threshold_ms, last_body: None, last_ms: f64::NEG_INFINITY }
    }

    /// Classify an activation of `body` at `now_ms`.
    pub fn register_click(&mut self, body: BodyId, now_ms: f64) -> SelectionEvent {
        let elapsed = now_ms - self.last_ms;
        let event = if self.last_body == Some(body) && (0.0..self.threshold_ms).contains(&elapsed) {
            SelectionEvent::Double
        } else {
            SelectionEvent::Single
        };
        self.last_body = Some(body);
        self.last_ms = now_ms;
        log::debug!("click on {body:?}: {event:?}");
        event
    }

    pub fn last_clicked(&self) -> Option<BodyId> {
        self.last_body
    }

    pub fn threshold_ms(&self) -> f64 {
        self.threshold_ms
    }
}

/// Body under viewport pixel `(x, y)`, tested against each body's render sphere.
///
/// The nearest entry point wins. Exact ties keep the body that comes first in
/// traversal order, so parents win over coincident children.
pub fn resolve_pick(
    x: f64,
    y: f64,
    camera: &PerspectiveCamera,
    pose: &CameraPose,
    bodies: &BodySystem,
) -> Option<BodyId> {
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    let ray = camera.ray_through(pose, x, y);
    let mut best: Option<(f64, BodyId)> = None;
    for node in bodies.iter() {
        let Some(t) = ray.intersect_sphere(node.world_position(), node.radius) else { continue };
        if best.map_or(true, |(best_t, _)| t < best_t) {
            best = Some((t, node.id));
        }
    }
    best.map(|(_, id)| id)
}
