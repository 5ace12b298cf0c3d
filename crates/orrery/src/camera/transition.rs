//! Scripted camera move: a pure function of elapsed time, re-evaluated each tick.

use glam::DVec3;

use super::easing::Easing;
use super::pose::CameraPose;

/// A camera move from `from` to `to` over `duration_ms`.
///
/// `to` was computed while the target sat at `anchor`. When the target has moved
/// since, the end pose is shifted by the same amount, so a transition onto an
/// orbiting body lands on where the body is now rather than where it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    pub from: CameraPose,
    pub to: CameraPose,
    pub anchor: DVec3,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl CameraTransition {
    pub fn new(
        from: CameraPose,
        to: CameraPose,
        anchor: DVec3,
        start_ms: f64,
        duration_ms: f64,
        easing: Easing,
    ) -> Self {
        Self { from, to, anchor, start_ms, duration_ms: duration_ms.max(0.0), easing }
    }

    /// Linear progress in [0, 1]. A zero-length transition is complete at once.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }

    /// End pose re-anchored on the target's current position.
    pub fn end_pose(&self, anchor_now: DVec3) -> CameraPose {
        self.to.translated(anchor_now - self.anchor)
    }

    pub fn pose_at(&self, now_ms: f64, anchor_now: DVec3) -> CameraPose {
        let t = self.easing.apply(self.progress(now_ms));
        self.from.lerp(&self.end_pose(anchor_now), t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition() -> CameraTransition {
        CameraTransition::new(
            CameraPose::new(DVec3::new(0.0, 0.0, 100.0), DVec3::ZERO),
            CameraPose::new(DVec3::new(10.0, 0.0, 5.0), DVec3::new(10.0, 0.0, 0.0)),
            DVec3::new(10.0, 0.0, 0.0),
            1000.0,
            500.0,
            Easing::Linear,
        )
    }

    #[test]
    fn starts_at_from_and_ends_at_to() {
        let tr = transition();
        let anchor = tr.anchor;
        assert_eq!(tr.pose_at(1000.0, anchor), tr.from);
        assert_eq!(tr.pose_at(900.0, anchor), tr.from);
        assert!(tr.pose_at(1500.0, anchor).distance_to(&tr.to) < 1e-12);
        assert!(tr.pose_at(9000.0, anchor).distance_to(&tr.to) < 1e-12);
    }

    #[test]
    fn completion_and_progress() {
        let tr = transition();
        assert!(!tr.is_complete(1499.0));
        assert!(tr.is_complete(1500.0));
        assert!((tr.progress(1250.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn end_pose_follows_moving_anchor() {
        let tr = transition();
        let moved = tr.anchor + DVec3::new(0.0, 0.0, 3.0);
        let end = tr.pose_at(1500.0, moved);
        assert!((end.look_at - moved).length() < 1e-12);
        assert!((end.position - DVec3::new(10.0, 0.0, 8.0)).length() < 1e-12);
    }

    #[test]
    fn zero_duration_is_instant() {
        let mut tr = transition();
        tr.duration_ms = 0.0;
        assert!(tr.is_complete(tr.start_ms));
        assert!(tr.pose_at(tr.start_ms, tr.anchor).distance_to(&tr.to) < 1e-12);
    }
}
