//! Camera pose, pick rays, and the perspective parameters shared by framing and picking.

use glam::DVec3;

/// Where the camera is and what it looks at. This is the whole camera state the
/// core owns; orientation follows from `look_at` with +Y as up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: DVec3,
    pub look_at: DVec3,
}

impl CameraPose {
    pub fn new(position: DVec3, look_at: DVec3) -> Self {
        Self { position, look_at }
    }

    /// Blend position and look-at independently.
    pub fn lerp(&self, other: &CameraPose, t: f64) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            look_at: self.look_at.lerp(other.look_at, t),
        }
    }

    pub fn translated(&self, offset: DVec3) -> CameraPose {
        CameraPose {
            position: self.position + offset,
            look_at: self.look_at + offset,
        }
    }

    /// Larger of the position and look-at separations.
    pub fn distance_to(&self, other: &CameraPose) -> f64 {
        self.position
            .distance(other.position)
            .max(self.look_at.distance(other.look_at))
    }

    /// Unit view direction; `-Z` when position and look-at coincide.
    pub fn forward(&self) -> DVec3 {
        let dir = (self.look_at - self.position).normalize_or_zero();
        if dir == DVec3::ZERO {
            DVec3::NEG_Z
        } else {
            dir
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.look_at.is_finite()
    }
}

/// Half-line used for picking. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Distance along the ray to where it enters the sphere, `None` on a miss or
    /// when the sphere is entirely behind the origin. An origin inside the sphere
    /// reports 0.
    pub fn intersect_sphere(&self, center: DVec3, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let (t_near, t_far) = (-b - sqrt_disc, -b + sqrt_disc);
        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// Perspective projection parameters: vertical FOV and the viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view (radians).
    pub fov_y: f64,
    pub width: f64,
    pub height: f64,
}

impl PerspectiveCamera {
    pub fn new(fov_y: f64, width: f64, height: f64) -> Self {
        Self { fov_y, width, height }
    }

    /// Update the viewport. Non-positive or non-finite sizes are ignored.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.width = width;
            self.height = height;
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Pick ray through viewport pixel `(x, y)`, origin top-left.
    pub fn ray_through(&self, pose: &CameraPose, x: f64, y: f64) -> Ray {
        let forward = pose.forward();
        let mut right = forward.cross(DVec3::Y).normalize_or_zero();
        if right == DVec3::ZERO {
            // looking straight up or down
            right = DVec3::X;
        }
        let up = right.cross(forward);

        let ndc_x = 2.0 * x / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / self.height;
        let tan_half = (self.fov_y / 2.0).tan();

        let direction = (forward
            + right * (ndc_x * tan_half * self.aspect())
            + up * (ndc_y * tan_half))
            .normalize();
        Ray { origin: pose.position, direction }
    }

    /// Camera distance at which a sphere of `radius` spans `ratio` of the
    /// viewport height: `(radius / ratio) / tan(fov / 2)`.
    pub fn framing_distance(&self, radius: f64, ratio: f64) -> f64 {
        (radius / ratio) / (self.fov_y / 2.0).tan()
    }
}

/// Fraction of the remaining gap to close this frame, frame-rate independent.
/// `smoothing` is the fraction left after one 60 Hz frame; 0 snaps.
#[inline]
pub fn follow_factor(smoothing: f64, dt: f64) -> f64 {
    if smoothing <= 0.0 {
        1.0
    } else {
        1.0 - smoothing.powf(dt * 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(45.0_f64.to_radians(), 800.0, 600.0)
    }

    #[test]
    fn center_pixel_ray_is_forward() {
        let pose = CameraPose::new(DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO);
        let ray = camera().ray_through(&pose, 400.0, 300.0);
        assert!((ray.direction - DVec3::NEG_Z).length() < 1e-12);
        assert_eq!(ray.origin, pose.position);
    }

    #[test]
    fn top_edge_ray_matches_half_fov() {
        let cam = camera();
        let pose = CameraPose::new(DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO);
        let ray = cam.ray_through(&pose, 400.0, 0.0);
        let angle = ray.direction.angle_between(DVec3::NEG_Z);
        assert!((angle - cam.fov_y / 2.0).abs() < 1e-9);
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn straight_down_view_has_valid_ray() {
        let pose = CameraPose::new(DVec3::new(0.0, 50.0, 0.0), DVec3::ZERO);
        let ray = camera().ray_through(&pose, 10.0, 20.0);
        assert!(ray.direction.is_finite());
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sphere_hit_and_miss() {
        let ray = Ray { origin: DVec3::new(0.0, 0.0, 10.0), direction: DVec3::NEG_Z };
        let t = ray.intersect_sphere(DVec3::ZERO, 2.0).unwrap();
        assert!((t - 8.0).abs() < 1e-12);
        assert!(ray.intersect_sphere(DVec3::new(5.0, 0.0, 0.0), 2.0).is_none());
        // behind the camera
        assert!(ray.intersect_sphere(DVec3::new(0.0, 0.0, 20.0), 2.0).is_none());
        // camera inside the sphere
        assert_eq!(ray.intersect_sphere(DVec3::new(0.0, 0.0, 10.5), 2.0), Some(0.0));
    }

    #[test]
    fn framing_distance_formula() {
        let cam = camera();
        let d = cam.framing_distance(1.0, 0.5);
        assert!((d - 2.0 / (22.5_f64.to_radians()).tan()).abs() < 1e-12);
        // smaller ratio -> farther away
        assert!(cam.framing_distance(1.0, 0.1) > d);
    }

    #[test]
    fn follow_factor_snap_and_smooth() {
        assert_eq!(follow_factor(0.0, 0.016), 1.0);
        let f = follow_factor(0.9, 1.0 / 60.0);
        assert!((f - 0.1).abs() < 1e-9);
        // two half-steps close the same gap as one full step
        let half = follow_factor(0.9, 1.0 / 120.0);
        assert!(((1.0 - half) * (1.0 - half) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn resize_ignores_degenerate() {
        let mut cam = camera();
        cam.resize(0.0, 100.0);
        assert_eq!(cam.width, 800.0);
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect() - 1920.0 / 1080.0).abs() < 1e-12);
    }

    #[test]
    fn pose_helpers() {
        let a = CameraPose::new(DVec3::ZERO, DVec3::X);
        let b = a.translated(DVec3::new(0.0, 4.0, 0.0));
        assert!((a.distance_to(&b) - 4.0).abs() < 1e-12);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.position.y - 2.0).abs() < 1e-12);
    }
}
