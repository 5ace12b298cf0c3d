/// Monotonic tick clock.
///
/// The host hands in a wall-clock `dt` per frame; every timeout in the core
/// (double click, user idle, transitions) compares against `now_ms`. Long
/// stalls are clamped to `max_dt` so a backgrounded tab doesn't fast-forward
/// the simulation on return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    now_ms: f64,
    max_dt: f64,
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self { now_ms: 0.0, max_dt }
    }

    /// Advance by `frame_dt` seconds. Returns the clamped step in seconds.
    /// Negative or non-finite steps count as zero.
    pub fn advance(&mut self, frame_dt: f64) -> f64 {
        let dt = if frame_dt.is_finite() && frame_dt > 0.0 {
            frame_dt.min(self.max_dt)
        } else {
            0.0
        };
        self.now_ms += dt * 1000.0;
        dt
    }

    /// Milliseconds since construction.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn max_dt(&self) -> f64 {
        self.max_dt
    }
}
