use crate::api::types::{BodyId, BodyTransform, Diagnostics, OrreryEvent};
use crate::camera::{CameraPose, FocusController, FocusMode, FocusPolicy, FocusState, PerspectiveCamera};
use crate::components::body::{BodyDesc, BodyNode};
use crate::config::{ConfigError, OrreryConfig, SystemManifest};
use crate::core::hierarchy::BodySystem;
use crate::core::time::FrameClock;
use crate::data;
use crate::input::queue::{InputEvent, InputQueue};
use crate::input::selection::{resolve_pick, ClickTracker, SelectionEvent};

/// One running system: body hierarchy, camera authority and the input that
/// drives them, advanced one frame at a time by [`Orrery::tick`].
///
/// Input calls only queue; nothing moves until the next tick. A tick runs
/// input, then the hierarchy, then the camera, so the camera always works
/// from this frame's body positions.
pub struct Orrery {
    config: OrreryConfig,
    bodies: BodySystem,
    focus: FocusController,
    clicks: ClickTracker,
    input: InputQueue,
    clock: FrameClock,
    /// Simulated days since epoch.
    sim_days: f64,
    events: Vec<OrreryEvent>,
    diagnostics: Diagnostics,
}

impl Orrery {
    pub fn new(config: OrreryConfig, descs: &[BodyDesc]) -> Result<Self, ConfigError> {
        config.validate()?;
        let bodies = BodySystem::from_descs(descs, config.max_hierarchy_depth, config.seed)?;
        let camera = PerspectiveCamera::new(config.fov_y(), config.viewport_width, config.viewport_height);
        let focus = FocusController::overview(FocusPolicy::from_config(&config), camera, &bodies);

        log::info!(
            "orrery: {} bodies, max depth {}, time scale {} days/s",
            bodies.len(),
            bodies.max_depth(),
            config.time_scale
        );

        Ok(Self {
            clicks: ClickTracker::new(config.double_click_ms),
            clock: FrameClock::new(config.max_frame_dt),
            events: Vec::with_capacity(config.max_events),
            config,
            bodies,
            focus,
            input: InputQueue::new(),
            sim_days: 0.0,
            diagnostics: Diagnostics::default(),
        })
    }

    pub fn from_manifest(manifest: &SystemManifest) -> Result<Self, ConfigError> {
        Self::new(manifest.settings.clone(), &manifest.body_descs())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_manifest(&SystemManifest::from_json(json)?)
    }

    /// The built-in Sun, planets, moons and asteroid belt.
    pub fn solar_system() -> Result<Self, ConfigError> {
        Self::from_manifest(&data::solar_system())
    }

    // -- Input. Queued, applied at the start of the next tick. --

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Click or tap at viewport pixel `(x, y)`, origin top-left.
    pub fn pointer_click(&mut self, x: f64, y: f64) {
        self.push_input(InputEvent::PointerClick { x, y });
    }

    pub fn user_control_start(&mut self) {
        self.push_input(InputEvent::UserControlStart);
    }

    pub fn user_control_change(&mut self, pose: Option<CameraPose>) {
        self.push_input(InputEvent::UserControlChange { pose });
    }

    pub fn request_focus(&mut self, name: &str) {
        self.push_input(InputEvent::RequestFocus { name: name.to_string() });
    }

    pub fn request_reset(&mut self) {
        self.push_input(InputEvent::RequestReset);
    }

    /// Remove a body and everything orbiting it on the next tick. A camera
    /// focused on a removed body falls back to the overview in that tick.
    pub fn remove_body(&mut self, name: &str) {
        self.push_input(InputEvent::RemoveBody { name: name.to_string() });
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.push_input(InputEvent::SetAnimationEnabled(enabled));
    }

    /// Simulated days per real second. Negative runs backwards.
    pub fn set_time_scale(&mut self, days_per_second: f64) {
        self.push_input(InputEvent::SetTimeScale(days_per_second));
    }

    pub fn set_epoch_days(&mut self, days: f64) {
        self.push_input(InputEvent::SetEpochDays(days));
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.push_input(InputEvent::Resize { width, height });
    }

    /// Run one frame. `dt` is wall-clock seconds since the previous tick.
    pub fn tick(&mut self, dt: f64) {
        self.events.clear();
        let dt = self.clock.advance(dt);
        let now = self.clock.now_ms();

        for event in self.input.drain() {
            self.apply_input(event, now);
        }

        let delta_days = if self.config.animation_enabled {
            dt * self.config.time_scale
        } else {
            0.0
        };
        self.sim_days += delta_days;
        self.bodies.update(delta_days, self.config.animation_enabled);

        self.focus.update(&self.bodies, now, dt);
        for change in self.focus.drain_changes() {
            self.events.push(OrreryEvent::FocusChanged {
                from: change.from,
                to: change.to,
                target: change.target,
            });
        }

        self.diagnostics.kepler_non_converged = self.bodies.non_converged();
        self.diagnostics.ticks += 1;
        log::trace!(
            "tick {}: dt={dt:.4}s now={now:.1}ms days={:.3} focus={:?}",
            self.diagnostics.ticks,
            self.sim_days,
            self.focus.mode()
        );
    }

    fn apply_input(&mut self, event: InputEvent, now: f64) {
        match event {
            InputEvent::PointerClick { x, y } => {
                let pose = self.focus.pose();
                let Some(id) = resolve_pick(x, y, self.focus.camera(), &pose, &self.bodies) else {
                    return;
                };
                match self.clicks.register_click(id, now) {
                    SelectionEvent::Single => self.events.push(OrreryEvent::BodySelected(id)),
                    SelectionEvent::Double => {
                        self.events.push(OrreryEvent::BodyInfoRequested(id));
                        self.focus.request_focus(id, &self.bodies, now);
                    }
                }
            }
            InputEvent::UserControlStart => self.focus.user_control_start(now),
            InputEvent::UserControlChange { pose } => self.focus.user_control_change(pose, now),
            InputEvent::RequestFocus { name } => match self.bodies.id_of(&name) {
                Some(id) => {
                    self.focus.request_focus(id, &self.bodies, now);
                }
                None => {
                    log::warn!("focus request for unknown body {name:?} ignored");
                    self.diagnostics.ignored_requests += 1;
                }
            },
            InputEvent::RequestReset => self.focus.request_reset(&self.bodies, now),
            InputEvent::RemoveBody { name } => match self.bodies.remove(&name) {
                Some(removed) => log::debug!("removed {name:?} and {} dependents", removed.len() - 1),
                None => {
                    log::warn!("remove request for unknown body {name:?} ignored");
                    self.diagnostics.ignored_requests += 1;
                }
            },
            InputEvent::SetAnimationEnabled(enabled) => {
                log::debug!("animation {}", if enabled { "on" } else { "off" });
                self.config.animation_enabled = enabled;
            }
            InputEvent::SetTimeScale(scale) => {
                if scale.is_finite() {
                    self.config.time_scale = scale;
                } else {
                    log::warn!("non-finite time scale {scale} ignored");
                }
            }
            InputEvent::SetEpochDays(days) => {
                if days.is_finite() {
                    self.sim_days = days;
                    self.bodies.set_epoch_days(days);
                } else {
                    log::warn!("non-finite epoch {days} ignored");
                }
            }
            InputEvent::Resize { width, height } => {
                self.focus.resize(width, height);
                let camera = self.focus.camera();
                self.config.viewport_width = camera.width;
                self.config.viewport_height = camera.height;
            }
        }
    }

    // -- Queries --

    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.bodies.id_of(name)
    }

    pub fn body(&self, id: BodyId) -> Option<&BodyNode> {
        self.bodies.get(id)
    }

    /// Bodies in traversal order, parents first.
    pub fn bodies(&self) -> impl Iterator<Item = &BodyNode> + '_ {
        self.bodies.iter()
    }

    pub fn system(&self) -> &BodySystem {
        &self.bodies
    }

    /// Per-body renderer state for the current tick, in traversal order.
    pub fn transforms(&self) -> impl Iterator<Item = BodyTransform> + '_ {
        self.bodies.iter().map(|node| BodyTransform {
            id: node.id,
            position: node.world_position(),
            spin: node.state.spin,
            axial_tilt: node.axial_tilt,
            radius: node.radius,
        })
    }

    pub fn focus_state(&self) -> &FocusState {
        self.focus.state()
    }

    pub fn focus_mode(&self) -> FocusMode {
        self.focus.mode()
    }

    pub fn focused_body(&self) -> Option<BodyId> {
        self.focus.target()
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.focus.pose()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        self.focus.camera()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Events raised by the most recent tick.
    pub fn events(&self) -> &[OrreryEvent] {
        &self.events
    }

    pub fn sim_days(&self) -> f64 {
        self.sim_days
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn frame(&self) -> u64 {
        self.diagnostics.ticks
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn animation_enabled(&self) -> bool {
        self.config.animation_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::body::OrbitModel;
    use crate::orbit::{days_to_centuries, keplerian_position};
    use glam::DVec3;

    const DT: f64 = 1.0 / 60.0;

    fn solar() -> Orrery {
        Orrery::solar_system().unwrap()
    }

    /// Bodies hold still, so camera poses can be compared exactly.
    fn still_solar() -> Orrery {
        let mut manifest = data::solar_system();
        manifest.settings.animation_enabled = false;
        Orrery::from_manifest(&manifest).unwrap()
    }

    fn run(orrery: &mut Orrery, ticks: usize) {
        for _ in 0..ticks {
            orrery.tick(DT);
        }
    }

    fn focus_and_settle(orrery: &mut Orrery, name: &str) {
        orrery.request_focus(name);
        run(orrery, 120);
        assert_eq!(orrery.focus_mode(), FocusMode::Following);
        assert_eq!(orrery.focused_body(), orrery.body_id(name));
    }

    fn center(orrery: &Orrery) -> (f64, f64) {
        (orrery.camera().width / 2.0, orrery.camera().height / 2.0)
    }

    #[test]
    fn starts_in_overview() {
        let mut orrery = solar();
        orrery.tick(DT);
        assert_eq!(orrery.focus_mode(), FocusMode::Overview);
        assert_eq!(orrery.camera_pose().look_at, DVec3::ZERO);
        assert!(orrery.events().is_empty());
    }

    #[test]
    fn second_focus_request_replaces_the_first_without_a_jump() {
        let mut orrery = still_solar();
        let mars = orrery.body_id("Mars").unwrap();
        let venus = orrery.body_id("Venus").unwrap();

        orrery.request_focus("Mars");
        run(&mut orrery, 10);
        let mid_flight = orrery.camera_pose();

        orrery.request_focus("Venus");
        orrery.tick(DT);
        assert!(matches!(
            orrery.focus_state(),
            FocusState::Transitioning { target: Some(t), .. } if *t == venus
        ));
        // picks up from where the Mars flight was, not from its end pose
        assert!(orrery.camera_pose().distance_to(&mid_flight) < 1.0);
        assert!(orrery.events().iter().any(|e| matches!(
            e,
            OrreryEvent::FocusChanged { to: FocusMode::Transitioning, target: Some(t), .. } if *t == venus
        )));

        run(&mut orrery, 120);
        assert_eq!(orrery.focused_body(), Some(venus));
        let venus_at = orrery.body(venus).unwrap().world_position();
        let mars_at = orrery.body(mars).unwrap().world_position();
        assert!(orrery.camera_pose().look_at.distance(venus_at) < 1e-6);
        assert!(orrery.camera_pose().look_at.distance(mars_at) > 1.0);
    }

    #[test]
    fn user_control_holds_the_camera_until_idle() {
        let mut orrery = still_solar();
        focus_and_settle(&mut orrery, "Earth");
        let earth = orrery.body_id("Earth").unwrap();

        let ideal = orrery.camera_pose();
        let dragged = ideal.translated(DVec3::new(40.0, 10.0, 0.0));
        orrery.user_control_start();
        orrery.user_control_change(Some(dragged));
        orrery.tick(DT);
        assert_eq!(orrery.focus_mode(), FocusMode::UserOverride);

        for _ in 0..290 {
            orrery.tick(DT);
            assert_eq!(orrery.camera_pose(), dragged);
        }

        run(&mut orrery, 20);
        assert_eq!(orrery.focus_mode(), FocusMode::Following);
        assert_eq!(orrery.focused_body(), Some(earth));
        assert!(orrery.camera_pose().distance_to(&ideal) < dragged.distance_to(&ideal));

        run(&mut orrery, 300);
        assert!(orrery.camera_pose().distance_to(&ideal) < 1e-3);
    }

    #[test]
    fn double_click_on_the_sun_requests_info_and_focus() {
        let mut orrery = still_solar();
        let sun = orrery.body_id("Sun").unwrap();
        let (x, y) = center(&orrery);

        orrery.pointer_click(x, y);
        orrery.tick(DT);
        assert_eq!(orrery.events(), &[OrreryEvent::BodySelected(sun)]);

        orrery.pointer_click(x, y);
        orrery.tick(DT);
        assert!(orrery.events().contains(&OrreryEvent::BodyInfoRequested(sun)));
        assert_eq!(orrery.focus_mode(), FocusMode::Transitioning);
        assert_eq!(orrery.focused_body(), Some(sun));
    }

    #[test]
    fn slow_clicks_stay_single() {
        let mut orrery = still_solar();
        let sun = orrery.body_id("Sun").unwrap();
        let (x, y) = center(&orrery);

        orrery.pointer_click(x, y);
        orrery.tick(DT);
        run(&mut orrery, 30);
        orrery.pointer_click(x, y);
        orrery.tick(DT);
        assert_eq!(orrery.events(), &[OrreryEvent::BodySelected(sun)]);
        assert_eq!(orrery.focus_mode(), FocusMode::Overview);
    }

    #[test]
    fn click_on_empty_space_does_nothing() {
        let mut orrery = still_solar();
        orrery.pointer_click(0.0, 0.0);
        orrery.tick(DT);
        assert!(orrery.events().is_empty());
        assert_eq!(orrery.focus_mode(), FocusMode::Overview);
    }

    #[test]
    fn unknown_focus_name_is_counted_and_ignored() {
        let mut orrery = solar();
        orrery.request_focus("Vulcan");
        orrery.tick(DT);
        assert_eq!(orrery.focus_mode(), FocusMode::Overview);
        assert_eq!(orrery.diagnostics().ignored_requests, 1);
        assert!(orrery.events().is_empty());
    }

    #[test]
    fn paused_animation_freezes_every_body() {
        let mut orrery = solar();
        orrery.tick(DT);
        orrery.set_animation_enabled(false);
        orrery.tick(DT);
        let before: Vec<_> = orrery.transforms().collect();
        let days = orrery.sim_days();

        run(&mut orrery, 60);
        let after: Vec<_> = orrery.transforms().collect();
        assert_eq!(before, after);
        assert_eq!(orrery.sim_days(), days);

        orrery.set_animation_enabled(true);
        orrery.tick(DT);
        assert!(orrery.sim_days() > days);
        let earth = orrery.body_id("Earth").unwrap();
        let moved = orrery.transforms().find(|t| t.id == earth).unwrap();
        let held = before.iter().find(|t| t.id == earth).unwrap();
        assert_ne!(moved.position, held.position);
    }

    #[test]
    fn time_scale_drives_the_simulated_clock() {
        let mut orrery = solar();
        orrery.tick(DT);
        let earth = orrery.body_id("Earth").unwrap();
        let start_days = orrery.sim_days();

        orrery.set_time_scale(365.25);
        run(&mut orrery, 60);
        let elapsed = orrery.sim_days() - start_days;
        assert!((elapsed - 365.25).abs() < 1e-6);

        orrery.set_time_scale(-10.0);
        orrery.tick(DT);
        assert!(orrery.sim_days() < start_days + elapsed);
        assert!(orrery.body(earth).unwrap().world_position().is_finite());
    }

    #[test]
    fn epoch_jump_places_planets_at_that_date() {
        let mut orrery = still_solar();
        orrery.set_epoch_days(1000.0);
        orrery.tick(DT);
        assert_eq!(orrery.sim_days(), 1000.0);

        let earth = orrery.system().get_by_name("Earth").unwrap();
        let OrbitModel::Keplerian(elements) = earth.orbit else {
            panic!("Earth should be Keplerian");
        };
        let (expected, _) = keplerian_position(&elements, days_to_centuries(1000.0));
        assert!(earth.world_position().distance(expected) < 1e-9);
    }

    #[test]
    fn removing_the_followed_body_falls_back_in_place() {
        let mut orrery = still_solar();
        focus_and_settle(&mut orrery, "Earth");
        let pose = orrery.camera_pose();

        orrery.remove_body("Earth");
        // queued until the next tick
        assert!(orrery.body_id("Earth").is_some());
        assert_eq!(orrery.focus_mode(), FocusMode::Following);
        orrery.tick(DT);

        assert!(orrery.body_id("Earth").is_none());
        assert!(orrery.body_id("Moon").is_none());
        assert_eq!(orrery.focus_mode(), FocusMode::Overview);
        assert_eq!(orrery.camera_pose(), pose);
        assert!(orrery.events().iter().any(|e| matches!(
            e,
            OrreryEvent::FocusChanged { to: FocusMode::Overview, .. }
        )));
        assert_eq!(orrery.diagnostics().ignored_requests, 0);

        orrery.remove_body("Earth");
        orrery.tick(DT);
        assert_eq!(orrery.diagnostics().ignored_requests, 1);
    }

    #[test]
    fn failed_kepler_solves_reach_the_diagnostics() {
        let mut orrery = solar();
        let mars = orrery.body_id("Mars").unwrap();
        let node = orrery.bodies.get_mut(mars).unwrap();
        if let OrbitModel::Keplerian(el) = &mut node.orbit {
            el.mean_longitude = f64::NAN;
        }

        run(&mut orrery, 3);
        assert_eq!(orrery.diagnostics().kepler_non_converged, 3);
        assert_eq!(orrery.frame(), 3);
        assert!(orrery.transforms().all(|t| t.position.is_finite()));
    }

    #[test]
    fn moon_keeps_its_orbit_around_a_moving_earth() {
        let mut orrery = solar();
        let earth = orrery.body_id("Earth").unwrap();
        let moon = orrery.body_id("Moon").unwrap();
        orrery.set_time_scale(30.0);

        for _ in 0..240 {
            orrery.tick(DT);
            let e = orrery.body(earth).unwrap().world_position();
            let m = orrery.body(moon).unwrap().world_position();
            assert!(((m - e).length() - 5.0).abs() < 1e-9);
        }
        assert!(orrery.transforms().all(|t| t.position.is_finite() && t.spin.is_finite()));
        assert_eq!(orrery.diagnostics().kepler_non_converged, 0);
        assert_eq!(orrery.frame(), 240);
    }

    #[test]
    fn reset_returns_to_the_overview() {
        let mut orrery = still_solar();
        let overview = orrery.camera_pose();
        focus_and_settle(&mut orrery, "Jupiter");

        orrery.request_reset();
        run(&mut orrery, 120);
        assert_eq!(orrery.focus_mode(), FocusMode::Overview);
        assert!(orrery.camera_pose().distance_to(&overview) < 1e-6);
    }

    #[test]
    fn resize_updates_the_pick_camera() {
        let mut orrery = solar();
        orrery.resize(800.0, 800.0);
        orrery.tick(DT);
        assert_eq!(orrery.camera().aspect(), 1.0);
        assert_eq!(orrery.config().viewport_width, 800.0);
    }

    #[test]
    fn small_manifest_from_json() {
        let json = r#"{
            "settings": { "seed": 7 },
            "bodies": [
                { "name": "Star", "radius": 4.0 },
                { "name": "Rock", "parent": "Star", "radius": 1.0,
                  "orbit": { "kind": "circular", "radius": 30.0, "period_days": 10.0 } }
            ]
        }"#;
        let mut orrery = Orrery::from_json(json).unwrap();
        orrery.tick(DT);
        let rock = orrery.body_id("Rock").unwrap();
        assert!((orrery.body(rock).unwrap().world_position().length() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn bad_json_is_a_construction_error() {
        assert!(matches!(Orrery::from_json("{ not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            Orrery::from_json(r#"{ "bodies": [] }"#),
            Err(ConfigError::EmptySystem)
        ));
    }
}
