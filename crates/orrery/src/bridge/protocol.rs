//! Per-tick frame buffer shared with the renderer.
//! Must stay in sync with the renderer's `protocol.ts`.
//!
//! Layout (all values f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Camera: 8 floats]
//! [Bodies: max_bodies × 8 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities go into the header on every write, so the renderer can compute
//! offsets from the buffer alone. Body and event references on the wire are
//! `BodyId` values; "no body" is encoded by storing `id + 1` with 0 as none.

use bytemuck::{Pod, Zeroable};

use crate::api::orrery::Orrery;
use crate::api::types::{BodyId, OrreryEvent};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_BODIES: usize = 2;
pub const HEADER_BODY_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_SIM_DAYS: usize = 6;
pub const HEADER_FOCUS_MODE: usize = 7;
/// Focused body id + 1, 0 = none.
pub const HEADER_FOCUS_TARGET: usize = 8;
pub const HEADER_VIEWPORT_WIDTH: usize = 9;
pub const HEADER_VIEWPORT_HEIGHT: usize = 10;
pub const HEADER_ANIMATION_ENABLED: usize = 11;
pub const HEADER_TIME_SCALE: usize = 12;
pub const HEADER_KEPLER_NON_CONVERGED: usize = 13;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Camera: position xyz, look-at xyz, vertical fov (radians), pad.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraRecord {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub fov_y: f32,
    pub _pad: f32,
}

impl CameraRecord {
    pub const FLOATS: usize = 8;
}

/// One body per tick, in traversal order.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Spin angle (radians) about the tilted axis.
    pub spin: f32,
    pub radius: f32,
    /// Axial tilt (radians).
    pub axial_tilt: f32,
    /// `BodyId` of this body.
    pub id: f32,
    /// Parent `BodyId` + 1, 0 for roots.
    pub parent: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Event: kind plus three arguments.
///
/// | kind | a | b | c |
/// |------|---|---|---|
/// | `BODY_SELECTED` | body id | | |
/// | `BODY_INFO_REQUESTED` | body id | | |
/// | `FOCUS_CHANGED` | from mode | to mode | target id + 1 |
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;
}

fn id_plus_one(id: Option<BodyId>) -> f32 {
    id.map_or(0.0, |id| id.0 as f32 + 1.0)
}

impl From<&OrreryEvent> for EventRecord {
    fn from(event: &OrreryEvent) -> Self {
        let kind = event.kind() as f32;
        match *event {
            OrreryEvent::BodySelected(id) | OrreryEvent::BodyInfoRequested(id) => {
                Self { kind, a: id.0 as f32, b: 0.0, c: 0.0 }
            }
            OrreryEvent::FocusChanged { from, to, target } => Self {
                kind,
                a: from.code() as f32,
                b: to.code() as f32,
                c: id_plus_one(target),
            },
        }
    }
}

/// Section sizes and offsets for a given capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub max_bodies: usize,
    pub max_events: usize,

    pub camera_offset: usize,
    pub body_data_offset: usize,
    pub body_data_floats: usize,
    pub event_data_offset: usize,
    pub event_data_floats: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl FrameLayout {
    pub fn new(max_bodies: usize, max_events: usize) -> Self {
        let camera_offset = HEADER_FLOATS;
        let body_data_offset = camera_offset + CameraRecord::FLOATS;
        let body_data_floats = max_bodies * BodyInstance::FLOATS;
        let event_data_offset = body_data_offset + body_data_floats;
        let event_data_floats = max_events * EventRecord::FLOATS;
        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_bodies,
            max_events,
            camera_offset,
            body_data_offset,
            body_data_floats,
            event_data_offset,
            event_data_floats,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Capacity for everything `orrery` can hold. Bodies are only ever
    /// removed, so the current count is the maximum.
    pub fn for_orrery(orrery: &Orrery) -> Self {
        Self::new(orrery.system().len(), orrery.config().max_events)
    }
}

/// Flat f32 buffer rewritten once per tick.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    layout: FrameLayout,
    data: Vec<f32>,
    bodies: Vec<BodyInstance>,
    events: Vec<EventRecord>,
}

impl FrameBuffer {
    pub fn new(layout: FrameLayout) -> Self {
        Self {
            data: vec![0.0; layout.buffer_total_floats],
            bodies: Vec::with_capacity(layout.max_bodies),
            events: Vec::with_capacity(layout.max_events),
            layout,
        }
    }

    pub fn for_orrery(orrery: &Orrery) -> Self {
        Self::new(FrameLayout::for_orrery(orrery))
    }

    /// Pack the state after the most recent tick.
    pub fn write(&mut self, orrery: &Orrery) {
        self.bodies.clear();
        self.bodies.extend(
            orrery
                .bodies()
                .take(self.layout.max_bodies)
                .map(|node| {
                    let p = node.world_position().as_vec3();
                    BodyInstance {
                        x: p.x,
                        y: p.y,
                        z: p.z,
                        spin: node.state.spin as f32,
                        radius: node.radius as f32,
                        axial_tilt: node.axial_tilt as f32,
                        id: node.id.0 as f32,
                        parent: id_plus_one(node.parent),
                    }
                }),
        );

        let events = orrery.events();
        if events.len() > self.layout.max_events {
            log::warn!(
                "{} events this tick, buffer holds {}; dropping the rest",
                events.len(),
                self.layout.max_events
            );
        }
        self.events.clear();
        self.events
            .extend(events.iter().take(self.layout.max_events).map(EventRecord::from));

        let pose = orrery.camera_pose();
        let camera = CameraRecord {
            position: pose.position.as_vec3().to_array(),
            look_at: pose.look_at.as_vec3().to_array(),
            fov_y: orrery.camera().fov_y as f32,
            _pad: 0.0,
        };

        let header = &mut self.data[..HEADER_FLOATS];
        header.fill(0.0);
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = orrery.frame() as f32;
        header[HEADER_MAX_BODIES] = self.layout.max_bodies as f32;
        header[HEADER_BODY_COUNT] = self.bodies.len() as f32;
        header[HEADER_MAX_EVENTS] = self.layout.max_events as f32;
        header[HEADER_EVENT_COUNT] = self.events.len() as f32;
        header[HEADER_SIM_DAYS] = orrery.sim_days() as f32;
        header[HEADER_FOCUS_MODE] = orrery.focus_mode().code() as f32;
        header[HEADER_FOCUS_TARGET] = id_plus_one(orrery.focused_body());
        header[HEADER_VIEWPORT_WIDTH] = orrery.camera().width as f32;
        header[HEADER_VIEWPORT_HEIGHT] = orrery.camera().height as f32;
        header[HEADER_ANIMATION_ENABLED] = if orrery.animation_enabled() { 1.0 } else { 0.0 };
        header[HEADER_TIME_SCALE] = orrery.config().time_scale as f32;
        header[HEADER_KEPLER_NON_CONVERGED] = orrery.diagnostics().kepler_non_converged as f32;

        let camera_end = self.layout.camera_offset + CameraRecord::FLOATS;
        self.data[self.layout.camera_offset..camera_end].copy_from_slice(bytemuck::cast_slice(&[camera]));

        let body_start = self.layout.body_data_offset;
        let body_floats: &[f32] = bytemuck::cast_slice(&self.bodies);
        self.data[body_start..body_start + body_floats.len()].copy_from_slice(body_floats);

        let event_start = self.layout.event_data_offset;
        let event_floats: &[f32] = bytemuck::cast_slice(&self.events);
        self.data[event_start..event_start + event_floats.len()].copy_from_slice(event_floats);
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn body_count(&self) -> u32 {
        self.bodies.len() as u32
    }

    pub fn event_count(&self) -> u32 {
        self.events.len() as u32
    }

    /// Raw pointer to the buffer for zero-copy reads from wasm memory.
    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len_floats(&self) -> u32 {
        self.data.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FocusMode;
    use crate::components::body::BodyDesc;
    use crate::config::OrreryConfig;
    use crate::orbit::CircularOrbit;

    fn tiny() -> Orrery {
        let descs = vec![
            BodyDesc::star("Star", 4.0),
            BodyDesc::circular("Rock", 1.0, CircularOrbit::new(30.0, 0.0)).orbiting("Star").with_phase(0.0),
        ];
        Orrery::new(OrreryConfig::default(), &descs).unwrap()
    }

    #[test]
    fn records_are_wire_sized() {
        assert_eq!(std::mem::size_of::<CameraRecord>(), CameraRecord::FLOATS * 4);
        assert_eq!(std::mem::size_of::<BodyInstance>(), BodyInstance::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<EventRecord>(), EventRecord::FLOATS * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = FrameLayout::new(70, 32);
        assert_eq!(layout.camera_offset, HEADER_FLOATS);
        assert_eq!(layout.body_data_offset, HEADER_FLOATS + 8);
        assert_eq!(layout.event_data_offset, layout.body_data_offset + 70 * 8);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn write_packs_header_camera_and_bodies() {
        let mut orrery = tiny();
        orrery.tick(1.0 / 60.0);
        let mut buffer = FrameBuffer::for_orrery(&orrery);
        buffer.write(&orrery);

        let data = buffer.as_slice();
        assert_eq!(data.len(), buffer.layout().buffer_total_floats);
        assert_eq!(data[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(data[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(data[HEADER_BODY_COUNT], 2.0);
        assert_eq!(data[HEADER_FOCUS_MODE], FocusMode::Overview.code() as f32);
        assert_eq!(data[HEADER_FOCUS_TARGET], 0.0);

        let camera = &data[buffer.layout().camera_offset..];
        assert_eq!(camera[3..6], [0.0, 0.0, 0.0]);

        let rock = &data[buffer.layout().body_data_offset + BodyInstance::FLOATS..];
        assert!((rock[0] - 30.0).abs() < 1e-4);
        assert_eq!(rock[4], 1.0);
        assert_eq!(rock[6], 1.0); // id
        assert_eq!(rock[7], 1.0); // parent Star (id 0) + 1
    }

    #[test]
    fn focus_events_reach_the_buffer() {
        let mut orrery = tiny();
        orrery.request_focus("Rock");
        orrery.tick(1.0 / 60.0);
        let mut buffer = FrameBuffer::for_orrery(&orrery);
        buffer.write(&orrery);

        let data = buffer.as_slice();
        assert_eq!(data[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(data[HEADER_FOCUS_TARGET], 2.0);
        let event = &data[buffer.layout().event_data_offset..][..EventRecord::FLOATS];
        assert_eq!(
            event,
            [
                OrreryEvent::FOCUS_CHANGED as f32,
                FocusMode::Overview.code() as f32,
                FocusMode::Transitioning.code() as f32,
                2.0,
            ]
        );
    }

    #[test]
    fn removed_bodies_shrink_the_count() {
        let mut orrery = tiny();
        let mut buffer = FrameBuffer::for_orrery(&orrery);
        orrery.remove_body("Rock");
        orrery.tick(1.0 / 60.0);
        buffer.write(&orrery);
        assert_eq!(buffer.body_count(), 1);
        assert_eq!(buffer.as_slice()[HEADER_MAX_BODIES], 2.0);
    }
}
