use orrery::{BodyId, CameraPose, ConfigError, FrameBuffer, InputEvent, Orrery};

/// Owns one [`Orrery`] and the frame buffer the renderer reads after each tick.
///
/// `lib.rs` keeps a single runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// methods on a struct that lives behind a `RefCell`.
pub struct OrreryRunner {
    orrery: Orrery,
    buffer: FrameBuffer,
}

impl OrreryRunner {
    pub fn new(orrery: Orrery) -> Self {
        let buffer = FrameBuffer::for_orrery(&orrery);
        let mut runner = Self { orrery, buffer };
        runner.buffer.write(&runner.orrery);
        runner
    }

    /// Built from a manifest JSON string; an empty string loads the built-in
    /// solar system.
    pub fn from_json(manifest_json: &str) -> Result<Self, ConfigError> {
        let orrery = if manifest_json.trim().is_empty() {
            Orrery::solar_system()?
        } else {
            Orrery::from_json(manifest_json)?
        };
        Ok(Self::new(orrery))
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.orrery.push_input(event);
    }

    /// Run one frame and repack the buffer.
    pub fn tick(&mut self, dt: f64) {
        self.orrery.tick(dt);
        self.buffer.write(&self.orrery);
    }

    pub fn user_control_change(&mut self, position: [f64; 3], look_at: [f64; 3]) {
        let pose = CameraPose::new(position.into(), look_at.into());
        self.push_input(InputEvent::UserControlChange { pose: Some(pose) });
    }

    pub fn body_name(&self, id: u32) -> Option<String> {
        self.orrery.body(BodyId(id)).map(|node| node.name.clone())
    }

    /// Names in traversal order, matching the body section of the buffer.
    pub fn body_names(&self) -> Vec<String> {
        self.orrery.bodies().map(|node| node.name.clone()).collect()
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    // ---- Pointer accessors for zero-copy reads from wasm memory ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.ptr()
    }

    pub fn buffer_len(&self) -> u32 {
        self.buffer.len_floats()
    }

    pub fn body_count(&self) -> u32 {
        self.buffer.body_count()
    }

    pub fn event_count(&self) -> u32 {
        self.buffer.event_count()
    }

    pub fn body_data_offset(&self) -> u32 {
        self.buffer.layout().body_data_offset as u32
    }

    pub fn event_data_offset(&self) -> u32 {
        self.buffer.layout().event_data_offset as u32
    }
}
