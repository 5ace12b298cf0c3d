use crate::camera::CameraPose;

/// Input the host hands to the core between ticks. Applied in arrival order at
/// the start of the next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Click/tap at viewport pixel (x, y), origin top-left.
    PointerClick { x: f64, y: f64 },
    /// The user grabbed the camera (drag start, wheel, pan).
    UserControlStart,
    /// The user's controls moved the camera. `None` when the host only
    /// reports activity and keeps the pose to itself.
    UserControlChange { pose: Option<CameraPose> },
    RequestFocus { name: String },
    RequestReset,
    /// Drop a body and everything orbiting it.
    RemoveBody { name: String },
    SetAnimationEnabled(bool),
    /// Simulated days per real second.
    SetTimeScale(f64),
    /// Jump the simulated clock to an absolute epoch.
    SetEpochDays(f64),
    Resize { width: f64, height: f64 },
}

/// Pending input events. The host pushes, the tick drains.
#[derive(Debug)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every pending event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
