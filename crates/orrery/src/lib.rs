pub mod api;
pub mod bridge;
pub mod camera;
pub mod components;
pub mod config;
pub mod core;
pub mod data;
pub mod input;
pub mod orbit;

// Re-export key types at crate root for convenience
pub use api::orrery::Orrery;
pub use api::types::{BodyId, BodyTransform, Diagnostics, OrreryEvent};
pub use bridge::protocol::{BodyInstance, CameraRecord, EventRecord, FrameBuffer, FrameLayout};
pub use camera::{CameraPose, CameraTransition, Easing, FocusController, FocusMode, FocusState, PerspectiveCamera};
pub use components::body::{BodyDesc, BodyNode, OrbitModel};
pub use config::{ConfigError, OrreryConfig, SystemManifest};
pub use core::hierarchy::BodySystem;
pub use core::time::FrameClock;
pub use input::queue::{InputEvent, InputQueue};
pub use input::selection::{ClickTracker, SelectionEvent};
pub use orbit::{CircularOrbit, KeplerSolution, OrbitalElements, SecularRates};
