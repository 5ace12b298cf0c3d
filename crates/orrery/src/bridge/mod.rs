pub mod protocol;

pub use protocol::{BodyInstance, CameraRecord, EventRecord, FrameBuffer, FrameLayout, PROTOCOL_VERSION};
