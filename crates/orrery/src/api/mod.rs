pub mod orrery;
pub mod types;

pub use orrery::Orrery;
pub use types::{BodyId, BodyTransform, Diagnostics, OrreryEvent};
