pub mod hierarchy;
pub mod rng;
pub mod time;

pub use hierarchy::BodySystem;
pub use rng::Rng;
pub use time::FrameClock;
