pub mod body;

pub use body::{BodyDesc, BodyNode, OrbitModel, OrbitState};
