//! Built-in system data.

pub mod solar;

pub use solar::solar_system;
