//! Construction-time configuration: global settings, the body table, and the
//! errors raised while validating them.

mod error;
mod manifest;
mod settings;

pub use error::ConfigError;
pub use manifest::{BodyEntry, OrbitEntry, RateEntry, SystemManifest};
pub use settings::OrreryConfig;
