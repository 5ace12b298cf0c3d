//! Camera pose and the focus state machine that decides who drives it.

pub mod easing;
pub mod focus;
pub mod pose;
pub mod transition;

pub use easing::Easing;
pub use focus::{FocusChange, FocusController, FocusMode, FocusPolicy, FocusState};
pub use pose::{follow_factor, CameraPose, PerspectiveCamera, Ray};
pub use transition::CameraTransition;
