pub mod queue;
pub mod selection;

pub use queue::{InputEvent, InputQueue};
pub use selection::{resolve_pick, ClickTracker, SelectionEvent};
