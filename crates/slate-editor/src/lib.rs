pub mod animation;
pub mod factory;
pub mod input;
pub mod selection;
pub mod shortcuts;
pub mod sync;
pub mod tools;
pub mod viewport;
pub mod workspace;

pub use animation::{CameraAnimator, ease_out_cubic};
pub use factory::{ContentRenderer, RendererRegistry, SelectCallback, create_node};
pub use input::{InputEvent, Modifiers, PointerButton, Touches};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use sync::{ZoomSync, ZoomTransform};
pub use tools::{Gesture, ResizeState};
pub use workspace::{Outcome, Workspace};
