pub mod hit;
pub mod paint;
pub mod surface;
pub mod target;

pub use paint::{PaintStats, Painter};
pub use surface::{Cursor, MemorySurface, Placement, Surface};
pub use target::{ElementInfo, NodePart, PointerTarget, classify, is_text_editing};
