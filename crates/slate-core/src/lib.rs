pub mod config;
pub mod id;
pub mod model;
pub mod persist;
pub mod store;
pub mod transform;

pub use config::{CanvasConfig, ConfigError};
pub use id::NodeId;
pub use model::*;
pub use persist::{CanvasLibrary, CanvasRecord, CanvasStore, MemoryStore, PersistError};
pub use store::{Store, SubscriptionId, Topic};
pub use transform::{ViewTransform, rects_overlap};

// Re-export kurbo geometry so downstream crates share one version.
pub use kurbo::{Point, Rect, Size, Vec2};
