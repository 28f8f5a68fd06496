pub mod error;
pub mod names;
pub mod node;
pub mod scene;
pub mod transform;

// Re-export main types for convenience
pub use error::SceneError;
pub use names::UniqueNameAllocator;
pub use node::{NodeId, NodeKind, SceneNode};
pub use scene::{InsertPosition, Scene, SceneSnapshot};
pub use transform::Transform;
