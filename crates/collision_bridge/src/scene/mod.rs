//! Editable scene boundary
//!
//! Collision shapes become ordinary scene objects on import: a mesh with a
//! world matrix, a few annotations and a constraint pointing at the node or
//! bone it follows. The shape is never parented to its target; it keeps an
//! independent transform and only tracks the target.
//!
//! ## Architecture
//!
//! ```text
//! CollisionGraphWalker
//!      ↓
//! SceneAdapter (trait)
//!      ↓
//! Host scene / MemoryScene
//! ```

mod adapter;
mod memory_scene;

pub use adapter::{keys, AnnotationValue, CollisionTarget, MeshKind, SceneAdapter, SceneNodeId};
pub use memory_scene::{Bone, MemoryScene, SceneNode};
