//! Physics module for collision import and export
//!
//! Converts Havok collision objects into editable scene shapes and rebuilds
//! them from the edited scene.

pub mod collision;
pub mod collision_layers;
pub mod collision_system;
pub mod rigid_body;
pub mod transform;

pub use collision::{MeshGeometry, ShapeCodec};
pub use collision_layers::CollisionFilter;
pub use collision_system::CollisionGraphWalker;
pub use rigid_body::RigidBodyTranslator;
pub use transform::TransformComposer;
