//! # Collision Bridge
//!
//! Converts Havok collision data embedded in game assets into editable scene
//! shapes, and rebuilds the collision data from the edited scene.
//!
//! ## Features
//!
//! - **Shape Variants**: Box, capsule, sphere, convex hull, list and transform wrappers
//! - **Unit Conversion**: Per-game collision scale between engine and scene units
//! - **Inverse Geometry**: Recovers box and capsule parameters from edited meshes
//! - **Body Properties**: Mass, damping, filters and Havok enums as scene annotations
//! - **In-Memory Scene**: A complete scene adapter for batch tools and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collision_bridge::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     collision_bridge::foundation::logging::init();
//!
//!     let config = BridgeConfig::default();
//!     let walker = CollisionGraphWalker::new(&config, GameProfile::Skyrim)?;
//!
//!     let mut scene = MemoryScene::new();
//!     let chair = scene.add_node("Chair", Mat4::identity());
//!
//!     let shape = CollisionShapeNode::new(0, 0.1, ShapeGeometry::Box { half_extents: Vec3::new(2.0, 2.0, 4.0) });
//!     let mut body = CollisionBody::new(BodyKind::Plain, shape);
//!     body.mass = 10.0;
//!     let object = CollisionObject::new(CollisionTarget::Node(chair), body);
//!
//!     walker.decode(&mut scene, &object)?;
//!     let exported = walker.encode(&scene, &CollisionTarget::Node(chair))?;
//!     println!("{:?}", exported.map(|o| o.body.shape));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod asset;
pub mod config;
pub mod error;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod units;

#[cfg(test)]
mod tests;

pub use error::{BridgeError, BridgeResult};

/// Common imports for bridge users
pub mod prelude {
    pub use crate::{
        asset::{
            BodyKind, CollisionBody, CollisionObject, CollisionObjectFlags, CollisionShapeNode, ShapeGeometry,
            ShapeKind, ShapeTransform, TransformWrapper,
        },
        config::{BridgeConfig, Config},
        error::{BridgeError, BridgeResult},
        foundation::math::{Mat4, Quat, Vec3, Vec4},
        physics::{CollisionGraphWalker, MeshGeometry, ShapeCodec},
        scene::{AnnotationValue, CollisionTarget, MemoryScene, MeshKind, SceneAdapter, SceneNodeId},
        units::{GameProfile, UnitConverter},
    };
}
