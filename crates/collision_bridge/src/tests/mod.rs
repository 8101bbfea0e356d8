//! Pipeline tests running collision objects through a [`MemoryScene`]
//!
//! [`MemoryScene`]: crate::scene::MemoryScene

mod pipeline;

use crate::asset::{BodyKind, CollisionBody, CollisionObject, CollisionShapeNode, ShapeGeometry};
use crate::foundation::math::Vec3;
use crate::scene::CollisionTarget;

/// Body with mass around `geometry`, Skyrim stone material
fn body_object(target: CollisionTarget, geometry: ShapeGeometry) -> CollisionObject {
    let shape = CollisionShapeNode::new(3_741_512_247, 0.1, geometry);
    let mut body = CollisionBody::new(BodyKind::Plain, shape);
    body.mass = 25.0;
    CollisionObject::new(target, body)
}

/// Every point of `a` has a counterpart in `b` and the counts match
fn same_point_set(a: &[Vec3], b: &[Vec3], epsilon: f32) -> bool {
    a.len() == b.len() && a.iter().all(|p| b.iter().any(|q| (p - q).norm() < epsilon))
}
