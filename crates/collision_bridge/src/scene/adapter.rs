//! Scene adapter trait
//!
//! The boundary to the editable scene. The bridge never owns scene objects;
//! it creates them, places them and tags them through this trait.

use crate::foundation::collections::new_key_type;
use crate::foundation::math::Mat4;
use crate::physics::collision::MeshGeometry;

new_key_type! {
    /// Handle to a scene object
    pub struct SceneNodeId;
}

/// What a scene object represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Box collision mesh
    Box,
    /// Capsule collision mesh
    Capsule,
    /// Sphere collision mesh
    Sphere,
    /// Convex hull collision mesh
    ConvexHull,
    /// Non-geometric group holding list children
    Group,
}

/// The object a collision body follows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollisionTarget {
    /// A mesh or empty node
    Node(SceneNodeId),
    /// A bone of an armature
    Bone {
        /// Armature node owning the bone
        armature: SceneNodeId,
        /// Bone name
        bone: String,
    },
}

/// Value stored under an annotation key
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// Scalar
    Float(f32),
    /// Raw integer (enum values with no known name)
    Int(i64),
    /// Symbolic name
    Text(String),
}

impl AnnotationValue {
    /// Float value, converting integers
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f32),
            Self::Text(_) => None,
        }
    }

    /// Integer value
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f32> for AnnotationValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Annotation keys written on collision shapes
pub mod keys {
    /// Physics material name or raw id
    pub const MATERIAL: &str = "material";
    /// Contact radius in asset units
    pub const MARGIN: &str = "margin";
    /// Sphere / capsule radius override in scene units
    pub const RADIUS: &str = "radius";
    /// Body kind block name, only present when not `bhkRigidBody`
    pub const BODY_KIND: &str = "body_kind";
    /// Collision object block name
    pub const COLLISION_OBJECT: &str = "collision_object";
    /// Collision object flag bits
    pub const OBJECT_FLAGS: &str = "object_flags";
    /// Body mass
    pub const MASS: &str = "mass";
    /// Body friction
    pub const FRICTION: &str = "friction";
    /// Body restitution
    pub const RESTITUTION: &str = "restitution";
    /// Linear damping
    pub const LINEAR_DAMPING: &str = "linear_damping";
    /// Angular damping
    pub const ANGULAR_DAMPING: &str = "angular_damping";
    /// Max linear velocity
    pub const MAX_LINEAR_VELOCITY: &str = "max_linear_velocity";
    /// Max angular velocity
    pub const MAX_ANGULAR_VELOCITY: &str = "max_angular_velocity";
    /// Allowed penetration depth
    pub const PENETRATION_DEPTH: &str = "penetration_depth";
    /// Filter layer name or raw number
    pub const LAYER: &str = "collision_layer";
    /// Filter flag byte
    pub const FILTER_FLAGS: &str = "filter_flags";
    /// Filter system group
    pub const FILTER_GROUP: &str = "filter_group";
    /// hkResponseType
    pub const COLLISION_RESPONSE: &str = "collision_response";
    /// Broad-phase type
    pub const BROAD_PHASE: &str = "broad_phase";
    /// hkQualityType
    pub const QUALITY_TYPE: &str = "quality_type";
    /// hkMotionType
    pub const MOTION_SYSTEM: &str = "motion_system";
    /// hkDeactivatorType
    pub const DEACTIVATOR_TYPE: &str = "deactivator_type";
    /// hkSolverDeactivation
    pub const SOLVER_DEACTIVATION: &str = "solver_deactivation";
}

/// Operations the bridge needs from an editable scene
pub trait SceneAdapter {
    /// Create a new object holding `geometry` (empty for groups)
    fn create_primitive_mesh(&mut self, name: &str, kind: MeshKind, geometry: MeshGeometry) -> SceneNodeId;

    /// Collision kind of an object, `None` for plain nodes or unknown ids
    fn mesh_kind(&self, node: SceneNodeId) -> Option<MeshKind>;

    /// Local geometry of an object
    fn mesh(&self, node: SceneNodeId) -> Option<MeshGeometry>;

    /// Place an object in world space
    fn set_world_transform(&mut self, node: SceneNodeId, matrix: Mat4);

    /// World matrix of an object (identity if unknown)
    fn world_transform(&self, node: SceneNodeId) -> Mat4;

    /// World matrix of a collision target; bones report their bind pose
    fn target_world_transform(&self, target: &CollisionTarget) -> Option<Mat4>;

    /// Make `shape` follow `target` without parenting it. A target carries
    /// at most one shape; an earlier attachment to it is released.
    fn attach_constraint(&mut self, shape: SceneNodeId, target: CollisionTarget);

    /// Target `node` follows, if any
    fn read_constraint_target(&self, node: SceneNodeId) -> Option<CollisionTarget>;

    /// Shape following `target`, if any
    fn find_constrained(&self, target: &CollisionTarget) -> Option<SceneNodeId>;

    /// Every shape that follows some target, in attachment order
    fn constrained_shapes(&self) -> Vec<SceneNodeId>;

    /// Store a value under `key`
    fn set_annotation(&mut self, node: SceneNodeId, key: &str, value: AnnotationValue);

    /// Value under `key`
    fn get_annotation(&self, node: SceneNodeId, key: &str) -> Option<AnnotationValue>;

    /// Record `parent` as the back-reference of `child`. Refused when
    /// `parent` already descends from `child`.
    fn set_parent(&mut self, child: SceneNodeId, parent: SceneNodeId);

    /// Children of an object in attachment order
    fn enumerate_children(&self, node: SceneNodeId) -> Vec<SceneNodeId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_conversions() {
        assert_eq!(AnnotationValue::from(2.5f32).as_float(), Some(2.5));
        assert_eq!(AnnotationValue::from(7i64).as_float(), Some(7.0));
        assert_eq!(AnnotationValue::from(7i64).as_int(), Some(7));
        assert_eq!(AnnotationValue::from("SKY_HAV_MAT_WOOD").as_text(), Some("SKY_HAV_MAT_WOOD"));
        assert_eq!(AnnotationValue::from("x").as_float(), None);
    }
}
