//! Asset-side collision data
//!
//! The structures the asset reader hands over after parsing, and the
//! structures the writer receives back. Field values are in asset units;
//! nothing here knows about the scene.
//!
//! # Key Types
//!
//! - [`CollisionObject`] - Links one body to one target
//! - [`CollisionBody`] - Physics properties around a shape tree
//! - [`CollisionShapeNode`] - One node of the shape tree
//! - [`ShapeGeometry`] - Closed set of supported shape variants

pub mod havok_tables;

use std::fmt;

use bitflags::bitflags;

use crate::foundation::math::{Mat4, Quat, Vec3, Vec4};
use crate::physics::collision_layers::CollisionFilter;
use crate::scene::CollisionTarget;

/// Translation and rotation of a shape or body, in asset units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeTransform {
    /// Offset in asset units
    pub translation: Vec3,
    /// Orientation
    pub rotation: Quat,
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ShapeTransform {
    /// No offset, no rotation
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }

    /// Create from translation and rotation
    pub const fn new(translation: Vec3, rotation: Quat) -> Self {
        Self { translation, rotation }
    }

    /// Matrix with the translation multiplied by `length_scale`.
    ///
    /// Rotation is unitless and never scaled.
    pub fn to_matrix(&self, length_scale: f32) -> Mat4 {
        Mat4::new_translation(&(self.translation * length_scale)) * self.rotation.to_homogeneous()
    }

    /// This transform applied after `inner` (`self ∘ inner`)
    #[must_use]
    pub fn then(&self, inner: &Self) -> Self {
        Self {
            translation: self.translation + self.rotation * inner.translation,
            rotation: self.rotation * inner.rotation,
        }
    }

    /// Whether both translation and rotation are within `tolerance` of identity
    pub fn is_identity(&self, tolerance: f32) -> bool {
        self.translation.norm() <= tolerance && self.rotation.angle() <= tolerance
    }
}

/// Supported shape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Oriented box
    Box,
    /// Capsule between two cap centers
    Capsule,
    /// Sphere around the local origin
    Sphere,
    /// Convex hull of a vertex set
    ConvexHull,
    /// Compound of transformed children
    List,
    /// Offset/rotation applied to one child
    Transform,
}

impl ShapeKind {
    /// Block name written to the asset
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::Box => "bhkBoxShape",
            Self::Capsule => "bhkCapsuleShape",
            Self::Sphere => "bhkSphereShape",
            Self::ConvexHull => "bhkConvexVerticesShape",
            Self::List => "bhkListShape",
            Self::Transform => "bhkConvexTransformShape",
        }
    }

    /// Parse a block name. `bhkTransformShape` is read as the same wrapper
    pub fn from_block_name(name: &str) -> Option<Self> {
        match name {
            "bhkBoxShape" => Some(Self::Box),
            "bhkCapsuleShape" => Some(Self::Capsule),
            "bhkSphereShape" => Some(Self::Sphere),
            "bhkConvexVerticesShape" => Some(Self::ConvexHull),
            "bhkListShape" => Some(Self::List),
            "bhkConvexTransformShape" | "bhkTransformShape" => Some(Self::Transform),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Box => "box",
            Self::Capsule => "capsule",
            Self::Sphere => "sphere",
            Self::ConvexHull => "convex hull",
            Self::List => "list",
            Self::Transform => "transform",
        };
        f.write_str(name)
    }
}

/// A child of a list, or a wrapper around one shape
#[derive(Debug, Clone, PartialEq)]
pub struct TransformWrapper {
    /// Placement of the child in the parent frame
    pub transform: ShapeTransform,
    /// The wrapped shape
    pub shape: Box<CollisionShapeNode>,
}

impl TransformWrapper {
    /// Wrap a shape
    pub fn new(transform: ShapeTransform, shape: CollisionShapeNode) -> Self {
        Self {
            transform,
            shape: Box::new(shape),
        }
    }
}

/// Variant-specific geometry of a shape node
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// Box centered on the local origin
    Box {
        /// Half-extents along the local axes
        half_extents: Vec3,
    },
    /// Capsule with hemispherical caps
    Capsule {
        /// First cap center
        point1: Vec3,
        /// Second cap center
        point2: Vec3,
        /// Cap and cylinder radius
        radius: f32,
    },
    /// Sphere centered on the local origin
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Convex hull
    ConvexHull {
        /// Hull vertices
        vertices: Vec<Vec3>,
        /// Outward face planes as (nx, ny, nz, w) with `n·p + w = 0` on the face
        normals: Vec<Vec4>,
    },
    /// Compound shape; children are always transform wrappers
    List {
        /// Children in attachment order
        children: Vec<TransformWrapper>,
    },
    /// Offset/rotation wrapper around one child
    Transform(TransformWrapper),
    /// A block this bridge does not convert
    Unsupported {
        /// Block name as read from the asset
        block_name: String,
    },
}

impl ShapeGeometry {
    /// Variant kind, `None` for unsupported blocks
    pub const fn kind(&self) -> Option<ShapeKind> {
        match self {
            Self::Box { .. } => Some(ShapeKind::Box),
            Self::Capsule { .. } => Some(ShapeKind::Capsule),
            Self::Sphere { .. } => Some(ShapeKind::Sphere),
            Self::ConvexHull { .. } => Some(ShapeKind::ConvexHull),
            Self::List { .. } => Some(ShapeKind::List),
            Self::Transform(_) => Some(ShapeKind::Transform),
            Self::Unsupported { .. } => None,
        }
    }

    /// Block name for logging and writing
    pub fn block_name(&self) -> &str {
        match self {
            Self::Unsupported { block_name } => block_name,
            other => other.kind().map_or("", ShapeKind::block_name),
        }
    }
}

/// One node of a collision shape tree
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionShapeNode {
    /// Physics material id (per-game numbering)
    pub material: u32,
    /// Contact radius / convex margin in asset units
    pub margin: f32,
    /// Variant geometry
    pub geometry: ShapeGeometry,
}

impl CollisionShapeNode {
    /// Create a node
    pub const fn new(material: u32, margin: f32, geometry: ShapeGeometry) -> Self {
        Self {
            material,
            margin,
            geometry,
        }
    }

    /// A node standing for a block the reader parsed but the bridge cannot convert
    pub fn unsupported(block_name: impl Into<String>) -> Self {
        Self::new(
            0,
            0.0,
            ShapeGeometry::Unsupported {
                block_name: block_name.into(),
            },
        )
    }
}

/// How a body positions its shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyKind {
    /// Shape sits at the target origin (`bhkRigidBody`)
    #[default]
    Plain,
    /// Body carries its own transform (`bhkRigidBodyT`)
    Translated,
    /// Non-colliding phantom with a transform (`bhkSimpleShapePhantom`)
    Phantom,
}

impl BodyKind {
    /// Block name written to the asset
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::Plain => "bhkRigidBody",
            Self::Translated => "bhkRigidBodyT",
            Self::Phantom => "bhkSimpleShapePhantom",
        }
    }

    /// Parse a block name
    pub fn from_block_name(name: &str) -> Option<Self> {
        match name {
            "bhkRigidBody" => Some(Self::Plain),
            "bhkRigidBodyT" => Some(Self::Translated),
            "bhkSimpleShapePhantom" => Some(Self::Phantom),
            _ => None,
        }
    }

    /// Whether the body stores an explicit local transform
    pub const fn needs_transform(self) -> bool {
        matches!(self, Self::Translated | Self::Phantom)
    }

    /// The closest kind able to carry a transform
    #[must_use]
    pub const fn transform_capable(self) -> Self {
        match self {
            Self::Plain => Self::Translated,
            other => other,
        }
    }
}

/// Physics body around a shape tree
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBody {
    /// Positioning semantics
    pub kind: BodyKind,
    /// Root of the shape tree
    pub shape: CollisionShapeNode,
    /// Present exactly when `kind.needs_transform()`
    pub local_transform: Option<ShapeTransform>,
    /// Mass
    pub mass: f32,
    /// Friction coefficient
    pub friction: f32,
    /// Restitution coefficient
    pub restitution: f32,
    /// Linear damping
    pub linear_damping: f32,
    /// Angular damping
    pub angular_damping: f32,
    /// Max linear velocity
    pub max_linear_velocity: f32,
    /// Max angular velocity
    pub max_angular_velocity: f32,
    /// Allowed penetration depth
    pub penetration_depth: f32,
    /// Havok collision filter (layer, flags, group)
    pub filter: CollisionFilter,
    /// hkResponseType
    pub collision_response: u8,
    /// Broad-phase type
    pub broad_phase: u8,
    /// hkQualityType
    pub quality_type: u8,
    /// hkMotionType
    pub motion_system: u8,
    /// hkDeactivatorType
    pub deactivator_type: u8,
    /// hkSolverDeactivation
    pub solver_deactivation: u8,
}

impl CollisionBody {
    /// A body with engine defaults around `shape`
    pub fn new(kind: BodyKind, shape: CollisionShapeNode) -> Self {
        use self::havok_tables::{
            broad_phase, collision_response, deactivator_type, motion_system, quality_type,
            solver_deactivation,
        };

        Self {
            kind,
            shape,
            local_transform: kind.needs_transform().then(ShapeTransform::identity),
            mass: 0.0,
            friction: 0.5,
            restitution: 0.4,
            linear_damping: 0.1,
            angular_damping: 0.05,
            max_linear_velocity: 104.4,
            max_angular_velocity: 31.57,
            penetration_depth: 0.15,
            filter: CollisionFilter::default(),
            collision_response: collision_response::SIMPLE_CONTACT,
            broad_phase: broad_phase::ENTITY,
            quality_type: quality_type::FIXED,
            motion_system: motion_system::FIXED,
            deactivator_type: deactivator_type::NEVER,
            solver_deactivation: solver_deactivation::OFF,
        }
    }

    /// Builder pattern: change kind, keeping the transform invariant
    #[must_use]
    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self.local_transform = if kind.needs_transform() {
            Some(self.local_transform.unwrap_or_default())
        } else {
            None
        };
        self
    }

    /// Builder pattern: set the local transform, upgrading the kind if needed
    #[must_use]
    pub fn with_local_transform(mut self, transform: ShapeTransform) -> Self {
        self.kind = self.kind.transform_capable();
        self.local_transform = Some(transform);
        self
    }
}

/// Known collision object block names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionObjectKind {
    /// `bhkCollisionObject`
    #[default]
    Standard,
    /// `bhkBlendCollisionObject` (animated, bone targets)
    Blend,
    /// `bhkSPCollisionObject` (simple phantom)
    SimplePhantom,
    /// `bhkPCollisionObject` (phantom)
    Phantom,
}

impl CollisionObjectKind {
    /// Block name written to the asset
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::Standard => "bhkCollisionObject",
            Self::Blend => "bhkBlendCollisionObject",
            Self::SimplePhantom => "bhkSPCollisionObject",
            Self::Phantom => "bhkPCollisionObject",
        }
    }

    /// Parse a block name
    pub fn from_block_name(name: &str) -> Option<Self> {
        match name {
            "bhkCollisionObject" => Some(Self::Standard),
            "bhkBlendCollisionObject" => Some(Self::Blend),
            "bhkSPCollisionObject" => Some(Self::SimplePhantom),
            "bhkPCollisionObject" => Some(Self::Phantom),
            _ => None,
        }
    }
}

bitflags! {
    /// bhkCOFlags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionObjectFlags: u16 {
        /// Object takes part in simulation
        const ACTIVE = 1;
        /// Reset on load
        const RESET = 1 << 1;
        /// Notify on events
        const NOTIFY = 1 << 2;
        /// Use local transform
        const SET_LOCAL = 1 << 3;
        /// Debug display
        const DBG_DISPLAY = 1 << 4;
        /// Use velocity
        const USE_VEL = 1 << 5;
        /// Reset transform
        const RESET_TRANS = 1 << 6;
        /// Sync the target with the body on update
        const SYNC_ON_UPDATE = 1 << 7;
    }
}

impl Default for CollisionObjectFlags {
    fn default() -> Self {
        Self::ACTIVE | Self::SYNC_ON_UPDATE
    }
}

/// Associates one body with one target
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionObject {
    /// Block name as stored in the asset
    pub block_name: String,
    /// Mesh node or bone the body follows
    pub target: CollisionTarget,
    /// Object flags
    pub flags: CollisionObjectFlags,
    /// The body
    pub body: CollisionBody,
}

impl CollisionObject {
    /// A `bhkCollisionObject` with default flags
    pub fn new(target: CollisionTarget, body: CollisionBody) -> Self {
        Self {
            block_name: CollisionObjectKind::Standard.block_name().to_string(),
            target,
            flags: CollisionObjectFlags::default(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_block_names_round_trip() {
        for kind in [
            ShapeKind::Box,
            ShapeKind::Capsule,
            ShapeKind::Sphere,
            ShapeKind::ConvexHull,
            ShapeKind::List,
            ShapeKind::Transform,
        ] {
            assert_eq!(ShapeKind::from_block_name(kind.block_name()), Some(kind));
        }
        assert_eq!(ShapeKind::from_block_name("bhkTransformShape"), Some(ShapeKind::Transform));
        assert_eq!(ShapeKind::from_block_name("bhkMoppBvTreeShape"), None);
        assert_eq!(BodyKind::from_block_name("bhkRigidBodyT"), Some(BodyKind::Translated));
        assert_eq!(CollisionObjectKind::from_block_name("bhkNiCollisionObject"), None);
    }

    #[test]
    fn test_body_transform_invariant() {
        let shape = CollisionShapeNode::new(0, 0.1, ShapeGeometry::Sphere { radius: 1.0 });

        let plain = CollisionBody::new(BodyKind::Plain, shape.clone());
        assert!(plain.local_transform.is_none());

        let phantom = CollisionBody::new(BodyKind::Phantom, shape.clone());
        assert_eq!(phantom.local_transform, Some(ShapeTransform::identity()));

        let back = phantom.with_kind(BodyKind::Plain);
        assert!(back.local_transform.is_none());

        let moved = CollisionBody::new(BodyKind::Plain, shape)
            .with_local_transform(ShapeTransform::new(Vec3::x(), Quat::identity()));
        assert_eq!(moved.kind, BodyKind::Translated);
    }

    #[test]
    fn test_transform_composition() {
        let outer = ShapeTransform::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_euler_angles(0.0, 0.0, std::f32::consts::FRAC_PI_2),
        );
        let inner = ShapeTransform::new(Vec3::new(2.0, 0.0, 0.0), Quat::identity());

        let combined = outer.then(&inner);
        let by_matrix = outer.to_matrix(1.0) * inner.to_matrix(1.0);

        assert_relative_eq!(combined.translation, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(combined.to_matrix(1.0), by_matrix, epsilon = 1e-5);
        assert!(ShapeTransform::identity().is_identity(1e-6));
        assert!(!inner.is_identity(1e-6));
    }

    #[test]
    fn test_default_flags() {
        let flags = CollisionObjectFlags::default();
        assert_eq!(flags.bits(), 129);
    }
}
