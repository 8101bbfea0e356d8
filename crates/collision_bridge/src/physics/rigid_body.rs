//! Rigid body translation
//!
//! Maps body properties to scene annotations and back. Enum fields are
//! written as their Havok names; values missing from the tables pass
//! through as raw integers.

use log::{debug, warn};

use crate::asset::havok_tables::{
    broad_phase, collision_response, deactivator_type, motion_system, quality_type, solver_deactivation,
};
use crate::asset::{BodyKind, CollisionBody, CollisionShapeNode, ShapeGeometry};
use crate::foundation::collections::NamedValues;
use crate::physics::collision_layers::{layers, CollisionFilter};
use crate::physics::transform::TransformComposer;
use crate::scene::{keys, AnnotationValue, SceneAdapter, SceneNodeId};
use crate::units::{GameProfile, ENGINE_UNIT_SCALE};

/// Converts bodies to annotations and annotations to bodies
#[derive(Debug, Clone)]
pub struct RigidBodyTranslator {
    game: GameProfile,
    composer: TransformComposer,
}

impl RigidBodyTranslator {
    /// Create a translator for `game`
    pub const fn new(game: GameProfile, composer: TransformComposer) -> Self {
        Self { game, composer }
    }

    /// Write the body's properties onto the scene object `node`
    pub fn decode<S: SceneAdapter + ?Sized>(&self, scene: &mut S, node: SceneNodeId, body: &CollisionBody) {
        let mut set = |key: &str, value: AnnotationValue| scene.set_annotation(node, key, value);

        set(keys::MASS, AnnotationValue::Float(body.mass / ENGINE_UNIT_SCALE));
        set(keys::FRICTION, AnnotationValue::Float(body.friction / ENGINE_UNIT_SCALE));
        set(keys::LINEAR_DAMPING, AnnotationValue::Float(body.linear_damping / ENGINE_UNIT_SCALE));
        set(keys::ANGULAR_DAMPING, AnnotationValue::Float(body.angular_damping / ENGINE_UNIT_SCALE));
        set(keys::RESTITUTION, AnnotationValue::Float(body.restitution));
        set(keys::MAX_LINEAR_VELOCITY, AnnotationValue::Float(body.max_linear_velocity));
        set(keys::MAX_ANGULAR_VELOCITY, AnnotationValue::Float(body.max_angular_velocity));
        set(keys::PENETRATION_DEPTH, AnnotationValue::Float(body.penetration_depth));

        set(keys::LAYER, self.layer_value(body.filter.layer));
        set(keys::FILTER_FLAGS, AnnotationValue::Int(i64::from(body.filter.flags)));
        set(keys::FILTER_GROUP, AnnotationValue::Int(i64::from(body.filter.group)));

        set(keys::COLLISION_RESPONSE, enum_value(collision_response::TABLE, body.collision_response));
        set(keys::BROAD_PHASE, enum_value(broad_phase::TABLE, body.broad_phase));
        set(keys::QUALITY_TYPE, enum_value(quality_type::TABLE, body.quality_type));
        set(keys::MOTION_SYSTEM, enum_value(motion_system::TABLE, body.motion_system));
        set(keys::DEACTIVATOR_TYPE, enum_value(deactivator_type::TABLE, body.deactivator_type));
        set(keys::SOLVER_DEACTIVATION, enum_value(solver_deactivation::TABLE, body.solver_deactivation));

        if body.kind != BodyKind::Plain {
            set(keys::BODY_KIND, AnnotationValue::from(body.kind.block_name()));
        }
    }

    /// Build a body around `shape` from the annotations on `node`.
    ///
    /// Returns `None` when mass or friction is missing: the object is then
    /// visual only. A moved top-level shape forces a transform-capable body
    /// kind and becomes the body's local transform.
    pub fn encode<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        node: SceneNodeId,
        shape: CollisionShapeNode,
    ) -> Option<CollisionBody> {
        let float = |key: &str| scene.get_annotation(node, key).and_then(|v| v.as_float());

        let (Some(mass), Some(friction)) = (float(keys::MASS), float(keys::FRICTION)) else {
            debug!("Object has no mass or friction, leaving it out of the physics graph");
            return None;
        };

        let stored_kind = match scene.get_annotation(node, keys::BODY_KIND) {
            Some(AnnotationValue::Text(name)) => BodyKind::from_block_name(&name).unwrap_or_else(|| {
                warn!("Unknown body kind '{}', writing bhkRigidBody", name);
                BodyKind::Plain
            }),
            _ => BodyKind::Plain,
        };

        let CollisionShapeNode { material, margin, geometry } = shape;
        let (shape, moved) = match geometry {
            ShapeGeometry::Transform(wrapper) if self.composer.is_identity(&wrapper.transform) => {
                (*wrapper.shape, None)
            }
            ShapeGeometry::Transform(wrapper) => (*wrapper.shape, Some(wrapper.transform)),
            geometry => (CollisionShapeNode::new(material, margin, geometry), None),
        };

        let mut body = CollisionBody::new(stored_kind, shape);
        if let Some(transform) = moved {
            if !stored_kind.needs_transform() {
                debug!(
                    "Shape was moved, exporting {} instead of {}",
                    BodyKind::Translated.block_name(),
                    stored_kind.block_name()
                );
            }
            body = body.with_local_transform(transform);
        }

        body.mass = mass * ENGINE_UNIT_SCALE;
        body.friction = friction * ENGINE_UNIT_SCALE;
        if let Some(damping) = float(keys::LINEAR_DAMPING) {
            body.linear_damping = damping * ENGINE_UNIT_SCALE;
        }
        if let Some(damping) = float(keys::ANGULAR_DAMPING) {
            body.angular_damping = damping * ENGINE_UNIT_SCALE;
        }
        if let Some(value) = float(keys::RESTITUTION) {
            body.restitution = value;
        }
        if let Some(value) = float(keys::MAX_LINEAR_VELOCITY) {
            body.max_linear_velocity = value;
        }
        if let Some(value) = float(keys::MAX_ANGULAR_VELOCITY) {
            body.max_angular_velocity = value;
        }
        if let Some(value) = float(keys::PENETRATION_DEPTH) {
            body.penetration_depth = value;
        }

        let annotation = |key: &str| scene.get_annotation(node, key);
        body.filter = CollisionFilter {
            layer: self.layer_from(annotation(keys::LAYER), body.filter.layer),
            flags: int_from(annotation(keys::FILTER_FLAGS), body.filter.flags),
            group: int_from(annotation(keys::FILTER_GROUP), body.filter.group),
        };
        body.collision_response = enum_from(collision_response::TABLE, annotation(keys::COLLISION_RESPONSE), body.collision_response);
        body.broad_phase = enum_from(broad_phase::TABLE, annotation(keys::BROAD_PHASE), body.broad_phase);
        body.quality_type = enum_from(quality_type::TABLE, annotation(keys::QUALITY_TYPE), body.quality_type);
        body.motion_system = enum_from(motion_system::TABLE, annotation(keys::MOTION_SYSTEM), body.motion_system);
        body.deactivator_type = enum_from(deactivator_type::TABLE, annotation(keys::DEACTIVATOR_TYPE), body.deactivator_type);
        body.solver_deactivation = enum_from(
            solver_deactivation::TABLE,
            annotation(keys::SOLVER_DEACTIVATION),
            body.solver_deactivation,
        );

        Some(body)
    }

    fn layer_value(&self, layer: u8) -> AnnotationValue {
        match layers(self.game).and_then(|table| table.name_of(layer)) {
            Some(name) => AnnotationValue::from(name),
            None => {
                warn!("Unknown collision layer {} for {}, keeping raw value", layer, self.game);
                AnnotationValue::Int(i64::from(layer))
            }
        }
    }

    fn layer_from(&self, value: Option<AnnotationValue>, fallback: u8) -> u8 {
        match (value, layers(self.game)) {
            (Some(AnnotationValue::Text(name)), Some(table)) => table.value_of(&name).unwrap_or_else(|| {
                warn!("Unknown collision layer '{}' for {}", name, self.game);
                fallback
            }),
            (value, _) => int_from(value, fallback),
        }
    }
}

fn enum_value(table: NamedValues<u8>, value: u8) -> AnnotationValue {
    match table.name_of(value) {
        Some(name) => AnnotationValue::from(name),
        None => {
            warn!("Unknown {} value {}, keeping raw value", table.label(), value);
            AnnotationValue::Int(i64::from(value))
        }
    }
}

fn enum_from(table: NamedValues<u8>, value: Option<AnnotationValue>, fallback: u8) -> u8 {
    match value {
        Some(AnnotationValue::Text(name)) => table.value_of(&name).unwrap_or_else(|| {
            warn!("Unknown {} '{}'", table.label(), name);
            fallback
        }),
        other => int_from(other, fallback),
    }
}

fn int_from<T: TryFrom<i64>>(value: Option<AnnotationValue>, fallback: T) -> T {
    value
        .and_then(|v| v.as_int())
        .and_then(|raw| T::try_from(raw).ok())
        .unwrap_or(fallback)
}
