//! Collision graph walker
//!
//! Runs one collision object through the full pipeline in either direction.
//! Shape-level failures are logged and turn into "no collision for this
//! object"; only configuration errors reach the caller.

use log::{info, warn};

use crate::asset::{CollisionObject, CollisionObjectFlags, CollisionObjectKind};
use crate::config::BridgeConfig;
use crate::error::BridgeResult;
use crate::foundation::math::Mat4;
use crate::physics::collision::ShapeCodec;
use crate::physics::rigid_body::RigidBodyTranslator;
use crate::scene::{keys, AnnotationValue, CollisionTarget, SceneAdapter, SceneNodeId};
use crate::units::GameProfile;

/// Orchestrates collision import and export for one game
#[derive(Debug, Clone)]
pub struct CollisionGraphWalker {
    game: GameProfile,
    codec: ShapeCodec,
    bodies: RigidBodyTranslator,
    scene_transform: Mat4,
}

impl CollisionGraphWalker {
    /// Create a walker. Fails if `game` has no registered collision scale
    pub fn new(config: &BridgeConfig, game: GameProfile) -> BridgeResult<Self> {
        let codec = ShapeCodec::new(config, game)?;
        let bodies = RigidBodyTranslator::new(game, *codec.composer());
        Ok(Self {
            game,
            codec,
            bodies,
            scene_transform: Mat4::identity(),
        })
    }

    /// Builder pattern: transform applied on top of every target (e.g. axis conversion)
    #[must_use]
    pub fn with_scene_transform(mut self, transform: Mat4) -> Self {
        self.scene_transform = transform;
        self
    }

    /// Game this walker converts for
    pub const fn game(&self) -> GameProfile {
        self.game
    }

    /// Import one collision object.
    ///
    /// Returns the top scene object created for the shape, or `None` when
    /// the object was skipped.
    pub fn decode<S: SceneAdapter + ?Sized>(
        &self,
        scene: &mut S,
        object: &CollisionObject,
    ) -> BridgeResult<Option<SceneNodeId>> {
        if CollisionObjectKind::from_block_name(&object.block_name).is_none() {
            warn!("Unsupported collision object '{}' on {:?}, skipping", object.block_name, object.target);
            return Ok(None);
        }

        let Some(target_world) = scene.target_world_transform(&object.target) else {
            warn!("Collision target {:?} is not in the scene, skipping", object.target);
            return Ok(None);
        };

        let body = &object.body;
        let body_local = if body.kind.needs_transform() { body.local_transform.as_ref() } else { None };
        let frame = self
            .codec
            .composer()
            .decode_frame(&self.scene_transform, &target_world, body_local);

        let node = match self.codec.decode(scene, &body.shape, &frame) {
            Ok(node) => node,
            Err(err) if err.is_recoverable() => {
                warn!(
                    "No collision imported for {:?} ({}): {}",
                    object.target,
                    body.shape.geometry.block_name(),
                    err
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        self.bodies.decode(scene, node, body);
        scene.set_annotation(node, keys::COLLISION_OBJECT, AnnotationValue::from(object.block_name.as_str()));
        scene.set_annotation(node, keys::OBJECT_FLAGS, AnnotationValue::Int(i64::from(object.flags.bits())));
        if scene.find_constrained(&object.target).is_some() {
            warn!("Replacing the collision already attached to {:?}", object.target);
        }
        scene.attach_constraint(node, object.target.clone());

        Ok(Some(node))
    }

    /// Export the collision attached to `target`, if any
    pub fn encode<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        target: &CollisionTarget,
    ) -> BridgeResult<Option<CollisionObject>> {
        match scene.find_constrained(target) {
            Some(node) => self.encode_node(scene, node, target),
            None => Ok(None),
        }
    }

    /// Import every object, isolating failures per object
    pub fn decode_all<S: SceneAdapter + ?Sized>(
        &self,
        scene: &mut S,
        objects: &[CollisionObject],
    ) -> BridgeResult<Vec<SceneNodeId>> {
        let mut nodes = Vec::with_capacity(objects.len());
        for object in objects {
            if let Some(node) = self.decode(scene, object)? {
                nodes.push(node);
            }
        }
        info!("Imported {} of {} collision objects for {}", nodes.len(), objects.len(), self.game);
        Ok(nodes)
    }

    /// Export every shape attached to a target
    pub fn encode_all<S: SceneAdapter + ?Sized>(&self, scene: &S) -> BridgeResult<Vec<CollisionObject>> {
        let shapes = scene.constrained_shapes();
        let mut objects = Vec::with_capacity(shapes.len());
        for node in &shapes {
            let Some(target) = scene.read_constraint_target(*node) else {
                continue;
            };
            if let Some(object) = self.encode_node(scene, *node, &target)? {
                objects.push(object);
            }
        }
        info!("Exported {} of {} collision shapes for {}", objects.len(), shapes.len(), self.game);
        Ok(objects)
    }

    fn encode_node<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        node: SceneNodeId,
        target: &CollisionTarget,
    ) -> BridgeResult<Option<CollisionObject>> {
        let Some(target_world) = scene.target_world_transform(target) else {
            warn!("Collision target {:?} is not in the scene, skipping", target);
            return Ok(None);
        };
        let frame = self.codec.composer().encode_frame(&self.scene_transform, &target_world);

        let shape = match self.codec.encode(scene, node, &frame) {
            Ok(shape) => shape,
            Err(err) if err.is_recoverable() => {
                warn!("No collision exported for {:?}: {}", target, err);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let Some(body) = self.bodies.encode(scene, node, shape) else {
            return Ok(None);
        };

        let block_name = match scene.get_annotation(node, keys::COLLISION_OBJECT) {
            Some(AnnotationValue::Text(name)) if CollisionObjectKind::from_block_name(&name).is_some() => name,
            _ => CollisionObjectKind::default().block_name().to_string(),
        };
        let flags = scene
            .get_annotation(node, keys::OBJECT_FLAGS)
            .and_then(|v| v.as_int())
            .and_then(|bits| u16::try_from(bits).ok())
            .map_or_else(CollisionObjectFlags::default, CollisionObjectFlags::from_bits_truncate);

        Ok(Some(CollisionObject {
            block_name,
            target: target.clone(),
            flags,
            body,
        }))
    }
}
