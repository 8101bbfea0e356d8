//! Shape codec
//!
//! Converts one collision shape tree to scene objects and back. Decode
//! builds meshes from stored parameters; encode re-analyzes whatever the
//! scene holds now, so resized or moved shapes export their edited form.
//!
//! # Variants
//!
//! - Box: prism from half-extents; encode reads the object transform
//! - Capsule: revolved mesh; encode finds the tips and equator ring
//! - Sphere: UV sphere; encode trusts the `radius` annotation
//! - ConvexHull: re-hulled on both sides, planes rebuilt on export
//! - List: group object with one scene child per entry
//! - Transform: no scene object of its own, folded into the child placement

use log::{debug, warn};

use super::analysis;
use super::primitives;
use crate::asset::havok_tables::{default_material, materials};
use crate::asset::{CollisionShapeNode, ShapeGeometry, ShapeKind, TransformWrapper};
use crate::config::{BridgeConfig, TessellationConfig, ToleranceConfig};
use crate::error::{BridgeError, BridgeResult};
use crate::foundation::math::{rigid_part, Mat4, Transform};
use crate::physics::transform::TransformComposer;
use crate::scene::{keys, AnnotationValue, MeshKind, SceneAdapter, SceneNodeId};
use crate::units::GameProfile;

/// Havok default convex radius, asset units
pub const DEFAULT_CONVEX_RADIUS: f32 = 0.1;

/// Per-variant encode/decode of collision shapes
#[derive(Debug, Clone)]
pub struct ShapeCodec {
    game: GameProfile,
    composer: TransformComposer,
    tessellation: TessellationConfig,
    tolerances: ToleranceConfig,
}

impl ShapeCodec {
    /// Create a codec for `game`. Fails if the game has no registered scale
    pub fn new(config: &BridgeConfig, game: GameProfile) -> BridgeResult<Self> {
        let converter = config.unit_converter();
        let composer = TransformComposer::new(
            converter.import_factor(game)?,
            converter.export_factor(game)?,
            config.tolerances.identity,
        );
        Ok(Self {
            game,
            composer,
            tessellation: config.tessellation,
            tolerances: config.tolerances,
        })
    }

    /// Transform composer using this codec's scale factors
    pub const fn composer(&self) -> &TransformComposer {
        &self.composer
    }

    /// Create scene objects for `shape`, placed in the body `frame`.
    ///
    /// Returns the top object: the mesh, or the group of a list.
    pub fn decode<S: SceneAdapter + ?Sized>(
        &self,
        scene: &mut S,
        shape: &CollisionShapeNode,
        frame: &Mat4,
    ) -> BridgeResult<SceneNodeId> {
        let scale = self.composer.import_factor();

        let node = match &shape.geometry {
            ShapeGeometry::Box { half_extents } => {
                let mesh = primitives::box_mesh(half_extents * scale);
                scene.create_primitive_mesh(ShapeKind::Box.block_name(), MeshKind::Box, mesh)
            }
            ShapeGeometry::Capsule { point1, point2, radius } => {
                let mesh = primitives::capsule_mesh(
                    point1 * scale,
                    point2 * scale,
                    radius * scale,
                    self.tessellation.capsule_segments,
                    self.tessellation.capsule_rings,
                );
                scene.create_primitive_mesh(ShapeKind::Capsule.block_name(), MeshKind::Capsule, mesh)
            }
            ShapeGeometry::Sphere { radius } => {
                let mesh = primitives::uv_sphere(
                    radius * scale,
                    self.tessellation.sphere_segments,
                    self.tessellation.sphere_rings,
                );
                let node = scene.create_primitive_mesh(ShapeKind::Sphere.block_name(), MeshKind::Sphere, mesh);
                scene.set_annotation(node, keys::RADIUS, AnnotationValue::Float(radius * scale));
                node
            }
            ShapeGeometry::ConvexHull { vertices, .. } => {
                let scaled: Vec<_> = vertices.iter().map(|v| v * scale).collect();
                let mesh = primitives::hull_mesh(&scaled)?;
                scene.create_primitive_mesh(ShapeKind::ConvexHull.block_name(), MeshKind::ConvexHull, mesh)
            }
            ShapeGeometry::List { children } => self.decode_list(scene, children, frame)?,
            ShapeGeometry::Transform(wrapper) => {
                let child_frame = frame * self.composer.wrapper_matrix(&wrapper.transform);
                return self.decode(scene, &wrapper.shape, &child_frame);
            }
            ShapeGeometry::Unsupported { block_name } => {
                return Err(BridgeError::UnsupportedShape {
                    block_name: block_name.clone(),
                });
            }
        };

        scene.set_world_transform(node, *frame);
        self.annotate(scene, node, shape);
        debug!("Decoded {} into scene", shape.geometry.block_name());
        Ok(node)
    }

    fn decode_list<S: SceneAdapter + ?Sized>(
        &self,
        scene: &mut S,
        children: &[TransformWrapper],
        frame: &Mat4,
    ) -> BridgeResult<SceneNodeId> {
        let group = scene.create_primitive_mesh(
            ShapeKind::List.block_name(),
            MeshKind::Group,
            Default::default(),
        );

        for (index, child) in children.iter().enumerate() {
            let child_frame = frame * self.composer.wrapper_matrix(&child.transform);
            match self.decode(scene, &child.shape, &child_frame) {
                Ok(id) => scene.set_parent(id, group),
                Err(err) if err.is_recoverable() => {
                    warn!("Skipping list child {}: {}", index, err);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(group)
    }

    fn annotate<S: SceneAdapter + ?Sized>(&self, scene: &mut S, node: SceneNodeId, shape: &CollisionShapeNode) {
        let material = match materials(self.game).and_then(|table| table.name_of(shape.material)) {
            Some(name) => AnnotationValue::from(name),
            None => {
                let err = BridgeError::UnknownMaterial {
                    game: self.game,
                    id: shape.material,
                };
                warn!("{}; keeping raw id", err);
                AnnotationValue::Int(i64::from(shape.material))
            }
        };
        scene.set_annotation(node, keys::MATERIAL, material);
        scene.set_annotation(node, keys::MARGIN, AnnotationValue::Float(shape.margin));
    }

    /// Rebuild a shape from the scene object `node`, relative to the body `frame`
    pub fn encode<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        node: SceneNodeId,
        frame: &Mat4,
    ) -> BridgeResult<CollisionShapeNode> {
        let kind = scene.mesh_kind(node).ok_or_else(|| BridgeError::UnsupportedShape {
            block_name: "object without collision kind".to_string(),
        })?;
        let world = scene.world_transform(node);
        let material = self.material_of(scene, node);

        match kind {
            MeshKind::Box => {
                let mesh = scene
                    .mesh(node)
                    .ok_or_else(|| BridgeError::degenerate(ShapeKind::Box, "object has no mesh"))?;
                let info = analysis::box_info(&mesh, &world)?;
                let half_extents = info.dimensions * 0.5 / self.composer.export_factor();
                let margin = self.margin_of(scene, node).unwrap_or(DEFAULT_CONVEX_RADIUS);
                let shape = CollisionShapeNode::new(material, margin, ShapeGeometry::Box { half_extents });
                Ok(self.wrap_if_moved(shape, frame, &info.placement()))
            }
            MeshKind::Sphere => {
                let radius = match scene.get_annotation(node, keys::RADIUS).and_then(|v| v.as_float()) {
                    Some(radius) => radius,
                    None => {
                        let mesh = scene
                            .mesh(node)
                            .ok_or_else(|| BridgeError::degenerate(ShapeKind::Sphere, "object has no mesh"))?;
                        let scale = Transform::from_matrix(world).scale;
                        mesh.bounding_radius() * scale.abs().max()
                    }
                };
                if radius <= 0.0 {
                    return Err(BridgeError::degenerate(ShapeKind::Sphere, "radius is not positive"));
                }
                let radius = radius / self.composer.export_factor();
                let margin = self.margin_of(scene, node).unwrap_or(radius);
                let shape = CollisionShapeNode::new(material, margin, ShapeGeometry::Sphere { radius });
                Ok(self.wrap_if_moved(shape, frame, &world))
            }
            MeshKind::Capsule => {
                let mesh = scene
                    .mesh(node)
                    .ok_or_else(|| BridgeError::degenerate(ShapeKind::Capsule, "object has no mesh"))?;
                let info = analysis::capsule_ends(&mesh, &world, self.tolerances.capsule_ring)?;
                let radius = scene
                    .get_annotation(node, keys::RADIUS)
                    .and_then(|v| v.as_float())
                    .unwrap_or(info.radius)
                    / self.composer.export_factor();
                let ends = self.composer.to_asset_points(frame, &[info.point1, info.point2]);
                let margin = self.margin_of(scene, node).unwrap_or(radius);
                Ok(CollisionShapeNode::new(
                    material,
                    margin,
                    ShapeGeometry::Capsule {
                        point1: ends[0],
                        point2: ends[1],
                        radius,
                    },
                ))
            }
            MeshKind::ConvexHull => {
                let mesh = scene
                    .mesh(node)
                    .ok_or_else(|| BridgeError::degenerate(ShapeKind::ConvexHull, "object has no mesh"))?;
                let points = self.composer.to_asset_points(frame, &mesh.world_vertices(&world));
                let (vertices, triangles) = analysis::convex_hull(&points)?;
                let normals = analysis::hull_planes(
                    &vertices,
                    &triangles,
                    self.tolerances.hull_normal_angle,
                    self.tolerances.hull_distance,
                );
                let margin = self.margin_of(scene, node).unwrap_or(DEFAULT_CONVEX_RADIUS);
                Ok(CollisionShapeNode::new(material, margin, ShapeGeometry::ConvexHull { vertices, normals }))
            }
            MeshKind::Group => self.encode_list(scene, node, material, frame, &world),
        }
    }

    fn encode_list<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        group: SceneNodeId,
        material: u32,
        frame: &Mat4,
        world: &Mat4,
    ) -> BridgeResult<CollisionShapeNode> {
        let group_frame = rigid_part(world);
        let mut children = Vec::new();

        for child in scene.enumerate_children(group) {
            let child_frame = rigid_part(&scene.world_transform(child));
            let encoded = match self.encode(scene, child, &child_frame) {
                Ok(encoded) => encoded,
                Err(err) if err.is_recoverable() => {
                    warn!("Skipping list child: {}", err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            let placement = self.composer.relative(&group_frame, &child_frame);
            let wrapper = match encoded.geometry {
                ShapeGeometry::Transform(inner) => TransformWrapper {
                    transform: placement.then(&inner.transform),
                    shape: inner.shape,
                },
                _ => TransformWrapper::new(placement, encoded),
            };
            children.push(wrapper);
        }

        if children.is_empty() {
            return Err(BridgeError::degenerate(ShapeKind::List, "no encodable children"));
        }

        let margin = self.margin_of(scene, group).unwrap_or(DEFAULT_CONVEX_RADIUS);
        let list = CollisionShapeNode::new(material, margin, ShapeGeometry::List { children });
        Ok(self.wrap_if_moved(list, frame, &group_frame))
    }

    fn wrap_if_moved(&self, shape: CollisionShapeNode, frame: &Mat4, placement: &Mat4) -> CollisionShapeNode {
        let transform = self.composer.relative(frame, placement);
        if self.composer.is_identity(&transform) {
            return shape;
        }
        let (material, margin) = (shape.material, shape.margin);
        CollisionShapeNode::new(
            material,
            margin,
            ShapeGeometry::Transform(TransformWrapper::new(transform, shape)),
        )
    }

    fn material_of<S: SceneAdapter + ?Sized>(&self, scene: &S, node: SceneNodeId) -> u32 {
        let fallback = default_material(self.game);
        match scene.get_annotation(node, keys::MATERIAL) {
            Some(AnnotationValue::Text(name)) => {
                match materials(self.game).and_then(|table| table.value_of(&name)) {
                    Some(id) => id,
                    None => {
                        warn!("Unknown material '{}' for {}; using {}", name, self.game, fallback);
                        fallback
                    }
                }
            }
            Some(AnnotationValue::Int(id)) => u32::try_from(id).unwrap_or(fallback),
            Some(AnnotationValue::Float(_)) | None => fallback,
        }
    }

    fn margin_of<S: SceneAdapter + ?Sized>(&self, scene: &S, node: SceneNodeId) -> Option<f32> {
        scene.get_annotation(node, keys::MARGIN).and_then(|v| v.as_float())
    }
}
