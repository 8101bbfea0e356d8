//! In-memory scene
//!
//! A complete [`SceneAdapter`] backed by a slot map. Useful on its own for
//! batch conversion and as the scene the pipeline tests run against.

use std::collections::HashMap;

use log::warn;

use super::adapter::{AnnotationValue, CollisionTarget, MeshKind, SceneAdapter, SceneNodeId};
use crate::foundation::collections::SlotMap;
use crate::foundation::math::Mat4;
use crate::physics::collision::MeshGeometry;

/// A bone with its rest and current pose, both relative to the armature
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Bone name
    pub name: String,
    /// Rest pose
    pub bind: Mat4,
    /// Animated pose
    pub pose: Mat4,
}

/// One object in a [`MemoryScene`]
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Display name
    pub name: String,
    /// Collision kind, `None` for plain nodes and armatures
    pub kind: Option<MeshKind>,
    /// Local geometry
    pub geometry: MeshGeometry,
    /// World matrix
    pub world: Mat4,
    /// Key-value metadata
    pub annotations: HashMap<String, AnnotationValue>,
    /// Back-reference to the owning group
    pub parent: Option<SceneNodeId>,
    /// Children in attachment order
    pub children: Vec<SceneNodeId>,
    /// Bones, non-empty only for armatures
    pub bones: Vec<Bone>,
}

impl SceneNode {
    fn new(name: &str, kind: Option<MeshKind>, geometry: MeshGeometry) -> Self {
        Self {
            name: name.to_string(),
            kind,
            geometry,
            world: Mat4::identity(),
            annotations: HashMap::new(),
            parent: None,
            children: Vec::new(),
            bones: Vec::new(),
        }
    }
}

/// Slot-map backed scene
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: SlotMap<SceneNodeId, SceneNode>,
    constraints: Vec<(SceneNodeId, CollisionTarget)>,
}

impl MemoryScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain node that collision bodies can target
    pub fn add_node(&mut self, name: &str, world: Mat4) -> SceneNodeId {
        let mut node = SceneNode::new(name, None, MeshGeometry::empty());
        node.world = world;
        self.nodes.insert(node)
    }

    /// Add an armature node
    pub fn add_armature(&mut self, name: &str, world: Mat4) -> SceneNodeId {
        self.add_node(name, world)
    }

    /// Add a bone in its rest pose. Returns `false` if the armature is unknown
    pub fn add_bone(&mut self, armature: SceneNodeId, name: &str, bind: Mat4) -> bool {
        let Some(node) = self.nodes.get_mut(armature) else {
            warn!("Cannot add bone '{}' to unknown armature", name);
            return false;
        };
        node.bones.push(Bone {
            name: name.to_string(),
            bind,
            pose: bind,
        });
        true
    }

    /// Change a bone's animated pose. Returns `false` if the bone is unknown
    pub fn set_bone_pose(&mut self, armature: SceneNodeId, name: &str, pose: Mat4) -> bool {
        match self.bone_mut(armature, name) {
            Some(bone) => {
                bone.pose = pose;
                true
            }
            None => false,
        }
    }

    /// Look up a node
    pub fn node(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Mutable access to a node, as an external edit would
    pub fn node_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Number of objects in the scene
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `ancestor` is `node` or one of its parents
    fn descends_from(&self, node: SceneNodeId, ancestor: SceneNodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn bone(&self, armature: SceneNodeId, name: &str) -> Option<&Bone> {
        self.nodes.get(armature)?.bones.iter().find(|b| b.name == name)
    }

    fn bone_mut(&mut self, armature: SceneNodeId, name: &str) -> Option<&mut Bone> {
        self.nodes.get_mut(armature)?.bones.iter_mut().find(|b| b.name == name)
    }
}

impl SceneAdapter for MemoryScene {
    fn create_primitive_mesh(&mut self, name: &str, kind: MeshKind, geometry: MeshGeometry) -> SceneNodeId {
        self.nodes.insert(SceneNode::new(name, Some(kind), geometry))
    }

    fn mesh_kind(&self, node: SceneNodeId) -> Option<MeshKind> {
        self.nodes.get(node).and_then(|n| n.kind)
    }

    fn mesh(&self, node: SceneNodeId) -> Option<MeshGeometry> {
        self.nodes.get(node).map(|n| n.geometry.clone())
    }

    fn set_world_transform(&mut self, node: SceneNodeId, matrix: Mat4) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.world = matrix;
        }
    }

    fn world_transform(&self, node: SceneNodeId) -> Mat4 {
        self.nodes.get(node).map_or_else(Mat4::identity, |n| n.world)
    }

    fn target_world_transform(&self, target: &CollisionTarget) -> Option<Mat4> {
        match target {
            CollisionTarget::Node(id) => self.nodes.get(*id).map(|n| n.world),
            CollisionTarget::Bone { armature, bone } => {
                let armature_world = self.nodes.get(*armature)?.world;
                let bone = self.bone(*armature, bone)?;
                Some(armature_world * bone.bind)
            }
        }
    }

    fn attach_constraint(&mut self, shape: SceneNodeId, target: CollisionTarget) {
        self.constraints.retain(|(s, t)| *s != shape && *t != target);
        self.constraints.push((shape, target));
    }

    fn read_constraint_target(&self, node: SceneNodeId) -> Option<CollisionTarget> {
        self.constraints
            .iter()
            .find(|(shape, _)| *shape == node)
            .map(|(_, target)| target.clone())
    }

    fn find_constrained(&self, target: &CollisionTarget) -> Option<SceneNodeId> {
        self.constraints
            .iter()
            .find(|(shape, t)| t == target && self.nodes.contains_key(*shape))
            .map(|(shape, _)| *shape)
    }

    fn constrained_shapes(&self) -> Vec<SceneNodeId> {
        self.constraints
            .iter()
            .map(|(shape, _)| *shape)
            .filter(|shape| self.nodes.contains_key(*shape))
            .collect()
    }

    fn set_annotation(&mut self, node: SceneNodeId, key: &str, value: AnnotationValue) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.annotations.insert(key.to_string(), value);
        }
    }

    fn get_annotation(&self, node: SceneNodeId, key: &str) -> Option<AnnotationValue> {
        self.nodes.get(node)?.annotations.get(key).cloned()
    }

    fn set_parent(&mut self, child: SceneNodeId, parent: SceneNodeId) {
        if !self.nodes.contains_key(parent) {
            return;
        }
        if self.descends_from(parent, child) {
            warn!("Refusing to parent a node under its own descendant");
            return;
        }
        let Some(old_parent) = self.nodes.get(child).map(|n| n.parent) else {
            return;
        };
        if let Some(old) = old_parent.and_then(|id| self.nodes.get_mut(id)) {
            old.children.retain(|c| *c != child);
        }
        if let Some(n) = self.nodes.get_mut(child) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
    }

    fn enumerate_children(&self, node: SceneNodeId) -> Vec<SceneNodeId> {
        self.nodes.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }
}
