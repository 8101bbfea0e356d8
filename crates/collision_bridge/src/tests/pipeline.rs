//! Whole-object pipeline behaviour: lists, bodies, bones, batches and skips

use super::body_object;
use crate::asset::{
    BodyKind, CollisionObjectFlags, CollisionObjectKind, CollisionShapeNode, ShapeGeometry, ShapeTransform,
    TransformWrapper,
};
use crate::config::BridgeConfig;
use crate::foundation::logging;
use crate::foundation::math::{Mat4, Quat, Transform, Vec3};
use crate::physics::CollisionGraphWalker;
use crate::scene::{keys, CollisionTarget, MemoryScene, MeshKind, SceneAdapter};
use crate::units::GameProfile;
use approx::assert_relative_eq;

#[cfg(test)]
mod tests {
    use super::*;

    fn walker(game: GameProfile) -> CollisionGraphWalker {
        logging::init_for_tests();
        CollisionGraphWalker::new(&BridgeConfig::default(), game).unwrap()
    }

    fn child(translation: Vec3, rotation: Quat, geometry: ShapeGeometry) -> TransformWrapper {
        TransformWrapper::new(
            ShapeTransform::new(translation, rotation),
            CollisionShapeNode::new(500_811_281, 0.1, geometry),
        )
    }

    fn three_child_list() -> ShapeGeometry {
        ShapeGeometry::List {
            children: vec![
                child(
                    Vec3::new(10.0, 0.0, 0.0),
                    Quat::identity(),
                    ShapeGeometry::Box {
                        half_extents: Vec3::new(1.0, 1.0, 2.0),
                    },
                ),
                child(
                    Vec3::new(0.0, 10.0, 0.0),
                    Quat::from_euler_angles(0.0, 0.0, 0.7),
                    ShapeGeometry::Sphere { radius: 1.5 },
                ),
                child(
                    Vec3::zeros(),
                    Quat::identity(),
                    ShapeGeometry::Capsule {
                        point1: Vec3::zeros(),
                        point2: Vec3::new(0.0, 0.0, 6.0),
                        radius: 1.0,
                    },
                ),
            ],
        }
    }

    #[test]
    fn test_list_decodes_three_children() {
        let walker = walker(GameProfile::Skyrim);
        let mut scene = MemoryScene::new();
        let target = CollisionTarget::Node(scene.add_node("Table", Mat4::identity()));

        let group = walker
            .decode(&mut scene, &body_object(target, three_child_list()))
            .unwrap()
            .unwrap();

        let children = scene.enumerate_children(group);
        assert_eq!(scene.mesh_kind(group), Some(MeshKind::Group));
        assert_eq!(children.len(), 3);
        assert_eq!(scene.mesh_kind(children[0]), Some(MeshKind::Box));
        assert_eq!(scene.mesh_kind(children[1]), Some(MeshKind::Sphere));
        assert_eq!(scene.mesh_kind(children[2]), Some(MeshKind::Capsule));
        assert_relative_eq!(
            Transform::from_matrix(scene.world_transform(children[0])).position,
            Vec3::new(1.0, 0.0, 0.0),
            epsilon = 1e-6
        );
        assert_eq!(scene.node(children[1]).unwrap().parent, Some(group));
    }

    #[test]
    fn test_list_children_follow_scene_edits() {
        let walker = walker(GameProfile::Skyrim);
        let mut scene = MemoryScene::new();
        let target_world = Mat4::new_translation(&Vec3::new(2.0, 0.0, 0.0));
        let target = CollisionTarget::Node(scene.add_node("Table", target_world));
        let group = walker
            .decode(&mut scene, &body_object(target.clone(), three_child_list()))
            .unwrap()
            .unwrap();

        let moves = [
            (Vec3::new(0.5, 0.5, 0.0), Quat::from_euler_angles(0.0, 0.0, 0.3)),
            (Vec3::new(-1.0, 0.0, 0.2), Quat::identity()),
            (Vec3::new(0.0, 0.0, -0.7), Quat::from_euler_angles(0.4, 0.0, 0.0)),
        ];
        let children = scene.enumerate_children(group);
        for (node, (offset, rotation)) in children.iter().zip(moves) {
            let world = Transform::from_position_rotation(Vec3::new(2.0, 0.0, 0.0) + offset, rotation);
            scene.set_world_transform(*node, world.to_matrix());
        }

        let exported = walker.encode(&scene, &target).unwrap().unwrap();

        assert_eq!(exported.body.kind, BodyKind::Plain);
        let ShapeGeometry::List { children } = exported.body.shape.geometry else {
            panic!("expected a list");
        };
        assert_eq!(children.len(), 3);
        for (wrapper, (offset, rotation)) in children.iter().zip(moves) {
            assert_relative_eq!(wrapper.transform.translation, offset / 0.1, epsilon = 1e-3);
            assert!(wrapper.transform.rotation.angle_to(&rotation) < 1e-4);
        }
        assert!(matches!(children[0].shape.geometry, ShapeGeometry::Box { .. }));
        let ShapeGeometry::Capsule { point1, point2, .. } = children[2].shape.geometry else {
            panic!("expected a capsule child");
        };
        assert_relative_eq!(point1, Vec3::zeros(), epsilon = 0.05);
        assert_relative_eq!(point2, Vec3::new(0.0, 0.0, 6.0), epsilon = 0.05);
    }

    #[test]
    fn test_body_without_mass_is_omitted() {
        let walker = walker(GameProfile::Skyrim);
        let mut scene = MemoryScene::new();
        let target = CollisionTarget::Node(scene.add_node("Banner", Mat4::identity()));
        let node = walker
            .decode(&mut scene, &body_object(target.clone(), ShapeGeometry::Sphere { radius: 2.0 }))
            .unwrap()
            .unwrap();

        scene.node_mut(node).unwrap().annotations.remove(keys::MASS);

        assert_eq!(walker.encode(&scene, &target), Ok(None));
    }

    #[test]
    fn test_moved_shape_forces_translated_body() {
        let walker = walker(GameProfile::Skyrim);
        let mut scene = MemoryScene::new();
        let target = CollisionTarget::Node(scene.add_node("Barrel", Mat4::identity()));
        let node = walker
            .decode(&mut scene, &body_object(target.clone(), ShapeGeometry::Sphere { radius: 2.0 }))
            .unwrap()
            .unwrap();

        scene.set_world_transform(node, Mat4::new_translation(&Vec3::new(0.0, 0.4, 0.0)));
        let exported = walker.encode(&scene, &target).unwrap().unwrap();

        assert_eq!(exported.body.kind, BodyKind::Translated);
        let local = exported.body.local_transform.unwrap();
        assert_relative_eq!(local.translation, Vec3::new(0.0, 4.0, 0.0), epsilon = 1e-4);
        assert!(matches!(exported.body.shape.geometry, ShapeGeometry::Sphere { .. }));
    }

    #[test]
    fn test_translated_body_round_trip() {
        let walker = walker(GameProfile::Fallout3);
        let mut scene = MemoryScene::new();
        let target = CollisionTarget::Node(scene.add_node("Door", Mat4::identity()));
        let mut object = body_object(
            target.clone(),
            ShapeGeometry::Box {
                half_extents: Vec3::new(5.0, 0.5, 10.0),
            },
        );
        let local = ShapeTransform::new(Vec3::new(5.0, 0.0, 10.0), Quat::from_euler_angles(0.0, 0.0, 0.25));
        object.body = object.body.with_local_transform(local);

        walker.decode(&mut scene, &object).unwrap();
        let exported = walker.encode(&scene, &target).unwrap().unwrap();

        let recovered = exported.body.local_transform.unwrap();
        assert_eq!(exported.body.kind, BodyKind::Translated);
        assert_relative_eq!(recovered.translation, local.translation, epsilon = 1e-3);
        assert!(recovered.rotation.angle_to(&local.rotation) < 1e-4);
    }

    #[test]
    fn test_unsupported_shape_is_skipped() {
        let walker = walker(GameProfile::Skyrim);
        let mut scene = MemoryScene::new();
        let target = CollisionTarget::Node(scene.add_node("Wall", Mat4::identity()));
        let mut object = body_object(target.clone(), ShapeGeometry::Sphere { radius: 1.0 });
        object.body.shape = CollisionShapeNode::unsupported("bhkMoppBvTreeShape");

        assert_eq!(walker.decode(&mut scene, &object), Ok(None));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.find_constrained(&target), None);
    }

    #[test]
    fn test_bone_target_uses_bind_pose() {
        let walker = walker(GameProfile::Skyrim);
        let mut scene = MemoryScene::new();
        let armature = scene.add_armature("Skeleton", Mat4::new_translation(&Vec3::new(0.0, 0.0, 1.0)));
        scene.add_bone(armature, "NPC Head", Mat4::new_translation(&Vec3::new(0.0, 0.0, 2.0)));
        scene.set_bone_pose(armature, "NPC Head", Mat4::new_translation(&Vec3::new(3.0, 0.0, 0.0)));
        let target = CollisionTarget::Bone {
            armature,
            bone: "NPC Head".to_string(),
        };
        let mut object = body_object(target.clone(), ShapeGeometry::Sphere { radius: 1.0 });
        object.block_name = CollisionObjectKind::Blend.block_name().to_string();
        object.flags = CollisionObjectFlags::ACTIVE | CollisionObjectFlags::NOTIFY;

        let node = walker.decode(&mut scene, &object).unwrap().unwrap();
        assert_relative_eq!(
            scene.world_transform(node),
            Mat4::new_translation(&Vec3::new(0.0, 0.0, 3.0)),
            epsilon = 1e-6
        );

        let exported = walker.encode(&scene, &target).unwrap().unwrap();
        assert_eq!(exported.block_name, "bhkBlendCollisionObject");
        assert_eq!(exported.flags, object.flags);
        assert_eq!(exported.target, target);
        assert_eq!(exported.body.kind, BodyKind::Plain);
    }

    #[test]
    fn test_scene_transform_applies_both_ways() {
        let axis_swap = Quat::from_euler_angles(std::f32::consts::FRAC_PI_2, 0.0, 0.0).to_homogeneous();
        let walker = walker(GameProfile::Oblivion).with_scene_transform(axis_swap);
        let mut scene = MemoryScene::new();
        let target = CollisionTarget::Node(scene.add_node("Statue", Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0))));
        let object = body_object(
            target.clone(),
            ShapeGeometry::Box {
                half_extents: Vec3::new(1.0, 2.0, 3.0),
            },
        );

        let node = walker.decode(&mut scene, &object).unwrap().unwrap();
        assert_relative_eq!(
            Transform::from_matrix(scene.world_transform(node)).position,
            Vec3::new(0.0, 0.0, 1.0),
            epsilon = 1e-5
        );

        let exported = walker.encode(&scene, &target).unwrap().unwrap();
        assert_eq!(exported.body.kind, BodyKind::Plain);
        let ShapeGeometry::Box { half_extents } = exported.body.shape.geometry else {
            panic!("expected an unwrapped box");
        };
        assert_relative_eq!(half_extents, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-4);
    }

    #[test]
    fn test_batches_isolate_failures() {
        let walker = walker(GameProfile::SkyrimSE);
        let mut scene = MemoryScene::new();
        let first = CollisionTarget::Node(scene.add_node("A", Mat4::identity()));
        let second = CollisionTarget::Node(scene.add_node("B", Mat4::identity()));
        let third = CollisionTarget::Node(scene.add_node("C", Mat4::identity()));

        let mut broken = body_object(second, ShapeGeometry::Sphere { radius: 1.0 });
        broken.body.shape = CollisionShapeNode::unsupported("bhkNiTriStripsShape");
        let objects = vec![
            body_object(first, ShapeGeometry::Sphere { radius: 1.0 }),
            broken,
            body_object(
                third,
                ShapeGeometry::Box {
                    half_extents: Vec3::new(1.0, 1.0, 1.0),
                },
            ),
        ];

        let nodes = walker.decode_all(&mut scene, &objects).unwrap();
        assert_eq!(nodes.len(), 2);

        let exported = walker.encode_all(&scene).unwrap();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported[0].target, objects[0].target);
        assert_eq!(exported[1].target, objects[2].target);
    }

    #[test]
    fn test_reimport_replaces_previous_collision() {
        let walker = walker(GameProfile::Skyrim);
        let mut scene = MemoryScene::new();
        let target = CollisionTarget::Node(scene.add_node("Barrel", Mat4::identity()));

        walker
            .decode(&mut scene, &body_object(target.clone(), ShapeGeometry::Sphere { radius: 1.0 }))
            .unwrap();
        let second = walker
            .decode(&mut scene, &body_object(target.clone(), ShapeGeometry::Sphere { radius: 5.0 }))
            .unwrap()
            .unwrap();

        assert_eq!(scene.find_constrained(&target), Some(second));
        assert_eq!(walker.encode_all(&scene).unwrap().len(), 1);

        let exported = walker.encode(&scene, &target).unwrap().unwrap();
        let ShapeGeometry::Sphere { radius } = exported.body.shape.geometry else {
            panic!("expected a sphere");
        };
        assert_relative_eq!(radius, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_unregistered_scale_aborts() {
        let mut config = BridgeConfig::default();
        config.game_scales.retain(|entry| entry.game != GameProfile::Oblivion);

        let result = CollisionGraphWalker::new(&config, GameProfile::Oblivion);

        assert!(result.is_err());
        assert!(!result.unwrap_err().is_recoverable());
    }
}
