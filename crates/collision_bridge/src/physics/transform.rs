//! Transform composition between asset and scene frames
//!
//! On import a shape is placed at
//! `scene_transform * target_world * body_local * wrapper...`, with every
//! asset-side translation scaled into scene units. On export the shape's
//! world placement is expressed relative to the body frame again and the
//! translation scaled back. Rotations are carried as quaternions and never
//! scaled.
//!
//! Target scale is dropped on both sides: Havok bodies cannot be scaled.

use crate::asset::ShapeTransform;
use crate::foundation::math::{rigid_part, transform_points, Mat4, Transform, Vec3};

/// Composes and decomposes body and shape transforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformComposer {
    import_factor: f32,
    export_factor: f32,
    identity_tolerance: f32,
}

impl TransformComposer {
    /// Create a composer from the resolved length factors
    pub const fn new(import_factor: f32, export_factor: f32, identity_tolerance: f32) -> Self {
        Self {
            import_factor,
            export_factor,
            identity_tolerance,
        }
    }

    /// Asset length to scene length multiplier
    pub const fn import_factor(&self) -> f32 {
        self.import_factor
    }

    /// Scene length to asset length divisor
    pub const fn export_factor(&self) -> f32 {
        self.export_factor
    }

    /// World frame of a body's shape tree on import
    pub fn decode_frame(&self, scene_transform: &Mat4, target_world: &Mat4, body_local: Option<&ShapeTransform>) -> Mat4 {
        let frame = self.encode_frame(scene_transform, target_world);
        match body_local {
            Some(local) => frame * self.wrapper_matrix(local),
            None => frame,
        }
    }

    /// World frame shapes are expressed against on export
    pub fn encode_frame(&self, scene_transform: &Mat4, target_world: &Mat4) -> Mat4 {
        scene_transform * rigid_part(target_world)
    }

    /// Scene-space matrix of an asset-side transform
    pub fn wrapper_matrix(&self, transform: &ShapeTransform) -> Mat4 {
        transform.to_matrix(self.import_factor)
    }

    /// Placement of `world` relative to `frame`, in asset units.
    ///
    /// Scale on either matrix is discarded.
    pub fn relative(&self, frame: &Mat4, world: &Mat4) -> ShapeTransform {
        let local = Transform::from_matrix(inverse_rigid(frame) * rigid_part(world));
        ShapeTransform::new(local.position / self.export_factor, local.rotation)
    }

    /// World-space points expressed in `frame`, in asset units
    pub fn to_asset_points(&self, frame: &Mat4, points: &[Vec3]) -> Vec<Vec3> {
        transform_points(&inverse_rigid(frame), points)
            .into_iter()
            .map(|p| p / self.export_factor)
            .collect()
    }

    /// Whether a transform is close enough to identity to be dropped
    pub fn is_identity(&self, transform: &ShapeTransform) -> bool {
        transform.is_identity(self.identity_tolerance)
    }
}

fn inverse_rigid(frame: &Mat4) -> Mat4 {
    rigid_part(frame).try_inverse().unwrap_or_else(Mat4::identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use approx::assert_relative_eq;

    #[test]
    fn test_relative_inverts_decode_frame() {
        let composer = TransformComposer::new(0.1, 0.1, 1e-5);
        let target = Transform::from_position_rotation(
            Vec3::new(4.0, 0.0, -2.0),
            Quat::from_euler_angles(0.2, 0.0, 1.0),
        )
        .to_matrix();
        let local = ShapeTransform::new(Vec3::new(10.0, 5.0, 0.0), Quat::from_euler_angles(0.0, 0.6, 0.0));

        let frame = composer.encode_frame(&Mat4::identity(), &target);
        let shape_world = composer.decode_frame(&Mat4::identity(), &target, Some(&local));
        let recovered = composer.relative(&frame, &shape_world);

        assert_relative_eq!(recovered.translation, local.translation, epsilon = 1e-4);
        assert!(recovered.rotation.angle_to(&local.rotation) < 1e-5);
    }

    #[test]
    fn test_target_scale_is_ignored() {
        let composer = TransformComposer::new(0.1, 0.1, 1e-5);
        let scaled = Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)) * Mat4::new_scaling(3.0);

        let frame = composer.encode_frame(&Mat4::identity(), &scaled);

        assert_relative_eq!(frame, Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)), epsilon = 1e-6);
    }

    #[test]
    fn test_asset_points_use_export_factor() {
        let composer = TransformComposer::new(0.1, 0.2, 1e-5);
        let frame = Mat4::new_translation(&Vec3::new(0.0, 0.0, 1.0));

        let points = composer.to_asset_points(&frame, &[Vec3::new(0.2, 0.0, 1.0)]);

        assert_relative_eq!(points[0], Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        assert!(composer.is_identity(&ShapeTransform::identity()));
    }
}
