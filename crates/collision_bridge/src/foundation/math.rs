//! Math utilities and types
//!
//! Provides the fundamental math types shared by the asset and scene sides of
//! the bridge. Everything is `f32`, matching the precision Havok stores.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (Havok plane equations)
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Decompose a transformation matrix into translation, rotation and scale.
    ///
    /// Shear is discarded. A zero-length axis keeps an identity column so the
    /// rotation stays valid. A mirrored matrix reports a negative x scale.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

        let columns = [
            Vec3::new(matrix.m11, matrix.m21, matrix.m31),
            Vec3::new(matrix.m12, matrix.m22, matrix.m32),
            Vec3::new(matrix.m13, matrix.m23, matrix.m33),
        ];
        let mut scale = Vec3::new(columns[0].norm(), columns[1].norm(), columns[2].norm());

        // A mirror lives in the scale so the rotation stays proper
        let mirrored = columns[0].cross(&columns[1]).dot(&columns[2]) < 0.0;
        let columns = if mirrored {
            scale.x = -scale.x;
            [-columns[0], columns[1], columns[2]]
        } else {
            columns
        };

        let mut axes = [Vec3::x(), Vec3::y(), Vec3::z()];
        for (axis, (column, length)) in axes.iter_mut().zip(columns.iter().zip(scale.iter())) {
            if length.abs() > f32::EPSILON {
                *axis = column / length.abs();
            }
        }
        let rotation_matrix = Mat3::from_columns(&axes);
        let rotation = Quat::from_rotation_matrix(
            &nalgebra::Rotation3::from_matrix_unchecked(rotation_matrix),
        );

        Self {
            position,
            rotation,
            scale,
        }
    }

    /// The same placement without scale
    pub fn rigid(&self) -> Self {
        Self::from_position_rotation(self.position, self.rotation)
    }
}

/// Strip scale and shear from a matrix, keeping translation and rotation.
pub fn rigid_part(matrix: &Mat4) -> Mat4 {
    Transform::from_matrix(*matrix).rigid().to_matrix()
}

/// Apply a matrix to a list of points.
pub fn transform_points(matrix: &Mat4, points: &[Vec3]) -> Vec<Vec3> {
    points
        .iter()
        .map(|p| matrix.transform_point(&Point3::from(*p)).coords)
        .collect()
}

/// Two unit vectors perpendicular to `axis` and to each other.
pub fn orthonormal_basis(axis: &Vec3) -> (Vec3, Vec3) {
    let helper = if axis.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let u = axis.cross(&helper).normalize();
    let v = axis.cross(&u);
    (u, v)
}
