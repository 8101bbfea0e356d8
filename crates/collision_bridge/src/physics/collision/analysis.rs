//! Inverse geometry solvers
//!
//! Recover canonical shape parameters from edited scene meshes. All
//! functions are pure: plain arrays and a world matrix in, parameters out.
//!
//! Box analysis reads the object transform, not the raw vertices. Vertex
//! edits that were never applied to the transform are not seen.

use parry3d::transformation;

use super::mesh::MeshGeometry;
use crate::asset::ShapeKind;
use crate::error::{BridgeError, BridgeResult};
use crate::foundation::math::{Mat4, Point3, Quat, Transform, Vec3, Vec4};

/// Extents below this count as collapsed
const DEGENERATE_EPSILON: f32 = 1e-6;

/// UV-sphere singularities have more neighbours than any ring vertex
const POLE_DEGREE: usize = 4;

/// Recovered box placement and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxInfo {
    /// World-space center
    pub center: Vec3,
    /// Full extents along the box axes, world units
    pub dimensions: Vec3,
    /// Local-to-world rotation
    pub rotation: Quat,
}

impl BoxInfo {
    /// Rigid world matrix of the box center
    pub fn placement(&self) -> Mat4 {
        Mat4::new_translation(&self.center) * self.rotation.to_homogeneous()
    }
}

/// Recovered capsule cap centers and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleInfo {
    /// First cap center, world space
    pub point1: Vec3,
    /// Second cap center, world space
    pub point2: Vec3,
    /// Radius, world units
    pub radius: f32,
}

/// Recover (center, full extents, rotation) of a box object.
///
/// Dimensions are the local bounding box scaled by the object scale. A
/// mirrored object reports positive dimensions and a proper rotation.
pub fn box_info(mesh: &MeshGeometry, world: &Mat4) -> BridgeResult<BoxInfo> {
    let (min, max) = mesh
        .local_bounds()
        .ok_or_else(|| BridgeError::degenerate(ShapeKind::Box, "mesh has no vertices"))?;

    let placement = Transform::from_matrix(*world);
    let dimensions = (max - min).component_mul(&placement.scale.abs());

    let spanned = dimensions.iter().filter(|d| **d > DEGENERATE_EPSILON).count();
    if spanned < 3 {
        return Err(BridgeError::degenerate(
            ShapeKind::Box,
            format!("only {spanned} of 3 dimensions have extent"),
        ));
    }

    let local_center = Point3::from((min + max) * 0.5);
    Ok(BoxInfo {
        center: world.transform_point(&local_center).coords,
        dimensions,
        rotation: placement.rotation,
    })
}

/// Recover cap centers and radius of a capsule mesh.
///
/// Poles are the vertices with more than four neighbours; the two farthest
/// apart are the outer tips. The radius comes from the vertex ring nearest
/// the plane through the centroid, perpendicular to the centerline, measured
/// as its mean distance from the centerline. The tips are pulled inward by it.
pub fn capsule_ends(mesh: &MeshGeometry, world: &Mat4, ring_tolerance: f32) -> BridgeResult<CapsuleInfo> {
    let points = mesh.world_vertices(world);
    let degrees = mesh.vertex_degrees();
    let is_pole: Vec<bool> = degrees.iter().map(|d| *d > POLE_DEGREE).collect();

    let poles: Vec<Vec3> = points
        .iter()
        .zip(&is_pole)
        .filter(|(_, pole)| **pole)
        .map(|(p, _)| *p)
        .collect();
    let (tip1, tip2) = farthest_pair(&poles).ok_or_else(|| {
        BridgeError::degenerate(
            ShapeKind::Capsule,
            format!("found {} pole vertices, need 2", poles.len()),
        )
    })?;

    let centerline = tip2 - tip1;
    let length = centerline.norm();
    if length <= DEGENERATE_EPSILON {
        return Err(BridgeError::degenerate(ShapeKind::Capsule, "pole vertices coincide"));
    }
    let axis = centerline / length;

    let centroid = points.iter().fold(Vec3::zeros(), |acc, p| acc + p) / points.len() as f32;
    let offsets: Vec<f32> = points.iter().map(|p| (p - centroid).dot(&axis)).collect();

    // Signed, so a centroid equidistant from two rings picks exactly one
    let nearest = offsets
        .iter()
        .zip(&is_pole)
        .filter(|(_, pole)| !**pole)
        .map(|(offset, _)| *offset)
        .min_by(|a, b| a.abs().total_cmp(&b.abs()))
        .ok_or_else(|| BridgeError::degenerate(ShapeKind::Capsule, "no vertices besides the poles"))?;

    let ring: Vec<Vec3> = points
        .iter()
        .zip(offsets.iter().zip(&is_pole))
        .filter(|(_, (offset, pole))| !**pole && (**offset - nearest).abs() <= ring_tolerance)
        .map(|(p, _)| *p)
        .collect();

    // Odd rings have no opposite pairs, so no diameter to read
    let radius = ring
        .iter()
        .map(|p| {
            let offset = p - tip1;
            (offset - axis * offset.dot(&axis)).norm()
        })
        .sum::<f32>()
        / ring.len() as f32;
    if radius <= DEGENERATE_EPSILON {
        return Err(BridgeError::degenerate(ShapeKind::Capsule, "cap vertex ring is indistinguishable"));
    }

    Ok(CapsuleInfo {
        point1: tip1 + axis * radius,
        point2: tip2 - axis * radius,
        radius,
    })
}

/// Convex hull of a point cloud as (vertices, triangles).
///
/// Fails on fewer than four points or when the points do not span a volume.
pub fn convex_hull(points: &[Vec3]) -> BridgeResult<(Vec<Vec3>, Vec<[u32; 3]>)> {
    if points.len() < 4 {
        return Err(BridgeError::degenerate(
            ShapeKind::ConvexHull,
            format!("{} points cannot enclose a volume", points.len()),
        ));
    }
    if !spans_volume(points) {
        return Err(BridgeError::degenerate(ShapeKind::ConvexHull, "points are coplanar"));
    }

    let input: Vec<Point3> = points.iter().map(|p| Point3::from(*p)).collect();
    let (vertices, triangles) = transformation::convex_hull(&input);
    if triangles.len() < 4 {
        return Err(BridgeError::degenerate(ShapeKind::ConvexHull, "hull has no volume"));
    }

    Ok((vertices.into_iter().map(|p| p.coords).collect(), triangles))
}

/// Outward face planes `(nx, ny, nz, w)` of a hull, with `n·p + w = 0` on the face.
///
/// Faces whose normals differ by less than `angle_tolerance` radians and whose
/// plane offsets differ by less than `distance_tolerance` are merged.
pub fn hull_planes(
    vertices: &[Vec3],
    triangles: &[[u32; 3]],
    angle_tolerance: f32,
    distance_tolerance: f32,
) -> Vec<Vec4> {
    if vertices.is_empty() {
        return Vec::new();
    }
    let interior = vertices.iter().fold(Vec3::zeros(), |acc, v| acc + v) / vertices.len() as f32;

    let mut planes: Vec<Vec4> = Vec::new();
    for &triangle in triangles {
        let [Some(a), Some(b), Some(c)] = triangle.map(|i| vertices.get(i as usize)) else {
            continue;
        };
        let cross = (b - a).cross(&(c - a));
        let area = cross.norm();
        if area <= DEGENERATE_EPSILON {
            continue;
        }
        let mut normal = cross / area;
        if normal.dot(&(a - interior)) < 0.0 {
            normal = -normal;
        }
        let offset = -normal.dot(a);

        let duplicate = planes.iter().any(|plane| {
            let existing = plane.xyz();
            let angle = existing.cross(&normal).norm().atan2(existing.dot(&normal));
            angle < angle_tolerance && (plane.w - offset).abs() < distance_tolerance
        });
        if !duplicate {
            planes.push(Vec4::new(normal.x, normal.y, normal.z, offset));
        }
    }
    planes
}

fn spans_volume(points: &[Vec3]) -> bool {
    let origin = points[0];
    let Some(far) = max_by_measure(points, |p| (p - origin).norm()) else {
        return false;
    };
    let edge = far - origin;
    let extent = edge.norm();
    let tolerance = DEGENERATE_EPSILON * extent.max(1.0);
    if extent <= tolerance {
        return false;
    }

    let Some(side) = max_by_measure(points, |p| (p - origin).cross(&edge).norm()) else {
        return false;
    };
    let normal = edge.cross(&(side - origin));
    if normal.norm() <= tolerance * extent {
        return false;
    }
    let normal = normal.normalize();

    points.iter().any(|p| (p - origin).dot(&normal).abs() > tolerance)
}

fn max_by_measure(points: &[Vec3], measure: impl Fn(&Vec3) -> f32) -> Option<Vec3> {
    points
        .iter()
        .copied()
        .max_by(|a, b| measure(a).total_cmp(&measure(b)))
}

fn farthest_pair(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let mut best: Option<(f32, Vec3, Vec3)> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let distance = (a - b).norm_squared();
            if best.map_or(true, |(d, _, _)| distance > d) {
                best = Some((distance, *a, *b));
            }
        }
    }
    best.map(|(_, a, b)| (a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::primitives;
    use approx::assert_relative_eq;

    fn cube_points() -> Vec<Vec3> {
        (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { -1.0 } else { 1.0 },
                    if i & 2 == 0 { -1.0 } else { 1.0 },
                    if i & 4 == 0 { -1.0 } else { 1.0 },
                )
            })
            .collect()
    }

    #[test]
    fn test_box_info_reads_transform() {
        let mesh = primitives::box_mesh(Vec3::new(0.5, 0.5, 0.5));
        let rotation = Quat::from_euler_angles(0.35, 1.4, 0.0);
        let world = Transform {
            position: Vec3::new(3.0, -1.0, 2.0),
            rotation,
            scale: Vec3::new(2.0, 4.0, 6.0),
        }
        .to_matrix();

        let info = box_info(&mesh, &world).unwrap();

        assert_relative_eq!(info.dimensions, Vec3::new(2.0, 4.0, 6.0), epsilon = 1e-4);
        assert_relative_eq!(info.center, Vec3::new(3.0, -1.0, 2.0), epsilon = 1e-5);
        assert!(info.rotation.angle_to(&rotation) < 1e-4);
    }

    #[test]
    fn test_mirrored_box_keeps_rotation() {
        let mesh = primitives::box_mesh(Vec3::new(1.0, 2.0, 3.0));
        let rotation = Quat::from_euler_angles(0.0, 0.0, 0.5);
        let world = rotation.to_homogeneous() * Mat4::new_nonuniform_scaling(&Vec3::new(-1.0, 1.0, 1.0));

        let info = box_info(&mesh, &world).unwrap();

        assert_relative_eq!(info.dimensions, Vec3::new(2.0, 4.0, 6.0), epsilon = 1e-5);
        assert!(info.rotation.angle_to(&rotation) < 1e-5);
        assert_relative_eq!(info.rotation.to_rotation_matrix().matrix().determinant(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_flat_box_is_degenerate() {
        let mesh = primitives::box_mesh(Vec3::new(1.0, 1.0, 0.0));
        let result = box_info(&mesh, &Mat4::identity());
        assert!(matches!(result, Err(BridgeError::DegenerateShape { kind: ShapeKind::Box, .. })));
    }

    #[test]
    fn test_capsule_ends_recover_cap_centers() {
        let mesh = primitives::capsule_mesh(Vec3::zeros(), Vec3::new(0.0, 0.0, 10.0), 2.0, 16, 4);

        let info = capsule_ends(&mesh, &Mat4::identity(), 1e-3).unwrap();

        assert_relative_eq!(info.radius, 2.0, epsilon = 1e-3);
        assert_relative_eq!(info.point1, Vec3::zeros(), epsilon = 1e-3);
        assert_relative_eq!(info.point2, Vec3::new(0.0, 0.0, 10.0), epsilon = 1e-3);
    }

    #[test]
    fn test_capsule_radius_with_odd_segment_count() {
        let mesh = primitives::capsule_mesh(Vec3::zeros(), Vec3::new(0.0, 0.0, 10.0), 2.0, 7, 4);

        let info = capsule_ends(&mesh, &Mat4::identity(), 1e-3).unwrap();

        assert_relative_eq!(info.radius, 2.0, epsilon = 1e-3);
        assert_relative_eq!(info.point2 - info.point1, Vec3::new(0.0, 0.0, 10.0), epsilon = 1e-3);
    }

    #[test]
    fn test_capsule_without_poles_is_degenerate() {
        let mesh = primitives::box_mesh(Vec3::new(1.0, 1.0, 1.0));
        let result = capsule_ends(&mesh, &Mat4::identity(), 1e-3);
        assert!(matches!(result, Err(BridgeError::DegenerateShape { kind: ShapeKind::Capsule, .. })));
    }

    #[test]
    fn test_cube_hull_has_six_planes() {
        let mut points = cube_points();
        points.push(Vec3::new(0.2, 0.1, -0.3));

        let (vertices, triangles) = convex_hull(&points).unwrap();
        let planes = hull_planes(&vertices, &triangles, 1e-3, 1e-4);

        assert_eq!(vertices.len(), 8);
        assert_eq!(planes.len(), 6);
        for plane in &planes {
            assert_relative_eq!(plane.xyz().norm(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(plane.w, -1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_coplanar_points_are_rejected() {
        let flat: Vec<Vec3> = cube_points().into_iter().filter(|p| p.z > 0.0).collect();
        assert!(convex_hull(&flat).is_err());
        assert!(convex_hull(&flat[..3]).is_err());
    }
}
