//! Editable primitive meshes
//!
//! Generates the scene meshes collision shapes are shown as. Capsules and
//! spheres are surfaces of revolution with a single vertex at each tip, so
//! the tips are the only vertices with more than four neighbours.

use std::f32::consts::{FRAC_PI_2, PI};

use super::analysis;
use super::mesh::MeshGeometry;
use crate::error::BridgeResult;
use crate::foundation::math::{orthonormal_basis, Vec3};

/// Axis-aligned box centered on the origin.
///
/// Vertex `i` sits on the positive side of X, Y, Z when bit 0, 1, 2 is set.
pub fn box_mesh(half_extents: Vec3) -> MeshGeometry {
    let vertices = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -half_extents.x } else { half_extents.x },
                if i & 2 == 0 { -half_extents.y } else { half_extents.y },
                if i & 4 == 0 { -half_extents.z } else { half_extents.z },
            )
        })
        .collect();

    let faces = vec![
        vec![0, 4, 6, 2], // -X
        vec![1, 3, 7, 5], // +X
        vec![0, 1, 5, 4], // -Y
        vec![2, 6, 7, 3], // +Y
        vec![0, 2, 3, 1], // -Z
        vec![4, 5, 7, 6], // +Z
    ];

    MeshGeometry::new(vertices, faces)
}

/// Hemisphere-capped cylinder whose caps are centered on `point1` and `point2`.
///
/// Coincident points give a sphere; the axis then defaults to +Z.
pub fn capsule_mesh(point1: Vec3, point2: Vec3, radius: f32, segments: u32, rings: u32) -> MeshGeometry {
    let centerline = point2 - point1;
    let length = centerline.norm();
    let axis = if length > f32::EPSILON { centerline / length } else { Vec3::z() };
    let rings = rings.max(1);

    let latitude = |k: u32| FRAC_PI_2 * k as f32 / rings as f32;
    let bottom = (1..=rings).map(|k| (-radius * latitude(k).cos(), radius * latitude(k).sin()));
    let top = (1..=rings).rev().map(|k| (length + radius * latitude(k).cos(), radius * latitude(k).sin()));
    let profile: Vec<(f32, f32)> = bottom.chain(top).collect();

    revolve(point1, axis, -radius, length + radius, &profile, segments)
}

/// UV sphere centered on the origin, poles on the Z axis
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> MeshGeometry {
    let rings = rings.max(2);
    let profile: Vec<(f32, f32)> = (1..rings)
        .map(|k| {
            let phi = PI * k as f32 / rings as f32;
            (-radius * phi.cos(), radius * phi.sin())
        })
        .collect();

    revolve(Vec3::zeros(), Vec3::z(), -radius, radius, &profile, segments)
}

/// Convex hull of `points` as a triangle mesh
pub fn hull_mesh(points: &[Vec3]) -> BridgeResult<MeshGeometry> {
    let (vertices, triangles) = analysis::convex_hull(points)?;
    let faces = triangles.iter().map(|t| t.to_vec()).collect();
    Ok(MeshGeometry::new(vertices, faces))
}

/// Surface of revolution around `axis` through `origin`.
///
/// `profile` lists the interior rings as (offset along axis, ring radius);
/// single tip vertices close the surface at `bottom` and `top`.
fn revolve(origin: Vec3, axis: Vec3, bottom: f32, top: f32, profile: &[(f32, f32)], segments: u32) -> MeshGeometry {
    let segments = segments.max(3);
    let (u, v) = orthonormal_basis(&axis);

    let mut vertices = Vec::with_capacity(profile.len() * segments as usize + 2);
    vertices.push(origin + axis * bottom);
    for (offset, ring_radius) in profile {
        for s in 0..segments {
            let theta = 2.0 * PI * s as f32 / segments as f32;
            let radial = u * theta.cos() + v * theta.sin();
            vertices.push(origin + axis * *offset + radial * *ring_radius);
        }
    }
    vertices.push(origin + axis * top);

    let ring_start = |ring: usize| 1 + (ring as u32) * segments;
    let tip_top = vertices.len() as u32 - 1;
    let mut faces = Vec::new();

    if profile.is_empty() {
        return MeshGeometry::new(vertices, faces);
    }

    for s in 0..segments {
        let next = (s + 1) % segments;
        faces.push(vec![0, ring_start(0) + next, ring_start(0) + s]);
    }
    for ring in 0..profile.len() - 1 {
        let (lower, upper) = (ring_start(ring), ring_start(ring + 1));
        for s in 0..segments {
            let next = (s + 1) % segments;
            faces.push(vec![lower + s, lower + next, upper + next, upper + s]);
        }
    }
    let last = ring_start(profile.len() - 1);
    for s in 0..segments {
        let next = (s + 1) % segments;
        faces.push(vec![last + s, last + next, tip_top]);
    }

    MeshGeometry::new(vertices, faces)
}
