//! UV sphere generation (Y-up)

use std::f32::consts::PI;

use crate::model::MeshGeometry;

/// UV sphere centred on the origin.
///
/// `width_segments` runs around the Y axis, `height_segments` from pole to pole.
pub fn generate_sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshGeometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for lat in 0..=height_segments {
        let theta = lat as f32 / height_segments as f32 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=width_segments {
            let phi = lon as f32 / width_segments as f32 * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let n = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            positions.push(n.map(|c| c * radius));
            normals.push(n);
        }
    }

    let stride = width_segments + 1;
    for lat in 0..height_segments {
        for lon in 0..width_segments {
            let a = lat * stride + lon;
            let b = a + stride;

            if lat != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if lat != height_segments - 1 {
                indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    MeshGeometry::new(positions, normals, indices)
}
