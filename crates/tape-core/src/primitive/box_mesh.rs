//! Box mesh generation

use glam::Vec3;

use crate::model::MeshGeometry;

/// Box centred on the origin with the given full extents.
///
/// 24 vertices (4 per face, so every face keeps a flat normal), 12 triangles
/// wound counter-clockwise when seen from outside.
pub fn generate_box_mesh(size: Vec3) -> MeshGeometry {
    let h = size * 0.5;

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // (normal, tangent u, tangent v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        let center = normal * h;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = center + u * h * su + v * h * sv;
            positions.push(corner.to_array());
            normals.push(normal.to_array());
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshGeometry::new(positions, normals, indices)
}
