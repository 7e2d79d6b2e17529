//! Primitive mesh generation
//!
//! - Box: demo content and picking fixtures
//! - UV sphere: measurement marker glyph

mod box_mesh;
mod sphere;

pub use box_mesh::generate_box_mesh;
pub use sphere::generate_sphere_mesh;

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_box_mesh() {
        let mesh = generate_box_mesh(Vec3::ONE);
        assert_eq!(mesh.positions.len(), 24); // 6 faces * 4 vertices
        assert_eq!(mesh.normals.len(), 24);
        assert_eq!(mesh.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
    }

    #[test]
    fn test_box_dimensions() {
        let mesh = generate_box_mesh(Vec3::new(2.0, 4.0, 6.0));
        let (min, max) = mesh.bounds().unwrap();
        let size = max - min;
        assert!((size.x - 2.0).abs() < 0.001);
        assert!((size.y - 4.0).abs() < 0.001);
        assert!((size.z - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_box_winding_faces_outward() {
        let mesh = generate_box_mesh(Vec3::splat(2.0));
        for (tri, normal) in mesh.indices.chunks_exact(3).zip(
            crate::model::calculate_face_normals(&mesh.positions, &mesh.indices),
        ) {
            let declared = Vec3::from(mesh.normals[tri[0] as usize]);
            assert!(declared.dot(Vec3::from(normal)) > 0.99);
        }
    }

    #[test]
    fn test_sphere_mesh() {
        let mesh = generate_sphere_mesh(0.5, 16, 16);
        assert_eq!(mesh.positions.len(), 17 * 17);
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.indices.len() % 3, 0);
        for p in &mesh.positions {
            assert!((Vec3::from(*p).length() - 0.5).abs() < 1e-4);
        }
    }
}
