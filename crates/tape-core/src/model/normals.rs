//! Face normal calculation

use glam::Vec3;

/// Unit normal of a counter-clockwise triangle. Degenerate triangles get +Y.
pub fn calculate_triangle_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    let normal = (v1 - v0).cross(v2 - v0);
    normal.try_normalize().unwrap_or(Vec3::Y)
}

/// One normal per triangle. Triangles referencing missing vertices get +Y.
pub fn calculate_face_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    indices
        .chunks_exact(3)
        .map(|tri| {
            let vertex = |i: u32| positions.get(i as usize).copied().map(Vec3::from);
            match (vertex(tri[0]), vertex(tri[1]), vertex(tri[2])) {
                (Some(a), Some(b), Some(c)) => calculate_triangle_normal(a, b, c).to_array(),
                _ => Vec3::Y.to_array(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_normal() {
        let n = calculate_triangle_normal(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn test_degenerate_triangle() {
        let n = calculate_triangle_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn test_face_normals_count() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]];
        let normals = calculate_face_normals(&positions, &[0, 1, 2, 0, 1, 7]);
        assert_eq!(normals.len(), 2);
        assert_eq!(normals[0], [0.0, 1.0, 0.0]);
    }
}
