//! Vertex formats

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use tape_core::MeshGeometry;
use tape_core::model::calculate_triangle_normal;

/// Vertex for mesh rendering with position and normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Vertex position in local space.
    pub position: [f32; 3],
    /// Vertex normal vector.
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as u64,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ];

    /// Returns the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Build indexed vertices for a triangle mesh.
///
/// Meshes with per-vertex normals keep their index buffer. Meshes without are
/// expanded to three vertices per triangle so each face gets a flat normal.
pub fn triangle_vertices(geometry: &MeshGeometry) -> (Vec<MeshVertex>, Vec<u32>) {
    if geometry.normals.len() == geometry.positions.len() {
        let vertices = geometry
            .positions
            .iter()
            .zip(&geometry.normals)
            .map(|(&position, &normal)| MeshVertex { position, normal })
            .collect();
        return (vertices, geometry.indices.clone());
    }

    let mut vertices = Vec::with_capacity(geometry.indices.len());
    for [a, b, c] in geometry.triangles() {
        let normal = calculate_triangle_normal(a, b, c).to_array();
        for p in [a, b, c] {
            vertices.push(MeshVertex {
                position: p.to_array(),
                normal,
            });
        }
    }
    let indices = (0..vertices.len() as u32).collect();
    (vertices, indices)
}

/// Build vertices for a line list. Normals are unused and left at zero.
pub fn line_vertices(geometry: &MeshGeometry) -> (Vec<MeshVertex>, Vec<u32>) {
    let vertices = geometry
        .positions
        .iter()
        .map(|&position| MeshVertex {
            position,
            normal: Vec3::ZERO.to_array(),
        })
        .collect();
    (vertices, geometry.indices.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_shading_expands_triangles() {
        let geometry = MeshGeometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            Vec::new(),
            vec![0, 1, 2, 0, 2, 3],
        );
        let (vertices, indices) = triangle_vertices(&geometry);
        assert_eq!(vertices.len(), 6);
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_smooth_normals_keep_indices() {
        let geometry = tape_core::primitive::generate_box_mesh(Vec3::ONE);
        let (vertices, indices) = triangle_vertices(&geometry);
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
    }
}
