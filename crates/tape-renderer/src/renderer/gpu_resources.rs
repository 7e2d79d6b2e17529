//! GPU resource creation helpers.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::resources::{GpuMesh, MeshResource, Topology};
use crate::vertex::{MeshVertex, line_vertices, triangle_vertices};

/// Depth buffer format shared by every pipeline
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-node uniform data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct NodeUniform {
    /// Node-to-world matrix
    pub model: [[f32; 4]; 4],
    /// Material color (RGBA)
    pub color: [f32; 4],
}

impl NodeUniform {
    /// Build from a world transform and color
    pub fn new(world: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: world.to_cols_array_2d(),
            color,
        }
    }
}

/// Create depth texture and view.
pub fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Bind group layout holding a single uniform buffer.
pub fn create_uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Bind a uniform buffer to a layout made by [`create_uniform_layout`].
pub fn create_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

/// Pipeline variant
pub struct PipelineSpec<'a> {
    /// Debug label
    pub label: &'a str,
    /// Shader with `vs_main` and `fs_main`
    pub shader: &'a wgpu::ShaderModule,
    /// Bind group layouts in group order
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    /// Primitive topology
    pub topology: wgpu::PrimitiveTopology,
    /// Depth test and write; `false` draws on top of everything
    pub depth_tested: bool,
}

/// Create a render pipeline over [`MeshVertex`] buffers.
pub fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    spec: &PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(spec.label),
        bind_group_layouts: spec.bind_group_layouts,
        push_constant_ranges: &[],
    });

    let (depth_write_enabled, depth_compare) = if spec.depth_tested {
        (true, wgpu::CompareFunction::Less)
    } else {
        (false, wgpu::CompareFunction::Always)
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            cull_mode: None, // both faces are pickable, so both are drawn
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Upload a mesh's vertices, indices and node uniform.
pub fn create_gpu_mesh(
    device: &wgpu::Device,
    node_layout: &wgpu::BindGroupLayout,
    resource: &MeshResource,
) -> GpuMesh {
    let (vertices, indices) = match resource.topology {
        Topology::Triangles => triangle_vertices(&resource.geometry),
        Topology::Lines => line_vertices(&resource.geometry),
    };

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Vertex Buffer"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Index Buffer"),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let uniform = NodeUniform::new(Mat4::IDENTITY, resource.material.color);
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Node Uniform Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group =
        create_uniform_bind_group(device, node_layout, &uniform_buffer, "Node Bind Group");

    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: indices.len() as u32,
        uniform_buffer,
        bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_uniform_size() {
        assert_eq!(std::mem::size_of::<NodeUniform>(), 80);
    }
}
