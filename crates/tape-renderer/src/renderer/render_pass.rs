//! Main render pass execution.

use crate::resources::{GpuMesh, Topology};
use crate::scene::{Drawable, Scene};

/// Pipelines the main pass switches between
pub struct Pipelines {
    /// Lit, depth-tested triangles
    pub mesh: wgpu::RenderPipeline,
    /// Flat triangles drawn on top
    pub overlay_triangles: wgpu::RenderPipeline,
    /// Flat lines drawn on top
    pub overlay_lines: wgpu::RenderPipeline,
}

/// Main pass parameters.
pub struct MainPassParams<'a> {
    /// Pipelines
    pub pipelines: &'a Pipelines,
    /// Scene owning the meshes
    pub scene: &'a Scene,
    /// What to draw, in order
    pub drawables: &'a [Drawable],
    /// Camera uniform (group 0)
    pub camera_bind_group: &'a wgpu::BindGroup,
    /// Light uniform (group 2 of the lit pipeline)
    pub light_bind_group: &'a wgpu::BindGroup,
    /// Depth view.
    pub depth_view: &'a wgpu::TextureView,
    /// Clear color.
    pub clear_color: wgpu::Color,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    Lit,
    OverlayTriangles,
    OverlayLines,
}

/// Execute the main render pass.
///
/// Lit geometry goes first so the overlay passes land on top of it.
pub fn render_main_pass(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    params: &MainPassParams<'_>,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Main Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(params.clear_color),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: params.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    render_pass.set_bind_group(0, params.camera_bind_group, &[]);

    for pass in [Pass::Lit, Pass::OverlayTriangles, Pass::OverlayLines] {
        let pipeline = match pass {
            Pass::Lit => &params.pipelines.mesh,
            Pass::OverlayTriangles => &params.pipelines.overlay_triangles,
            Pass::OverlayLines => &params.pipelines.overlay_lines,
        };
        render_pass.set_pipeline(pipeline);
        if pass == Pass::Lit {
            render_pass.set_bind_group(2, params.light_bind_group, &[]);
        }

        for drawable in params.drawables {
            let Some(resource) = params.scene.meshes().get(drawable.mesh) else {
                continue;
            };
            let target = match (resource.topology, resource.material.lit) {
                (Topology::Triangles, true) => Pass::Lit,
                (Topology::Triangles, false) => Pass::OverlayTriangles,
                (Topology::Lines, _) => Pass::OverlayLines,
            };
            if target != pass {
                continue;
            }
            if let Some(gpu) = resource.gpu() {
                draw_mesh(&mut render_pass, gpu);
            }
        }
    }
}

fn draw_mesh(render_pass: &mut wgpu::RenderPass<'_>, gpu: &GpuMesh) {
    render_pass.set_bind_group(1, &gpu.bind_group, &[]);
    render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
    render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
}
