//! wgpu renderer for the scene graph.
//!
//! The renderer owns pipelines, the camera and light uniforms and the depth
//! buffer. Meshes stay owned by the [`Scene`]; [`Renderer::sync`] uploads any
//! mesh that has no GPU buffers yet and [`Renderer::render`] draws the
//! current frame into a caller-provided texture view.

mod gpu_resources;
mod render_pass;

pub use gpu_resources::{DEPTH_FORMAT, NodeUniform};

use wgpu::util::DeviceExt;

use crate::camera::{Camera, CameraUniform};
use crate::config::{RendererConfig, ViewportConfig};
use crate::light::{LightUniform, Lighting};
use crate::scene::Scene;

use gpu_resources::PipelineSpec;
use render_pass::{MainPassParams, Pipelines};

/// Scene renderer
pub struct Renderer {
    pipelines: Pipelines,
    node_layout: wgpu::BindGroupLayout,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    lighting: Lighting,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,

    #[allow(dead_code)] // Held for GPU resource lifetime
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,

    clear_color: wgpu::Color,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Creates a new renderer for a color target of the given format and size.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &RendererConfig,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let camera_layout = gpu_resources::create_uniform_layout(
            device,
            "Camera Bind Group Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let node_layout = gpu_resources::create_uniform_layout(
            device,
            "Node Bind Group Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let light_layout = gpu_resources::create_uniform_layout(
            device,
            "Light Bind Group Layout",
            wgpu::ShaderStages::FRAGMENT,
        );

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[Camera::new(width as f32 / height as f32).uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = gpu_resources::create_uniform_bind_group(
            device,
            &camera_layout,
            &camera_buffer,
            "Camera Bind Group",
        );

        let lighting = Lighting::new(config.lighting.clone());
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[lighting.uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_bind_group = gpu_resources::create_uniform_bind_group(
            device,
            &light_layout,
            &light_buffer,
            "Light Bind Group",
        );

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mesh.wgsl").into()),
        });
        let overlay_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/overlay.wgsl").into()),
        });

        let lit_layouts = [&camera_layout, &node_layout, &light_layout];
        let overlay_layouts = [&camera_layout, &node_layout];
        let pipelines = Pipelines {
            mesh: gpu_resources::create_pipeline(
                device,
                format,
                &PipelineSpec {
                    label: "Mesh Pipeline",
                    shader: &mesh_shader,
                    bind_group_layouts: &lit_layouts,
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    depth_tested: true,
                },
            ),
            overlay_triangles: gpu_resources::create_pipeline(
                device,
                format,
                &PipelineSpec {
                    label: "Overlay Triangle Pipeline",
                    shader: &overlay_shader,
                    bind_group_layouts: &overlay_layouts,
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    depth_tested: false,
                },
            ),
            overlay_lines: gpu_resources::create_pipeline(
                device,
                format,
                &PipelineSpec {
                    label: "Overlay Line Pipeline",
                    shader: &overlay_shader,
                    bind_group_layouts: &overlay_layouts,
                    topology: wgpu::PrimitiveTopology::LineList,
                    depth_tested: false,
                },
            ),
        };

        let (depth_texture, depth_view) =
            gpu_resources::create_depth_texture(device, width, height);

        Self {
            pipelines,
            node_layout,
            camera_buffer,
            camera_bind_group,
            lighting,
            light_buffer,
            light_bind_group,
            depth_texture,
            depth_view,
            clear_color: clear_color(&config.viewport),
            format,
            width,
            height,
        }
    }

    /// Resizes the depth buffer for a new viewport size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return;
        }
        self.width = width;
        self.height = height;

        let (depth_texture, depth_view) =
            gpu_resources::create_depth_texture(device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Returns the texture format used by the renderer.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Current target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Light rig.
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Scale every light by a single multiplier.
    pub fn set_light_multiplier(&mut self, multiplier: f32) {
        self.lighting.set_multiplier(multiplier);
    }

    /// Apply viewport and lighting configuration.
    pub fn apply_config(&mut self, config: &RendererConfig) {
        self.clear_color = clear_color(&config.viewport);
        self.lighting = Lighting::new(config.lighting.clone());
    }

    /// Upload meshes created since the last sync. Returns how many.
    pub fn sync(&self, device: &wgpu::Device, scene: &mut Scene) -> usize {
        let pending = scene.meshes().pending_uploads();
        let mut uploaded = 0;
        for handle in pending {
            let Some(resource) = scene.meshes().get(handle) else {
                continue;
            };
            let gpu = gpu_resources::create_gpu_mesh(device, &self.node_layout, resource);
            if scene.meshes_mut().upload(handle, gpu) {
                uploaded += 1;
            }
        }
        if uploaded > 0 {
            tracing::debug!("Uploaded {} meshes", uploaded);
        }
        uploaded
    }

    /// Render the scene.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        queue: &wgpu::Queue,
        scene: &Scene,
        camera: &Camera,
    ) {
        let camera_uniform: CameraUniform = camera.uniform();
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));
        let light_uniform: LightUniform = self.lighting.uniform();
        queue.write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[light_uniform]));

        let drawables = scene.drawables();
        for drawable in &drawables {
            let Some(resource) = scene.meshes().get(drawable.mesh) else {
                continue;
            };
            if let Some(gpu) = resource.gpu() {
                let uniform = NodeUniform::new(drawable.world, resource.material.color);
                queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
            }
        }

        let params = MainPassParams {
            pipelines: &self.pipelines,
            scene,
            drawables: &drawables,
            camera_bind_group: &self.camera_bind_group,
            light_bind_group: &self.light_bind_group,
            depth_view: &self.depth_view,
            clear_color: self.clear_color,
        };
        render_pass::render_main_pass(encoder, view, &params);
    }
}

fn clear_color(config: &ViewportConfig) -> wgpu::Color {
    wgpu::Color {
        r: config.background_color[0] as f64,
        g: config.background_color[1] as f64,
        b: config.background_color[2] as f64,
        a: config.background_color[3] as f64,
    }
}
