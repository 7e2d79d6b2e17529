//! Viewport rendering state

use std::sync::Arc;

use parking_lot::Mutex;

use tape_renderer::{Renderer, RendererConfig};

use super::engine::ViewerEngine;

/// Render texture for viewport
struct RenderTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    egui_texture_id: egui::TextureId,
    width: u32,
    height: u32,
}

/// GPU state behind the 3D viewport
pub struct ViewportState {
    pub renderer: Renderer,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    render_texture: Option<RenderTexture>,
}

impl ViewportState {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        config: &RendererConfig,
    ) -> Self {
        let renderer = Renderer::new(&device, format, 800, 600, config);
        Self {
            renderer,
            device,
            queue,
            render_texture: None,
        }
    }

    /// Ensure the render texture matches the requested size
    pub fn ensure_texture(
        &mut self,
        width: u32,
        height: u32,
        egui_renderer: &mut egui_wgpu::Renderer,
    ) -> egui::TextureId {
        let width = width.max(1);
        let height = height.max(1);

        if let Some(rt) = &self.render_texture
            && rt.width == width
            && rt.height == height
        {
            return rt.egui_texture_id;
        }

        if let Some(old) = self.render_texture.take() {
            egui_renderer.free_texture(&old.egui_texture_id);
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Viewport Render Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.renderer.format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let egui_texture_id =
            egui_renderer.register_native_texture(&self.device, &view, wgpu::FilterMode::Linear);

        self.renderer.resize(&self.device, width, height);
        tracing::debug!("Viewport texture resized to {}x{}", width, height);

        self.render_texture = Some(RenderTexture {
            texture,
            view,
            egui_texture_id,
            width,
            height,
        });
        egui_texture_id
    }

    /// Upload new meshes and render the engine's scene to the texture
    pub fn render(&mut self, engine: &mut ViewerEngine) {
        let Some(rt) = &self.render_texture else {
            return;
        };

        self.renderer.sync(&self.device, engine.scene_mut());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewport Render Encoder"),
            });

        self.renderer
            .render(&mut encoder, &rt.view, &self.queue, engine.scene(), engine.camera());

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Scale every light by `multiplier`
    pub fn set_light_multiplier(&mut self, multiplier: f32) {
        self.renderer.set_light_multiplier(multiplier);
    }

    /// Apply a new renderer configuration
    pub fn apply_config(&mut self, config: &RendererConfig) {
        self.renderer.apply_config(config);
    }
}

/// Viewport state shared between the app and the viewport panel
pub type SharedViewportState = Arc<Mutex<ViewportState>>;
