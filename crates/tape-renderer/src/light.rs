//! Ambient and directional lighting

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::config::LightingConfig;

/// Directional lights the mesh shader accepts
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Light uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    /// Ambient color premultiplied by intensity (w unused)
    pub ambient: [f32; 4],
    /// Unit directions pointing towards each light (w unused)
    pub directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// Colors premultiplied by intensity (w unused)
    pub colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// Number of active directional lights
    pub count: u32,
    /// Padding for alignment
    pub _pad: [u32; 3],
}

/// CPU-side light rig built from [`LightingConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    config: LightingConfig,
}

impl Lighting {
    /// Create from configuration
    pub fn new(config: LightingConfig) -> Self {
        if config.directional.len() > MAX_DIRECTIONAL_LIGHTS {
            tracing::warn!(
                "{} directional lights configured, only the first {} are used",
                config.directional.len(),
                MAX_DIRECTIONAL_LIGHTS
            );
        }
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    /// Global intensity multiplier
    pub fn multiplier(&self) -> f32 {
        self.config.multiplier
    }

    /// Scale ambient and directional intensities together
    pub fn set_multiplier(&mut self, multiplier: f32) {
        self.config.multiplier = multiplier.max(0.0);
    }

    /// Effective ambient intensity
    pub fn ambient_intensity(&self) -> f32 {
        self.config.ambient_intensity * self.config.multiplier
    }

    /// Effective intensity of each directional light
    pub fn directional_intensities(&self) -> Vec<f32> {
        self.config
            .directional
            .iter()
            .map(|light| light.intensity * self.config.multiplier)
            .collect()
    }

    /// Build the uniform block
    pub fn uniform(&self) -> LightUniform {
        let m = self.config.multiplier;
        let mut uniform = LightUniform {
            ambient: (Vec3::from(self.config.ambient_color) * self.config.ambient_intensity * m)
                .extend(0.0)
                .to_array(),
            ..LightUniform::zeroed()
        };

        let lights = self.config.directional.iter().take(MAX_DIRECTIONAL_LIGHTS);
        for (i, light) in lights.enumerate() {
            let direction = Vec3::from(light.position).try_normalize().unwrap_or(Vec3::Y);
            uniform.directions[i] = direction.extend(0.0).to_array();
            uniform.colors[i] = (Vec3::from(light.color) * light.intensity * m)
                .extend(0.0)
                .to_array();
            uniform.count = i as u32 + 1;
        }

        uniform
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::new(LightingConfig::default())
    }
}
