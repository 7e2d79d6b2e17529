//! Renderer configuration structures
//!
//! Settings for the viewport, camera and lights. All structures serialize so
//! they can live inside the application's configuration file.

use serde::{Deserialize, Serialize};

/// Viewport rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Background clear color (RGBA)
    pub background_color: [f32; 4],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            background_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Camera default configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near_plane: f32,
    /// Far clipping plane distance
    pub far_plane: f32,
    /// Extra room around a framed model (1.0 = tight fit)
    pub frame_padding: f32,
    /// Radians of orbit per dragged pixel
    pub orbit_sensitivity: f32,
    /// Pan distance per dragged pixel, relative to the orbit distance
    pub pan_sensitivity: f32,
    /// Zoom step per scroll unit
    pub zoom_sensitivity: f32,
    /// Whether orbit motion eases out after the pointer is released
    pub enable_damping: bool,
    /// Fraction of the remaining motion applied per frame when damping
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            frame_padding: 1.5,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.002,
            zoom_sensitivity: 0.1,
            enable_damping: false,
            damping_factor: 0.05,
        }
    }
}

/// A single directional light
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectionalLightConfig {
    /// Light position; it shines from here towards the origin
    pub position: [f32; 3],
    /// Light color (RGB)
    pub color: [f32; 3],
    /// Base intensity before the multiplier
    pub intensity: f32,
}

impl DirectionalLightConfig {
    fn white(position: [f32; 3], intensity: f32) -> Self {
        Self {
            position,
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }
}

/// Lighting configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Ambient light color (RGB)
    pub ambient_color: [f32; 3],
    /// Ambient base intensity
    pub ambient_intensity: f32,
    /// Directional lights
    pub directional: Vec<DirectionalLightConfig>,
    /// Scales the ambient and every directional intensity
    pub multiplier: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.5,
            directional: vec![
                DirectionalLightConfig::white([2.0, 3.0, 2.0], 1.5),
                DirectionalLightConfig::white([-2.0, 1.0, -5.0], 0.8),
                DirectionalLightConfig::white([-2.0, -2.0, 2.0], 0.6),
            ],
            multiplier: 1.0,
        }
    }
}

/// Complete renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RendererConfig {
    /// Viewport settings
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// Camera settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Lighting settings
    #[serde(default)]
    pub lighting: LightingConfig,
}

impl RendererConfig {
    /// Create a new renderer configuration with default values
    pub fn new() -> Self {
        Self::default()
    }
}
