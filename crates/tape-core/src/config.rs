//! Measurement configuration

use serde::{Deserialize, Serialize};

use crate::constants::{ANNOTATION_COLOR, DISTANCE_DECIMALS, MARKER_RADIUS, MARKER_SEGMENTS};
use crate::units::LengthUnit;

/// What happens to placed measurements when the viewed model is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwapPolicy {
    /// Keep every segment and pending point across model swaps
    #[default]
    Preserve,
    /// Clear all measurements before the new model is attached
    Clear,
}

impl SwapPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SwapPolicy::Preserve => "Keep measurements",
            SwapPolicy::Clear => "Clear measurements",
        }
    }
}

/// Style and unit settings for placed measurements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeasureConfig {
    /// Unit distances are displayed in
    pub unit: LengthUnit,
    /// Decimals shown in label text
    pub decimals: usize,
    /// Marker sphere radius (world units)
    pub marker_radius: f32,
    /// Marker sphere resolution
    pub marker_segments: u32,
    /// Marker and line color (RGBA)
    pub color: [f32; 4],
    /// Model swap behaviour
    pub swap_policy: SwapPolicy,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            unit: LengthUnit::default(),
            decimals: DISTANCE_DECIMALS,
            marker_radius: MARKER_RADIUS,
            marker_segments: MARKER_SEGMENTS,
            color: ANNOTATION_COLOR,
            swap_policy: SwapPolicy::default(),
        }
    }
}

impl MeasureConfig {
    /// Convert a world distance to the configured display unit
    pub fn display_distance(&self, world_distance: f32) -> f32 {
        self.unit.convert(world_distance)
    }

    /// Format a display value as label text
    pub fn format(&self, display_value: f32) -> String {
        self.unit.format(display_value, self.decimals)
    }
}
