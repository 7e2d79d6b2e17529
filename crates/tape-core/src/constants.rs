//! Global constants for tape-core

/// Vertex welding precision for STL import (multiply by this, then round to int)
pub const STL_VERTEX_PRECISION: f32 = 10000.0;

/// Default marker sphere radius in world units
pub const MARKER_RADIUS: f32 = 0.01;

/// Default marker sphere resolution (both directions)
pub const MARKER_SEGMENTS: u32 = 16;

/// Default color for measurement markers, lines and label accents (RGBA)
pub const ANNOTATION_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Default color for loaded model surfaces (RGBA)
pub const DEFAULT_MODEL_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// Default number of decimals shown in distance labels
pub const DISTANCE_DECIMALS: usize = 1;
