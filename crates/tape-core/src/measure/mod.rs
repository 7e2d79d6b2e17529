//! Measurement engine state
//!
//! - [`MeasurementStore`]: placed points, paired segments and the scene
//!   objects created for them
//! - [`ModeController`]: measuring mode gate and camera-control exclusivity
//! - [`dispose_all`]: the single teardown path for annotation resources

mod lifecycle;
mod mode;
mod store;

pub use lifecycle::{AnnotationScene, DisposalReport, dispose_all};
pub use mode::{ControlGate, CursorHint, MeasureMode, ModeController};
pub use store::{MeasurementStore, PendingPoint, Segment};

use glam::Vec3;

/// A world-space point produced by a successful ray intersection.
///
/// Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D(Vec3);

impl Point3D {
    pub fn new(position: Vec3) -> Self {
        Self(position)
    }

    pub fn position(&self) -> Vec3 {
        self.0
    }

    /// Euclidean distance in world units
    pub fn distance(&self, other: &Point3D) -> f32 {
        self.0.distance(other.0)
    }

    pub fn midpoint(&self, other: &Point3D) -> Vec3 {
        (self.0 + other.0) * 0.5
    }
}

impl From<Vec3> for Point3D {
    fn from(position: Vec3) -> Self {
        Self(position)
    }
}
