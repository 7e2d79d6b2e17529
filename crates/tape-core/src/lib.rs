//! Tape core
//!
//! Renderer-independent pieces of the measurement viewer: model data and
//! loaders, mesh primitives, length units, and the measurement engine state
//! (placed points, segments, overlay labels, measuring mode).

pub mod config;
pub mod constants;
pub mod measure;
pub mod model;
pub mod overlay;
pub mod primitive;
pub mod units;

pub use config::{MeasureConfig, SwapPolicy};
pub use measure::{
    AnnotationScene, ControlGate, CursorHint, DisposalReport, MeasureMode, MeasurementStore,
    ModeController, PendingPoint, Point3D, Segment, dispose_all,
};
pub use model::{
    MeshGeometry, Model, ModelError, ModelFormat, ModelNode, load_model, load_model_from_bytes,
};
pub use overlay::{LabelId, LabelLayer, OverlayLabel};
pub use units::LengthUnit;
