//! Tape Renderer
//!
//! WGPU-based 3D rendering and the viewport-side halves of the measurement
//! engine.
//!
//! # Module Structure
//!
//! ```text
//! tape-renderer/
//! ├── camera.rs       # Y-up orbit camera, rays, NDC helpers
//! ├── controls.rs     # Orbit controls (the gate measuring mode switches)
//! ├── scene/          # Scene graph, bounding boxes, annotation nodes
//! ├── resources.rs    # Mesh resources with explicit disposal
//! ├── picking.rs      # Pointer ray casting against a model subtree
//! ├── projection.rs   # Per-frame label placement
//! ├── light.rs        # Ambient + directional light rig
//! ├── vertex.rs       # Vertex formats
//! └── renderer/       # Pipelines and render pass
//! ```

pub mod camera;
pub mod config;
pub mod controls;
pub mod light;
pub mod picking;
pub mod projection;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod vertex;

pub use camera::{Camera, CameraState, CameraUniform, Ray, Viewport};
pub use config::RendererConfig;
pub use controls::OrbitControls;
pub use light::{LightUniform, Lighting};
pub use picking::{RayHit, intersect_subtree, pick};
pub use projection::{LabelPlacement, project_anchor, project_labels};
pub use renderer::Renderer;
pub use resources::{GpuMesh, Material, MeshHandle, MeshManager, Topology};
pub use scene::{BoundingBox, Drawable, NodeId, RenderLayer, Scene, SceneNode};
pub use vertex::MeshVertex;
