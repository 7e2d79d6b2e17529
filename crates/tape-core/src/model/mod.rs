//! Viewable models and file loading (STL, OBJ)
//!
//! A [`Model`] is a tree of [`ModelNode`]s. Each node has a local transform
//! and may carry a triangle mesh; picking and disposal walk the whole tree.

mod normals;
mod obj;
mod stl;

use std::path::Path;

use glam::{Mat4, Vec3};

use crate::primitive::generate_box_mesh;

pub use normals::{calculate_face_normals, calculate_triangle_normal};
pub use obj::{load_obj, load_obj_from_bytes};
pub use stl::{load_stl, load_stl_from_bytes};

/// Indexed triangle mesh in node-local coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals. Empty means flat shading from face normals.
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn new(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.len() < 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as vertex triples. Triangles with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = self.positions.get(tri[0] as usize)?;
            let b = self.positions.get(tri[1] as usize)?;
            let c = self.positions.get(tri[2] as usize)?;
            Some([Vec3::from(*a), Vec3::from(*b), Vec3::from(*c)])
        })
    }

    /// Local-space bounds, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// A node in a model hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    /// Transform relative to the parent node
    pub transform: Mat4,
    pub mesh: Option<MeshGeometry>,
    pub color: [f32; 4],
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            mesh: None,
            color: crate::constants::DEFAULT_MODEL_COLOR,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: MeshGeometry) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: ModelNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }

    /// Number of triangles in this subtree
    pub fn triangle_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, MeshGeometry::triangle_count)
            + self
                .children
                .iter()
                .map(ModelNode::triangle_count)
                .sum::<usize>()
    }
}

/// A loaded model ready to be attached to a scene
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub root: ModelNode,
}

impl Model {
    pub fn new(name: impl Into<String>, root: ModelNode) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    /// Axis-aligned cube centred on the origin
    pub fn cube(size: f32) -> Self {
        let geometry = generate_box_mesh(Vec3::splat(size));
        Self::new("Cube", ModelNode::new("cube").with_mesh(geometry))
    }

    pub fn triangle_count(&self) -> usize {
        self.root.triangle_count()
    }
}

/// Supported model file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Stl,
    Obj,
    Unknown,
}

impl ModelFormat {
    /// Detect format from a file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => ModelFormat::Stl,
            Some("obj") => ModelFormat::Obj,
            _ => ModelFormat::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelFormat::Stl => "STL",
            ModelFormat::Obj => "OBJ",
            ModelFormat::Unknown => "Unknown",
        }
    }

    /// File extensions accepted by open dialogs
    pub const EXTENSIONS: &'static [&'static str] = &["stl", "STL", "obj", "OBJ"];
}

/// Load a model file, detecting the format from its extension
pub fn load_model(path: impl AsRef<Path>) -> Result<Model, ModelError> {
    let path = path.as_ref();
    match ModelFormat::from_path(path) {
        ModelFormat::Stl => load_stl(path),
        ModelFormat::Obj => load_obj(path),
        ModelFormat::Unknown => Err(unsupported(path)),
    }
}

/// Load a model from in-memory bytes; `file_name` selects the format
pub fn load_model_from_bytes(file_name: &str, data: &[u8]) -> Result<Model, ModelError> {
    let path = Path::new(file_name);
    let name = model_name(path);
    match ModelFormat::from_path(path) {
        ModelFormat::Stl => load_stl_from_bytes(&name, data),
        ModelFormat::Obj => load_obj_from_bytes(&name, data),
        ModelFormat::Unknown => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> ModelError {
    ModelError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

/// Model name from a file path (file stem)
pub(crate) fn model_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

/// Model loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty model: no geometry found")]
    EmptyModel,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
