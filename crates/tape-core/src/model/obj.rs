//! OBJ loading
//!
//! Every object/group in the file becomes a child node of the model root.

use std::io::{BufRead, Cursor};
use std::path::Path;

use super::{MeshGeometry, Model, ModelError, ModelNode};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Load an OBJ file
pub fn load_obj(path: impl AsRef<Path>) -> Result<Model, ModelError> {
    let path = path.as_ref();
    let (models, _materials) =
        tobj::load_obj(path, &load_options()).map_err(|e| match e {
            tobj::LoadError::OpenFileFailed => ModelError::Io(format!("cannot open {:?}", path)),
            other => ModelError::Parse(other.to_string()),
        })?;
    build_model(&super::model_name(path), models)
}

/// Load an OBJ from bytes. Material libraries are not resolved.
pub fn load_obj_from_bytes(name: &str, data: &[u8]) -> Result<Model, ModelError> {
    let mut cursor = Cursor::new(data);
    load_obj_from_reader(name, &mut cursor)
}

fn load_obj_from_reader(name: &str, reader: &mut impl BufRead) -> Result<Model, ModelError> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default()))
            .map_err(|e| ModelError::Parse(e.to_string()))?;
    build_model(name, models)
}

fn build_model(name: &str, models: Vec<tobj::Model>) -> Result<Model, ModelError> {
    let mut root = ModelNode::new(name);

    for model in models {
        let mesh = model.mesh;
        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        let normals: Vec<[f32; 3]> = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect()
        } else {
            Vec::new()
        };

        let geometry = MeshGeometry::new(positions, normals, mesh.indices);
        if geometry.is_empty() {
            continue;
        }
        root.children
            .push(ModelNode::new(model.name).with_mesh(geometry));
    }

    if root.children.is_empty() {
        return Err(ModelError::EmptyModel);
    }

    tracing::debug!(
        "OBJ '{}': {} objects, {} triangles",
        name,
        root.children.len(),
        root.triangle_count()
    );

    Ok(Model::new(name, root))
}
