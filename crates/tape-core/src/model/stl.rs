//! STL loading

use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use crate::constants::STL_VERTEX_PRECISION;

use super::{MeshGeometry, Model, ModelError, ModelNode};

/// Load an STL file as a single-node model
pub fn load_stl(path: impl AsRef<Path>) -> Result<Model, ModelError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| ModelError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);
    load_stl_from_reader(&super::model_name(path), &mut reader)
}

/// Load an STL (ASCII or binary) from bytes
pub fn load_stl_from_bytes(name: &str, data: &[u8]) -> Result<Model, ModelError> {
    let mut cursor = Cursor::new(data);
    load_stl_from_reader(name, &mut cursor)
}

fn load_stl_from_reader<R: Read + Seek>(name: &str, reader: &mut R) -> Result<Model, ModelError> {
    let mesh = stl_io::read_stl(reader).map_err(|e| ModelError::Parse(e.to_string()))?;
    if mesh.faces.is_empty() {
        return Err(ModelError::EmptyModel);
    }

    let geometry = weld_vertices(&mesh);
    tracing::debug!(
        "STL '{}': {} faces, {} welded vertices",
        name,
        geometry.triangle_count(),
        geometry.positions.len()
    );

    Ok(Model::new(name, ModelNode::new(name).with_mesh(geometry)))
}

/// Merge coincident vertices of the triangle soup into an indexed mesh
fn weld_vertices(mesh: &stl_io::IndexedMesh) -> MeshGeometry {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut lookup: HashMap<[i32; 3], u32> = HashMap::new();
    let mut indices: Vec<u32> = Vec::with_capacity(mesh.faces.len() * 3);

    for face in &mesh.faces {
        for &vertex_idx in &face.vertices {
            let vertex = mesh.vertices[vertex_idx];
            let v = [vertex[0], vertex[1], vertex[2]];
            let key = v.map(|c| (c * STL_VERTEX_PRECISION).round() as i32);

            let index = *lookup.entry(key).or_insert_with(|| {
                positions.push(v);
                (positions.len() - 1) as u32
            });
            indices.push(index);
        }
    }

    // Face normals are recomputed from winding at upload time
    MeshGeometry::new(positions, Vec::new(), indices)
}
