//! Scene graph
//!
//! Nodes form a forest keyed by [`NodeId`]. A node may own one mesh in the
//! scene's [`MeshManager`]; removing the node is the only way that mesh is
//! released, so nothing can be freed twice or leaked.

mod bounds;

pub use bounds::BoundingBox;

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use tape_core::primitive::generate_sphere_mesh;
use tape_core::{AnnotationScene, MeasureConfig, MeshGeometry, Model, ModelNode};
use uuid::Uuid;

use crate::resources::{Material, MeshHandle, MeshManager, Topology};

/// Identifier of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Which pass draws a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLayer {
    /// Loaded model geometry: lit, depth tested, pickable
    Model,
    /// Measurement markers and lines: flat, drawn on top
    Annotation,
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Display name
    pub name: String,
    /// Transform relative to the parent
    pub transform: Mat4,
    /// Parent node, `None` for roots
    pub parent: Option<NodeId>,
    /// Child nodes in insertion order
    pub children: Vec<NodeId>,
    /// Owned mesh
    pub mesh: Option<MeshHandle>,
    /// Pass that draws this node
    pub layer: RenderLayer,
}

/// Something the renderer should draw this frame
#[derive(Debug, Clone, Copy)]
pub struct Drawable {
    /// Node the mesh belongs to
    pub node: NodeId,
    /// Node-to-world transform
    pub world: Mat4,
    /// Mesh to draw
    pub mesh: MeshHandle,
    /// Pass
    pub layer: RenderLayer,
}

/// Scene graph plus the mesh resources its nodes own
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    meshes: MeshManager,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, optionally under a parent.
    ///
    /// An unknown parent makes the node a root.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        transform: Mat4,
        parent: Option<NodeId>,
        mesh: Option<MeshHandle>,
        layer: RenderLayer,
    ) -> NodeId {
        let id = NodeId::new();
        let parent = parent.filter(|p| self.nodes.contains_key(p));
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.insert(
            id,
            SceneNode {
                name: name.into(),
                transform,
                parent,
                children: Vec::new(),
                mesh,
                layer,
            },
        );
        id
    }

    /// Attach a loaded model as a new root subtree
    pub fn attach_model(&mut self, model: &Model) -> NodeId {
        let root = self.attach_model_node(&model.root, None);
        tracing::debug!(
            "Attached model '{}' ({} nodes, {} triangles)",
            model.name,
            model.root.node_count(),
            model.triangle_count()
        );
        root
    }

    fn attach_model_node(&mut self, node: &ModelNode, parent: Option<NodeId>) -> NodeId {
        let mesh = node
            .mesh
            .as_ref()
            .filter(|geometry| !geometry.is_empty())
            .map(|geometry| {
                self.meshes.insert(
                    geometry.clone(),
                    Topology::Triangles,
                    Material::lit(node.color),
                )
            });
        let id = self.add_node(&node.name, node.transform, parent, mesh, RenderLayer::Model);
        for child in &node.children {
            self.attach_model_node(child, Some(id));
        }
        id
    }

    /// Release every mesh in a subtree, then detach its nodes.
    ///
    /// Returns the number of nodes removed; 0 for an unknown id.
    pub fn dispose_subtree(&mut self, id: NodeId) -> usize {
        let subtree = self.descendants(id);
        if subtree.is_empty() {
            return 0;
        }

        for node_id in &subtree {
            if let Some(mesh) = self.nodes.get(node_id).and_then(|n| n.mesh) {
                self.meshes.dispose(mesh);
            }
        }

        let parent = self.nodes.get(&id).and_then(|n| n.parent);
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }

        for node_id in &subtree {
            self.nodes.remove(node_id);
        }
        subtree.len()
    }

    /// Node ids of a subtree in depth-first pre-order, starting at `id`.
    ///
    /// Empty for an unknown id.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                out.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Whether a node is attached
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of attached nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of attached nodes on a layer
    pub fn layer_count(&self, layer: RenderLayer) -> usize {
        self.nodes.values().filter(|n| n.layer == layer).count()
    }

    /// Mesh resources
    pub fn meshes(&self) -> &MeshManager {
        &self.meshes
    }

    /// Mutable mesh resources (GPU upload)
    pub fn meshes_mut(&mut self) -> &mut MeshManager {
        &mut self.meshes
    }

    /// Node-to-world transform; identity for an unknown id
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut transform = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(&c)) {
            transform = node.transform * transform;
            current = node.parent;
        }
        transform
    }

    /// World-space bounds of every mesh in a subtree
    pub fn subtree_bounds(&self, id: NodeId) -> Option<BoundingBox> {
        let bounds = self
            .descendants(id)
            .into_iter()
            .filter_map(|node_id| {
                let mesh = self.nodes.get(&node_id)?.mesh?;
                let (min, max) = self.meshes.get(mesh)?.geometry.bounds()?;
                Some(BoundingBox::new(min, max).transform(&self.world_transform(node_id)))
            })
            .reduce(|a, b| a.union(&b))?;
        bounds.is_valid().then_some(bounds)
    }

    /// Every live mesh with its world transform, roots first
    pub fn drawables(&self) -> Vec<Drawable> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_drawables(*root, Mat4::IDENTITY, &mut out);
        }
        out
    }

    fn collect_drawables(&self, id: NodeId, parent_world: Mat4, out: &mut Vec<Drawable>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let world = parent_world * node.transform;
        if let Some(mesh) = node.mesh.filter(|m| self.meshes.contains(*m)) {
            out.push(Drawable {
                node: id,
                world,
                mesh,
                layer: node.layer,
            });
        }
        for child in &node.children {
            self.collect_drawables(*child, world, out);
        }
    }
}

impl AnnotationScene for Scene {
    type Handle = NodeId;

    fn spawn_marker(&mut self, position: Vec3, style: &MeasureConfig) -> NodeId {
        let geometry = generate_sphere_mesh(
            style.marker_radius,
            style.marker_segments,
            style.marker_segments,
        );
        let mesh = self
            .meshes
            .insert(geometry, Topology::Triangles, Material::overlay(style.color));
        self.add_node(
            "marker",
            Mat4::from_translation(position),
            None,
            Some(mesh),
            RenderLayer::Annotation,
        )
    }

    fn spawn_line(&mut self, start: Vec3, end: Vec3, style: &MeasureConfig) -> NodeId {
        let geometry = MeshGeometry::new(vec![start.to_array(), end.to_array()], Vec::new(), vec![0, 1]);
        let mesh = self
            .meshes
            .insert(geometry, Topology::Lines, Material::overlay(style.color));
        self.add_node(
            "measure line",
            Mat4::IDENTITY,
            None,
            Some(mesh),
            RenderLayer::Annotation,
        )
    }

    fn dispose(&mut self, handle: NodeId) -> bool {
        self.dispose_subtree(handle) > 0
    }
}
