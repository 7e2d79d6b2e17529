//! Mesh resources with explicit disposal
//!
//! Every mesh the scene draws is owned here: CPU geometry, its material and,
//! once uploaded, the GPU buffers. Disposal destroys the GPU buffers and
//! drops the CPU data in one step.

use std::collections::HashMap;

use tape_core::MeshGeometry;
use uuid::Uuid;

/// Handle to a mesh in a [`MeshManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(Uuid);

impl MeshHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// How indices are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Three indices per triangle
    Triangles,
    /// Two indices per line segment
    Lines,
}

/// Surface appearance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color (RGBA)
    pub color: [f32; 4],
    /// Lit and depth tested when true; flat and always on top when false
    pub lit: bool,
}

impl Material {
    /// Shaded, depth-tested material
    pub fn lit(color: [f32; 4]) -> Self {
        Self { color, lit: true }
    }

    /// Flat overlay material
    pub fn overlay(color: [f32; 4]) -> Self {
        Self { color, lit: false }
    }
}

/// GPU buffers for one mesh
pub struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    /// Free the buffers now rather than when the last reference drops
    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.uniform_buffer.destroy();
    }
}

impl std::fmt::Debug for GpuMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuMesh")
            .field("index_count", &self.index_count)
            .finish_non_exhaustive()
    }
}

/// A mesh owned by the manager
#[derive(Debug)]
pub struct MeshResource {
    /// Geometry in node-local coordinates
    pub geometry: MeshGeometry,
    /// Primitive assembly
    pub topology: Topology,
    /// Appearance
    pub material: Material,
    gpu: Option<GpuMesh>,
}

impl MeshResource {
    /// Uploaded GPU buffers, if any
    pub fn gpu(&self) -> Option<&GpuMesh> {
        self.gpu.as_ref()
    }

    /// True once [`MeshManager::upload`] has run for this mesh
    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }
}

/// Owner of every mesh resource
#[derive(Debug, Default)]
pub struct MeshManager {
    meshes: HashMap<MeshHandle, MeshResource>,
}

impl MeshManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register CPU geometry. GPU upload happens on the next renderer sync.
    pub fn insert(
        &mut self,
        geometry: MeshGeometry,
        topology: Topology,
        material: Material,
    ) -> MeshHandle {
        let handle = MeshHandle::new();
        self.meshes.insert(
            handle,
            MeshResource {
                geometry,
                topology,
                material,
                gpu: None,
            },
        );
        handle
    }

    /// Look up a mesh
    pub fn get(&self, handle: MeshHandle) -> Option<&MeshResource> {
        self.meshes.get(&handle)
    }

    /// Whether a mesh is still live
    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains_key(&handle)
    }

    /// Attach uploaded buffers to a mesh. Returns `false` for unknown handles.
    pub fn upload(&mut self, handle: MeshHandle, gpu: GpuMesh) -> bool {
        match self.meshes.get_mut(&handle) {
            Some(resource) => {
                if let Some(old) = resource.gpu.replace(gpu) {
                    old.destroy();
                }
                true
            }
            None => {
                gpu.destroy();
                false
            }
        }
    }

    /// Handles whose GPU buffers have not been created yet
    pub fn pending_uploads(&self) -> Vec<MeshHandle> {
        self.meshes
            .iter()
            .filter(|(_, resource)| resource.gpu.is_none())
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Release a mesh's GPU buffers and CPU data.
    ///
    /// Returns `false` if the mesh was already released.
    pub fn dispose(&mut self, handle: MeshHandle) -> bool {
        match self.meshes.remove(&handle) {
            Some(resource) => {
                if let Some(gpu) = &resource.gpu {
                    gpu.destroy();
                }
                true
            }
            None => false,
        }
    }

    /// Number of live meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True if no meshes are live
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
