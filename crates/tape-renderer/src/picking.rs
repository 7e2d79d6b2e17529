//! Ray picking against model geometry
//!
//! A pointer position is turned into a camera ray, then tested against every
//! triangle of the target subtree. Each node's triangles are tested in that
//! node's local space so the hierarchy's transforms are honoured; the hit
//! with the smallest world distance wins.

use glam::{Vec2, Vec3};
use tape_core::Point3D;

use crate::camera::{Camera, Ray, Viewport};
use crate::resources::Topology;
use crate::scene::{BoundingBox, NodeId, Scene};

/// Smallest ray parameter counted as a hit
const MIN_T: f32 = 1e-7;

/// The nearest surface hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Intersection point in world space
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
    /// Node whose mesh was hit
    pub node: NodeId,
}

/// Möller-Trumbore ray/triangle test.
///
/// Both faces count as hits. Returns the ray parameter `t > 0`; the direction
/// need not be normalized.
pub fn ray_triangle_intersection(
    origin: Vec3,
    direction: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    // `det` scales with the triangle's area, so the parallel test must too
    if det.abs() <= f32::EPSILON * edge1.length() * edge2.length() * direction.length() {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > MIN_T).then_some(t)
}

/// Nearest hit on any triangle mesh in the subtree rooted at `root`.
///
/// Line meshes are ignored. Nodes with a singular transform are skipped.
pub fn intersect_subtree(scene: &Scene, root: NodeId, ray: &Ray) -> Option<RayHit> {
    let mut nearest: Option<RayHit> = None;

    for node_id in scene.descendants(root) {
        let Some(resource) = scene
            .get(node_id)
            .and_then(|node| node.mesh)
            .and_then(|mesh| scene.meshes().get(mesh))
        else {
            continue;
        };
        if resource.topology != Topology::Triangles {
            continue;
        }

        let world = scene.world_transform(node_id);
        if world.determinant().abs() < f32::EPSILON {
            continue;
        }
        let inverse = world.inverse();
        let local_origin = inverse.transform_point3(ray.origin);
        let local_direction = inverse.transform_vector3(ray.direction);

        // The affine map keeps the ray parameter, and the world direction is
        // unit length, so `t` is already a world distance.
        let Some((min, max)) = resource.geometry.bounds() else {
            continue;
        };
        let Some(entry) = BoundingBox::new(min, max).ray_entry(local_origin, local_direction)
        else {
            continue;
        };
        if nearest.is_some_and(|hit| entry > hit.distance) {
            continue;
        }

        for [a, b, c] in resource.geometry.triangles() {
            let Some(t) = ray_triangle_intersection(local_origin, local_direction, a, b, c) else {
                continue;
            };
            if nearest.is_none_or(|hit| t < hit.distance) {
                nearest = Some(RayHit {
                    point: ray.at(t),
                    distance: t,
                    node: node_id,
                });
            }
        }
    }

    nearest
}

/// Resolve a pointer position to a point on the target's surface.
///
/// `pointer` is in viewport pixels with the origin at the top-left corner.
/// Returns `None` when nothing is hit, when no target is loaded, or when the
/// viewport has no area. Callers gate on the measuring mode before calling.
pub fn pick(
    pointer: Vec2,
    viewport: Viewport,
    camera: &Camera,
    scene: &Scene,
    target: Option<NodeId>,
) -> Option<Point3D> {
    let target = target?;
    if viewport.is_empty() {
        return None;
    }
    let ray = camera.screen_to_ray(pointer, viewport);
    intersect_subtree(scene, target, &ray).map(|hit| Point3D::new(hit.point))
}
