//! Axis-aligned bounds used for camera framing and pick rejection.

use glam::{Mat4, Vec3};

use crate::camera::Ray;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box.
    pub min: Vec3,
    /// Maximum corner of the bounding box.
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a new bounding box from min and max points.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an empty (inverted) bounding box.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Creates a bounding box that contains all given points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |bbox, point| bbox.expand_to_include(point))
    }

    /// Returns the center of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size (full extents) of the bounding box.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of the three extents.
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// Returns the union of two bounding boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns a new bounding box expanded to include the given point.
    pub fn expand_to_include(&self, point: Vec3) -> BoundingBox {
        BoundingBox {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Axis-aligned box around the transformed corners.
    pub fn transform(&self, transform: &Mat4) -> BoundingBox {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        BoundingBox::from_points(corners.map(|c| transform.transform_point3(c)))
    }

    /// Returns true if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Slab test. Returns the entry parameter along the ray (0 if the origin
    /// is inside), or `None` when the ray misses.
    ///
    /// The ray direction need not be normalized.
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let inv = direction.recip();
        let t0 = (self.min - origin) * inv;
        let t1 = (self.max - origin) * inv;
        let near = t0.min(t1);
        let far = t0.max(t1);

        // NaN components (zero direction with origin on a slab) are skipped by max/min
        let t_enter = near.x.max(near.y).max(near.z);
        let t_exit = far.x.min(far.y).min(far.z);

        if t_exit < 0.0 || t_enter > t_exit {
            None
        } else {
            Some(t_enter.max(0.0))
        }
    }

    /// [`ray_entry`](Self::ray_entry) for a world ray
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        self.ray_entry(ray.origin, ray.direction).is_some()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points([Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 4.0)]);
        assert_eq!(bbox.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max, Vec3::new(1.0, 3.0, 4.0));
        assert_eq!(bbox.max_extent(), 5.0);
        assert!(bbox.is_valid());
        assert!(!BoundingBox::empty().is_valid());
    }

    #[test]
    fn test_transform() {
        let bbox = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let moved = bbox.transform(&Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(moved.center(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_entry() {
        let bbox = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = bbox.ray_entry(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
        assert!((t - 4.0).abs() < 1e-6);

        assert!(bbox.ray_entry(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z).is_none());
        assert!(bbox.ray_entry(Vec3::new(0.0, 0.0, 5.0), Vec3::Z).is_none());
        assert_eq!(bbox.ray_entry(Vec3::ZERO, Vec3::X), Some(0.0));
    }
}
