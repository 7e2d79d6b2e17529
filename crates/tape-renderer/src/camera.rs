//! Orbit camera for the 3D viewport (Y-up)

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Camera uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix
    pub view_proj: [[f32; 4]; 4],
    /// Eye position (w = 1)
    pub eye: [f32; 4],
}

/// A world-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Pixel size of the viewport the camera renders into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport from pixel dimensions
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height, 1.0 for a degenerate viewport
    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// True if either dimension is zero or negative
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True if a pixel position lies inside the viewport
    pub fn contains(&self, pixel: Vec2) -> bool {
        pixel.x >= 0.0 && pixel.y >= 0.0 && pixel.x <= self.width && pixel.y <= self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Saved orbit parameters, used as the reset baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Orbit centre
    pub target: Vec3,
    /// Rotation around the Y axis (radians)
    pub yaw: f32,
    /// Elevation above the XZ plane (radians)
    pub pitch: f32,
    /// Distance from the target
    pub distance: f32,
}

const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;
const MIN_DISTANCE: f32 = 0.01;
const MIN_FOV_DEGREES: f32 = 1.0;
const MAX_FOV_DEGREES: f32 = 179.0;

/// Perspective orbit camera.
///
/// With `yaw = 0` and `pitch = 0` the eye sits on +Z from the target looking
/// down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Orbit centre
    pub target: Vec3,
    /// Rotation around the Y axis (radians)
    pub yaw: f32,
    /// Elevation above the XZ plane (radians)
    pub pitch: f32,
    /// Distance from the target
    pub distance: f32,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a camera with default parameters
    pub fn new(aspect: f32) -> Self {
        Self::from_config(&CameraConfig::default(), aspect)
    }

    /// Create a camera from configuration
    ///
    /// Out-of-range clip planes and field of view fall back to the defaults;
    /// `far` always leaves room for the minimum orbit distance.
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let defaults = CameraConfig::default();

        let fov_degrees = if config.fov_degrees.is_finite()
            && (MIN_FOV_DEGREES..=MAX_FOV_DEGREES).contains(&config.fov_degrees)
        {
            config.fov_degrees
        } else {
            tracing::warn!("Invalid camera fov {}, using default", config.fov_degrees);
            defaults.fov_degrees
        };
        let near = if config.near_plane.is_finite() && config.near_plane > 0.0 {
            config.near_plane
        } else {
            tracing::warn!("Invalid near plane {}, using default", config.near_plane);
            defaults.near_plane
        };
        let far = if config.far_plane.is_finite() && config.far_plane > near {
            config.far_plane
        } else {
            tracing::warn!("Invalid far plane {}, using default", config.far_plane);
            defaults.far_plane.max(near * 2.0)
        };

        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far: far.max(MIN_DISTANCE),
        }
    }

    /// Update aspect ratio
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Eye position derived from the orbit parameters
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                cos_pitch * sin_yaw,
                sin_pitch,
                cos_pitch * cos_yaw,
            ) * self.distance
    }

    /// Orbit the camera around the target
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move the target along the view plane (world units)
    pub fn pan(&mut self, delta_right: f32, delta_up: f32) {
        let forward = (self.target - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        self.target += right * delta_right + up * delta_up;
    }

    /// Scale the orbit distance
    pub fn dolly(&mut self, scale: f32) {
        self.distance = (self.distance * scale).clamp(MIN_DISTANCE, self.far);
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get camera uniform data
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            eye: self.position().extend(1.0).to_array(),
        }
    }

    /// Convert a viewport pixel position to normalized device coordinates.
    ///
    /// The top edge of the viewport maps to +1.
    pub fn ndc_from_pixel(pointer: Vec2, viewport: Viewport) -> Vec2 {
        Vec2::new(
            (pointer.x / viewport.width) * 2.0 - 1.0,
            -(pointer.y / viewport.height) * 2.0 + 1.0,
        )
    }

    /// World-space ray from the eye through a point in NDC
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let half_height = (self.fov * 0.5).tan();
        let view_dir = Vec3::new(ndc.x * half_height * self.aspect, ndc.y * half_height, -1.0);
        let direction = self.view_matrix().inverse().transform_vector3(view_dir);
        Ray::new(self.position(), direction)
    }

    /// World-space ray through a viewport pixel
    pub fn screen_to_ray(&self, pointer: Vec2, viewport: Viewport) -> Ray {
        self.ray_from_ndc(Self::ndc_from_pixel(pointer, viewport))
    }

    /// Project a world point to normalized device coordinates.
    ///
    /// `z` is the depth in `[0, 1]` for points between the clipping planes;
    /// points behind the eye or past the far plane come out with `z > 1`.
    pub fn project_to_ndc(&self, point: Vec3) -> Vec3 {
        self.view_projection().project_point3(point)
    }

    /// Aim at the centre of a box and back off far enough to fit it.
    ///
    /// The eye is placed on +Z from the centre at
    /// `max_extent / (2 * tan(fov / 2)) * padding`.
    pub fn frame_bounds(&mut self, min: Vec3, max: Vec3, padding: f32) {
        let center = (min + max) * 0.5;
        let max_dim = (max - min).max_element();
        let distance = max_dim / (2.0 * (self.fov * 0.5).tan()) * padding;

        self.target = center;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.distance = distance.max(self.near * 2.0);
    }

    /// Snapshot of the orbit parameters
    pub fn state(&self) -> CameraState {
        CameraState {
            target: self.target,
            yaw: self.yaw,
            pitch: self.pitch,
            distance: self.distance,
        }
    }

    /// Restore orbit parameters from a snapshot
    pub fn apply_state(&mut self, state: CameraState) {
        self.target = state.target;
        self.yaw = state.yaw;
        self.pitch = state.pitch;
        self.distance = state.distance;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_default_eye_on_positive_z() {
        let camera = Camera::new(1.0);
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_ndc_from_pixel_corners() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(
            Camera::ndc_from_pixel(Vec2::ZERO, viewport),
            Vec2::new(-1.0, 1.0)
        );
        assert_eq!(
            Camera::ndc_from_pixel(Vec2::new(800.0, 600.0), viewport),
            Vec2::new(1.0, -1.0)
        );
        assert_eq!(
            Camera::ndc_from_pixel(Vec2::new(400.0, 300.0), viewport),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(1.5);
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert_relative_eq!(ray.origin, camera.position(), epsilon = 1e-5);
        assert_relative_eq!(ray.direction, Vec3::NEG_Z, epsilon = 1e-4);
    }

    #[test]
    fn test_projection_depth_behind_camera() {
        let camera = Camera::new(1.0);
        let in_front = camera.project_to_ndc(Vec3::ZERO);
        assert!(in_front.z > 0.0 && in_front.z < 1.0);
        assert_relative_eq!(in_front.x, 0.0, epsilon = 1e-5);

        let behind = camera.project_to_ndc(Vec3::new(0.0, 0.0, 10.0));
        assert!(behind.z > 1.0);
    }

    #[test]
    fn test_frame_bounds() {
        let mut camera = Camera::new(1.0);
        camera.orbit(1.0, 0.5);
        camera.frame_bounds(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 5.0, 3.0), 1.5);

        let expected = 4.0 / (2.0 * (camera.fov * 0.5).tan()) * 1.5;
        assert_relative_eq!(camera.target, Vec3::new(2.0, 3.0, 2.0));
        assert_relative_eq!(camera.distance, expected, epsilon = 1e-5);
        assert_relative_eq!(
            camera.position(),
            Vec3::new(2.0, 3.0, 2.0 + expected),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_state_round_trip() {
        let mut camera = Camera::new(1.0);
        let saved = camera.state();
        camera.orbit(0.3, 0.2);
        camera.pan(1.0, -1.0);
        camera.dolly(0.5);
        assert_ne!(camera.state(), saved);

        camera.apply_state(saved);
        assert_eq!(camera.state(), saved);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new(1.0);
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch <= MAX_PITCH);
    }

    #[test]
    fn test_invalid_clip_planes_fall_back() {
        let config = CameraConfig {
            near_plane: -1.0,
            far_plane: 0.001,
            fov_degrees: 0.0,
            ..CameraConfig::default()
        };
        let mut camera = Camera::from_config(&config, 1.0);
        let defaults = CameraConfig::default();
        assert_eq!(camera.near, defaults.near_plane);
        assert_eq!(camera.far, defaults.far_plane);
        assert_relative_eq!(camera.fov, defaults.fov_degrees.to_radians());

        // A far plane below the minimum orbit distance must not break dolly
        let config = CameraConfig {
            near_plane: 0.001,
            far_plane: 0.005,
            ..CameraConfig::default()
        };
        let mut tight = Camera::from_config(&config, 1.0);
        assert!(tight.far >= MIN_DISTANCE);
        tight.dolly(0.0001);
        assert_relative_eq!(tight.distance, MIN_DISTANCE);

        camera.dolly(1.0e9);
        assert_relative_eq!(camera.distance, camera.far);
    }
}
