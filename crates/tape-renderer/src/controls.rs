//! Pointer-driven orbit controls

use glam::Vec2;
use tape_core::ControlGate;

use crate::camera::{Camera, CameraState};
use crate::config::CameraConfig;

/// Orbit, pan and zoom driven by pointer drags and scrolling.
///
/// While disabled every input is ignored and any leftover damping motion is
/// dropped, so the camera stands still.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    enabled: bool,
    orbit_sensitivity: f32,
    pan_sensitivity: f32,
    zoom_sensitivity: f32,
    enable_damping: bool,
    damping_factor: f32,
    /// Orbit motion still to be applied when damping (yaw, pitch)
    pending_orbit: Vec2,
    saved: Option<CameraState>,
}

impl OrbitControls {
    /// Create controls from camera configuration
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            enabled: true,
            orbit_sensitivity: config.orbit_sensitivity,
            pan_sensitivity: config.pan_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            pending_orbit: Vec2::ZERO,
            saved: None,
        }
    }

    /// Orbit by a pointer drag in pixels. Returns `false` when ignored.
    pub fn rotate(&mut self, camera: &mut Camera, drag: Vec2) -> bool {
        if !self.enabled {
            return false;
        }
        let delta = Vec2::new(-drag.x, drag.y) * self.orbit_sensitivity;
        if self.enable_damping {
            self.pending_orbit += delta;
        } else {
            camera.orbit(delta.x, delta.y);
        }
        true
    }

    /// Pan by a pointer drag in pixels
    pub fn pan(&mut self, camera: &mut Camera, drag: Vec2) -> bool {
        if !self.enabled {
            return false;
        }
        let scale = camera.distance * self.pan_sensitivity;
        camera.pan(-drag.x * scale, drag.y * scale);
        true
    }

    /// Zoom by scroll units; positive moves closer
    pub fn zoom(&mut self, camera: &mut Camera, scroll: f32) -> bool {
        if !self.enabled || scroll == 0.0 {
            return false;
        }
        camera.dolly((1.0 - scroll * self.zoom_sensitivity).max(0.1));
        true
    }

    /// Apply damped motion for this frame.
    ///
    /// `dt` is in seconds; the damping factor is defined per 60 Hz frame.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) {
        if !self.enable_damping || self.pending_orbit == Vec2::ZERO {
            return;
        }
        let frames = (dt * 60.0).max(0.0);
        let remaining = (1.0 - self.damping_factor).powf(frames);
        let step = self.pending_orbit * (1.0 - remaining);
        camera.orbit(step.x, step.y);
        self.pending_orbit *= remaining;
        if self.pending_orbit.length_squared() < 1e-10 {
            self.pending_orbit = Vec2::ZERO;
        }
    }

    /// Remember the camera's current placement as the reset baseline
    pub fn save_state(&mut self, camera: &Camera) {
        self.saved = Some(camera.state());
    }

    /// Saved reset baseline, if any
    pub fn saved_state(&self) -> Option<CameraState> {
        self.saved
    }

    /// Return the camera to the saved baseline. No-op without one.
    pub fn reset(&mut self, camera: &mut Camera) -> bool {
        self.pending_orbit = Vec2::ZERO;
        match self.saved {
            Some(state) => {
                camera.apply_state(state);
                true
            }
            None => false,
        }
    }

    /// Whether damped motion is still in flight
    pub fn is_moving(&self) -> bool {
        self.pending_orbit != Vec2::ZERO
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl ControlGate for OrbitControls {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.pending_orbit = Vec2::ZERO;
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
