//! Per-frame placement of screen-space labels

use glam::{Vec2, Vec3};
use tape_core::LabelLayer;

use crate::camera::{Camera, Viewport};

/// Where a label goes this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelPlacement {
    /// Anchor is behind the camera or past the far plane
    Hidden,
    /// Pixel position relative to the viewport's top-left corner
    Visible(Vec2),
}

/// Map NDC to viewport pixels (origin top-left, y down)
pub fn ndc_to_pixel(ndc: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.width,
        (ndc.y * -0.5 + 0.5) * viewport.height,
    )
}

/// Project one world-space anchor.
///
/// Points that land off-screen but in front of the camera stay visible; the
/// painter clips them.
pub fn project_anchor(anchor: Vec3, camera: &Camera, viewport: Viewport) -> LabelPlacement {
    let ndc = camera.project_to_ndc(anchor);
    if !ndc.is_finite() || ndc.z > 1.0 {
        return LabelPlacement::Hidden;
    }
    LabelPlacement::Visible(ndc_to_pixel(ndc.truncate(), viewport))
}

/// Re-place every label in the layer. Returns how many are visible.
///
/// Hidden labels keep their text and last position. Runs every frame, even
/// for an empty layer.
pub fn project_labels(labels: &mut LabelLayer, camera: &Camera, viewport: Viewport) -> usize {
    let placements: Vec<_> = labels
        .iter()
        .map(|(id, label)| (id, project_anchor(label.anchor, camera, viewport)))
        .collect();

    let mut visible = 0;
    for (id, placement) in placements {
        match placement {
            LabelPlacement::Visible(pixel) => {
                labels.show_at(id, pixel);
                visible += 1;
            }
            LabelPlacement::Hidden => labels.hide(id),
        }
    }
    visible
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn setup() -> (Camera, Viewport) {
        let viewport = Viewport::new(800.0, 600.0);
        (Camera::new(viewport.aspect()), viewport)
    }

    #[test]
    fn test_point_in_front_is_visible_inside_viewport() {
        let (camera, viewport) = setup();
        for anchor in [Vec3::ZERO, Vec3::new(0.5, -0.5, 1.0), Vec3::new(-1.0, 1.0, -2.0)] {
            match project_anchor(anchor, &camera, viewport) {
                LabelPlacement::Visible(pixel) => assert!(viewport.contains(pixel)),
                LabelPlacement::Hidden => panic!("{anchor:?} should be visible"),
            }
        }
    }

    #[test]
    fn test_target_projects_to_center() {
        let (camera, viewport) = setup();
        let LabelPlacement::Visible(pixel) = project_anchor(camera.target, &camera, viewport) else {
            panic!("target should be visible");
        };
        assert_relative_eq!(pixel, Vec2::new(400.0, 300.0), epsilon = 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_hidden() {
        let (camera, viewport) = setup();
        let behind = camera.position() + (camera.position() - camera.target);
        assert_eq!(project_anchor(behind, &camera, viewport), LabelPlacement::Hidden);
    }

    #[test]
    fn test_project_labels_hides_without_removing() {
        let (mut camera, viewport) = setup();
        let mut labels = LabelLayer::new();
        let id = labels.append("10.0 cm", Vec3::ZERO);

        assert_eq!(project_labels(&mut labels, &camera, viewport), 1);
        let shown_at = labels.get(id).unwrap().screen_position;
        assert!(labels.get(id).unwrap().visible);

        // move the camera past the anchor, still looking down -Z
        camera.target = Vec3::new(0.0, 0.0, -10.0);
        assert_eq!(project_labels(&mut labels, &camera, viewport), 0);
        let label = labels.get(id).unwrap();
        assert!(!label.visible);
        assert_eq!(label.screen_position, shown_at);
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_empty_layer_is_noop() {
        let (camera, viewport) = setup();
        let mut labels = LabelLayer::new();
        assert_eq!(project_labels(&mut labels, &camera, viewport), 0);
    }

    #[test]
    fn test_ndc_to_pixel_flips_y() {
        let viewport = Viewport::new(100.0, 50.0);
        assert_eq!(ndc_to_pixel(Vec2::new(-1.0, 1.0), viewport), Vec2::ZERO);
        assert_eq!(ndc_to_pixel(Vec2::new(1.0, -1.0), viewport), Vec2::new(100.0, 50.0));
    }
}
