//! Annotation resource teardown

use glam::Vec3;

use crate::config::MeasureConfig;
use crate::overlay::{LabelId, LabelLayer};

/// Scene-side collaborator that owns marker and line objects.
///
/// Implementors create renderable annotation nodes and release them. A
/// released node must have its GPU geometry and material freed before it is
/// detached from the graph.
pub trait AnnotationScene {
    /// Handle to a node created by this scene
    type Handle: Copy + Eq + std::fmt::Debug;

    /// Create and attach a marker glyph centred on `position`
    fn spawn_marker(&mut self, position: Vec3, style: &MeasureConfig) -> Self::Handle;

    /// Create and attach a line between two points
    fn spawn_line(&mut self, start: Vec3, end: Vec3, style: &MeasureConfig) -> Self::Handle;

    /// Release a node's resources and detach it.
    ///
    /// Returns `false` when the node was already released or never existed.
    fn dispose(&mut self, handle: Self::Handle) -> bool;
}

/// Outcome of a [`dispose_all`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposalReport {
    /// Scene nodes released by this call
    pub nodes_released: usize,
    /// Labels detached by this call
    pub labels_removed: usize,
    /// Handles that were already gone
    pub already_released: usize,
}

impl DisposalReport {
    pub fn is_empty(&self) -> bool {
        self.nodes_released == 0 && self.labels_removed == 0 && self.already_released == 0
    }
}

/// Release every marker, line and label handed in.
///
/// Partial lists are fine. Handles that were already released are counted
/// and skipped, never treated as errors.
pub fn dispose_all<S: AnnotationScene>(
    scene: &mut S,
    labels: &mut LabelLayer,
    markers: impl IntoIterator<Item = S::Handle>,
    lines: impl IntoIterator<Item = S::Handle>,
    label_ids: impl IntoIterator<Item = LabelId>,
) -> DisposalReport {
    let mut report = DisposalReport::default();

    for handle in markers.into_iter().chain(lines) {
        if scene.dispose(handle) {
            report.nodes_released += 1;
        } else {
            tracing::trace!("Annotation node {:?} already released", handle);
            report.already_released += 1;
        }
    }

    for id in label_ids {
        if labels.remove(id) {
            report.labels_removed += 1;
        } else {
            report.already_released += 1;
        }
    }

    report
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingScene;
    use super::*;

    #[test]
    fn test_dispose_partial_lists() {
        let config = MeasureConfig::default();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();

        let marker = scene.spawn_marker(Vec3::ZERO, &config);
        let report = dispose_all(&mut scene, &mut labels, [marker], [], []);

        assert_eq!(report.nodes_released, 1);
        assert_eq!(report.already_released, 0);
        assert!(scene.live.is_empty());
    }

    #[test]
    fn test_dispose_already_released_is_noop() {
        let config = MeasureConfig::default();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();

        let marker = scene.spawn_marker(Vec3::ZERO, &config);
        let line = scene.spawn_line(Vec3::ZERO, Vec3::X, &config);
        let label = labels.append("100.0 cm", Vec3::X * 0.5);

        let first = dispose_all(&mut scene, &mut labels, [marker], [line], [label]);
        assert_eq!(first.nodes_released, 2);
        assert_eq!(first.labels_removed, 1);

        let second = dispose_all(&mut scene, &mut labels, [marker], [line], [label]);
        assert_eq!(second.nodes_released, 0);
        assert_eq!(second.labels_removed, 0);
        assert_eq!(second.already_released, 3);
    }

    #[test]
    fn test_dispose_empty_lists() {
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();
        let report = dispose_all(&mut scene, &mut labels, [], [], []);
        assert!(report.is_empty());
    }
}
