//! Placed points and measured segments

use glam::Vec3;

use crate::config::MeasureConfig;
use crate::overlay::{LabelId, LabelLayer};
use crate::units::LengthUnit;

use super::Point3D;
use super::lifecycle::{AnnotationScene, DisposalReport, dispose_all};

/// The most recently placed point while it still waits for a partner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPoint<H> {
    pub point: Point3D,
    pub marker: H,
}

/// Two consecutive points with their distance, line and label.
///
/// Distance and text are fixed when the segment is formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<H> {
    pub start: PendingPoint<H>,
    pub end: PendingPoint<H>,
    /// Euclidean distance in world units
    pub world_distance: f32,
    /// Distance converted to the display unit
    pub distance: f32,
    /// Formatted label text
    pub text: String,
    pub line: H,
    pub label: LabelId,
}

impl<H> Segment<H> {
    /// Label anchor
    pub fn midpoint(&self) -> Vec3 {
        self.start.point.midpoint(&self.end.point)
    }
}

/// Ordered measurement state.
///
/// Points pair strictly in arrival order: the 1st with the 2nd, the 3rd with
/// the 4th, and so on. A completed pair is stored as a [`Segment`] that owns
/// both endpoints, so at most one point is ever pending.
#[derive(Debug)]
pub struct MeasurementStore<H> {
    segments: Vec<Segment<H>>,
    pending: Option<PendingPoint<H>>,
    config: MeasureConfig,
}

impl<H: Copy + Eq + std::fmt::Debug> MeasurementStore<H> {
    pub fn new(config: MeasureConfig) -> Self {
        Self {
            segments: Vec::new(),
            pending: None,
            config,
        }
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Place a point: attach its marker and, when it completes a pair, the
    /// segment's line and label.
    ///
    /// Returns the new segment if one was formed.
    pub fn add_point<S>(
        &mut self,
        point: Point3D,
        scene: &mut S,
        labels: &mut LabelLayer,
    ) -> Option<&Segment<H>>
    where
        S: AnnotationScene<Handle = H>,
    {
        let marker = scene.spawn_marker(point.position(), &self.config);
        let placed = PendingPoint { point, marker };

        let Some(start) = self.pending.take() else {
            self.pending = Some(placed);
            return None;
        };

        let world_distance = start.point.distance(&placed.point);
        let distance = self.config.display_distance(world_distance);
        let text = self.config.format(distance);
        let line = scene.spawn_line(start.point.position(), placed.point.position(), &self.config);
        let label = labels.append(text.clone(), start.point.midpoint(&placed.point));

        tracing::info!("Measured segment #{}: {}", self.segments.len() + 1, text);

        self.segments.push(Segment {
            start,
            end: placed,
            world_distance,
            distance,
            text,
            line,
            label,
        });
        self.segments.last()
    }

    /// Release every marker, line and label, then empty the store.
    ///
    /// Clearing an empty store is a no-op.
    pub fn clear<S>(&mut self, scene: &mut S, labels: &mut LabelLayer) -> DisposalReport
    where
        S: AnnotationScene<Handle = H>,
    {
        let segments = std::mem::take(&mut self.segments);
        let pending = self.pending.take();

        let markers = segments
            .iter()
            .flat_map(|s| [s.start.marker, s.end.marker])
            .chain(pending.map(|p| p.marker));
        let lines = segments.iter().map(|s| s.line);
        let label_ids = segments.iter().map(|s| s.label);

        let report = dispose_all(scene, labels, markers, lines, label_ids);
        if !report.is_empty() {
            tracing::debug!(
                "Cleared measurements: {} nodes, {} labels",
                report.nodes_released,
                report.labels_removed
            );
        }
        report
    }

    /// Switch the display unit for segments formed from now on
    pub fn set_unit(&mut self, unit: LengthUnit) {
        if self.config.unit != unit {
            tracing::debug!("Display unit set to {:?}", unit);
            self.config.unit = unit;
        }
    }

    pub fn segments(&self) -> &[Segment<H>] {
        &self.segments
    }

    pub fn pending(&self) -> Option<&PendingPoint<H>> {
        self.pending.as_ref()
    }

    /// All placed points in arrival order
    pub fn points(&self) -> Vec<Point3D> {
        self.segments
            .iter()
            .flat_map(|s| [s.start.point, s.end.point])
            .chain(self.pending.map(|p| p.point))
            .collect()
    }

    /// Marker handles in arrival order (one per placed point)
    pub fn markers(&self) -> Vec<H> {
        self.segments
            .iter()
            .flat_map(|s| [s.start.marker, s.end.marker])
            .chain(self.pending.map(|p| p.marker))
            .collect()
    }

    pub fn point_count(&self) -> usize {
        self.segments.len() * 2 + usize::from(self.pending.is_some())
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.pending.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::super::lifecycle::test_support::RecordingScene;
    use super::*;

    fn store() -> MeasurementStore<u32> {
        MeasurementStore::new(MeasureConfig::default())
    }

    fn p(x: f32, y: f32, z: f32) -> Point3D {
        Point3D::new(Vec3::new(x, y, z))
    }

    #[test]
    fn test_segment_count_tracks_points() {
        let mut store = store();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();

        for n in 1..=7 {
            store.add_point(p(n as f32, 0.0, 0.0), &mut scene, &mut labels);
            assert_eq!(store.point_count(), n);
            assert_eq!(store.markers().len(), n);
            assert_eq!(store.segment_count(), n / 2);
            assert_eq!(labels.len(), store.segment_count());
            assert_eq!(store.pending().is_some(), n % 2 == 1);
        }
    }

    #[test]
    fn test_distance_is_scaled_to_centimeters() {
        let mut store = store();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();

        assert!(store.add_point(p(0.0, 0.0, 0.0), &mut scene, &mut labels).is_none());
        let segment = store
            .add_point(p(1.0, 0.0, 0.0), &mut scene, &mut labels)
            .unwrap();

        approx::assert_relative_eq!(segment.distance, 100.0);
        assert_eq!(segment.text, "100.0 cm");
        assert_eq!(segment.midpoint(), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let mut labels = LabelLayer::new();
        let mut scene = RecordingScene::default();

        let mut forward = store();
        forward.add_point(p(1.0, 2.0, 3.0), &mut scene, &mut labels);
        forward.add_point(p(-2.0, 0.5, 4.0), &mut scene, &mut labels);

        let mut backward = store();
        backward.add_point(p(-2.0, 0.5, 4.0), &mut scene, &mut labels);
        backward.add_point(p(1.0, 2.0, 3.0), &mut scene, &mut labels);

        approx::assert_relative_eq!(
            forward.segments()[0].distance,
            backward.segments()[0].distance
        );
    }

    #[test]
    fn test_pairing_follows_arrival_order() {
        let mut store = store();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();
        let points = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 5.0, 0.0),
            p(0.0, 5.0, 2.0),
        ];
        for point in points {
            store.add_point(point, &mut scene, &mut labels);
        }

        let segments = store.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start.point, points[0]);
        assert_eq!(segments[0].end.point, points[1]);
        assert_eq!(segments[1].start.point, points[2]);
        assert_eq!(segments[1].end.point, points[3]);
        assert_eq!(store.points(), points.to_vec());

        // Lines are drawn between the paired points only
        assert_eq!(scene.lines.len(), 2);
        assert_eq!(scene.lines[0].1, points[0].position());
        assert_eq!(scene.lines[0].2, points[1].position());
        assert_eq!(scene.lines[1].1, points[2].position());
        assert_eq!(scene.lines[1].2, points[3].position());
    }

    #[test]
    fn test_label_anchored_at_midpoint() {
        let mut store = store();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();
        store.add_point(p(0.0, 0.0, 0.0), &mut scene, &mut labels);
        store.add_point(p(0.0, 2.0, 0.0), &mut scene, &mut labels);

        let label = labels.get(store.segments()[0].label).unwrap();
        assert_eq!(label.anchor, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(label.text, "200.0 cm");
        assert!(!label.visible);
    }

    #[test]
    fn test_clear_releases_everything_once() {
        let mut store = store();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();
        for i in 0..5 {
            store.add_point(p(i as f32, 0.0, 0.0), &mut scene, &mut labels);
        }
        // 5 markers + 2 lines
        assert_eq!(scene.live.len(), 7);

        let report = store.clear(&mut scene, &mut labels);
        assert_eq!(report.nodes_released, 7);
        assert_eq!(report.labels_removed, 2);
        assert!(scene.live.is_empty());
        assert!(labels.is_empty());
        assert!(store.is_empty());
        assert_eq!(store.point_count(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = store();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();
        store.add_point(p(0.0, 0.0, 0.0), &mut scene, &mut labels);
        store.add_point(p(1.0, 0.0, 0.0), &mut scene, &mut labels);

        store.clear(&mut scene, &mut labels);
        let disposed = scene.disposed.len();
        let second = store.clear(&mut scene, &mut labels);

        assert!(second.is_empty());
        assert_eq!(scene.disposed.len(), disposed);
        assert!(store.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_dispose_after_clear_does_not_panic() {
        let mut store = store();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();
        store.add_point(p(0.0, 0.0, 0.0), &mut scene, &mut labels);
        store.add_point(p(1.0, 0.0, 0.0), &mut scene, &mut labels);
        store.clear(&mut scene, &mut labels);

        let report = dispose_all(
            &mut scene,
            &mut labels,
            store.markers(),
            store.segments().iter().map(|s| s.line),
            store.segments().iter().map(|s| s.label),
        );
        assert!(report.is_empty());
    }

    #[test]
    fn test_set_unit_leaves_existing_segments() {
        let mut store = store();
        let mut scene = RecordingScene::default();
        let mut labels = LabelLayer::new();
        store.add_point(p(0.0, 0.0, 0.0), &mut scene, &mut labels);
        store.add_point(p(0.5, 0.0, 0.0), &mut scene, &mut labels);
        let before = store.segments()[0].clone();

        store.set_unit(LengthUnit::Millimeters);
        store.add_point(p(0.0, 0.0, 0.0), &mut scene, &mut labels);
        store.add_point(p(0.5, 0.0, 0.0), &mut scene, &mut labels);

        let segments = store.segments();
        assert_eq!(segments[0], before);
        assert_eq!(labels.get(segments[0].label).unwrap().text, "50.0 cm");
        assert_eq!(segments[1].text, "500.0 mm");
        assert_eq!(labels.get(segments[1].label).unwrap().text, "500.0 mm");
    }
}
