//! Measurement engine context
//!
//! [`ViewerEngine`] owns everything one viewer needs to place and display
//! measurements: the scene, camera and controls, the active model, the
//! measurement store with its label layer, and the measuring mode.

use glam::Vec2;

use tape_core::{
    CursorHint, DisposalReport, LabelLayer, LengthUnit, MeasureConfig, MeasureMode,
    MeasurementStore, ModeController, Model, Point3D, SwapPolicy,
};
use tape_renderer::{
    Camera, NodeId, OrbitControls, RendererConfig, Scene, Viewport, pick, project_labels,
};

/// The measurement engine and its host collaborators
pub struct ViewerEngine {
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    model: Option<NodeId>,
    model_name: Option<String>,
    /// A replacement model has been requested but not installed yet
    loading: bool,
    store: MeasurementStore<NodeId>,
    labels: LabelLayer,
    mode: ModeController,
    viewport: Viewport,
    swap_policy: SwapPolicy,
    frame_padding: f32,
}

impl ViewerEngine {
    pub fn new(renderer: &RendererConfig, measure: MeasureConfig) -> Self {
        let viewport = Viewport::default();
        let mut controls = OrbitControls::new(&renderer.camera);
        let mode = ModeController::new();
        mode.apply(&mut controls);

        let camera = Camera::from_config(&renderer.camera, viewport.aspect());
        controls.save_state(&camera);

        Self {
            scene: Scene::new(),
            camera,
            controls,
            model: None,
            model_name: None,
            loading: false,
            swap_policy: measure.swap_policy,
            store: MeasurementStore::new(measure),
            labels: LabelLayer::new(),
            mode,
            viewport,
            frame_padding: renderer.camera.frame_padding,
        }
    }

    /// Switch between orbiting and point placement
    pub fn toggle_measure_mode(&mut self) -> MeasureMode {
        self.mode.toggle(&mut self.controls)
    }

    /// Remove every point, segment, marker, line and label
    pub fn clear_measurements(&mut self) -> DisposalReport {
        self.store.clear(&mut self.scene, &mut self.labels)
    }

    /// Return the camera to the view saved when the model was framed
    pub fn reset_camera(&mut self) -> bool {
        self.controls.reset(&mut self.camera)
    }

    /// Handle a primary-button press at `pointer` (viewport pixels).
    ///
    /// Only places a point while measuring and when the model is hit. While a
    /// replacement model is loading there is no pick target.
    pub fn pointer_down(&mut self, pointer: Vec2) -> Option<Point3D> {
        if !self.mode.accepts_pointer() {
            return None;
        }
        let point = pick(pointer, self.viewport, &self.camera, &self.scene, self.pick_target())?;
        self.store.add_point(point, &mut self.scene, &mut self.labels);
        Some(point)
    }

    /// Per-frame update: camera damping, then label placement.
    ///
    /// Returns the number of visible labels.
    pub fn frame(&mut self, dt: f32) -> usize {
        self.controls.update(&mut self.camera, dt);
        project_labels(&mut self.labels, &self.camera, self.viewport)
    }

    pub fn orbit(&mut self, drag: Vec2) -> bool {
        self.controls.rotate(&mut self.camera, drag)
    }

    pub fn pan(&mut self, drag: Vec2) -> bool {
        self.controls.pan(&mut self.camera, drag)
    }

    pub fn zoom(&mut self, scroll: f32) -> bool {
        self.controls.zoom(&mut self.camera, scroll)
    }

    /// Track the viewport's pixel size and the camera aspect ratio
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if !viewport.is_empty() {
            self.camera.set_aspect(viewport.aspect());
        }
    }

    /// Replace the viewed model.
    ///
    /// Disposes the previous model's subtree, attaches the new one, frames
    /// the camera on it and saves that view as the reset baseline.
    /// Measurements are cleared only under [`SwapPolicy::Clear`].
    pub fn install_model(&mut self, model: &Model) -> NodeId {
        if self.swap_policy == SwapPolicy::Clear {
            self.clear_measurements();
        }

        if let Some(previous) = self.model.take() {
            let released = self.scene.dispose_subtree(previous);
            tracing::debug!("Released previous model ({} nodes)", released);
        }

        let root = self.scene.attach_model(model);
        self.model = Some(root);
        self.model_name = Some(model.name.clone());

        if let Some(bounds) = self.scene.subtree_bounds(root)
            && bounds.is_valid()
        {
            self.camera
                .frame_bounds(bounds.min, bounds.max, self.frame_padding);
        }
        self.controls.save_state(&self.camera);

        tracing::info!(
            "Installed model '{}' ({} triangles, {} measurements kept)",
            model.name,
            model.triangle_count(),
            self.store.segment_count()
        );
        root
    }

    /// Mark the current model as superseded by a pending load
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// The pending load resolved, installed or not
    pub fn finish_load(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn pick_target(&self) -> Option<NodeId> {
        if self.loading { None } else { self.model }
    }

    pub fn set_swap_policy(&mut self, policy: SwapPolicy) {
        self.swap_policy = policy;
    }

    pub fn swap_policy(&self) -> SwapPolicy {
        self.swap_policy
    }

    /// Change the display unit of measurements placed from now on
    pub fn set_unit(&mut self, unit: LengthUnit) {
        self.store.set_unit(unit);
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode.mode()
    }

    pub fn cursor(&self) -> CursorHint {
        self.mode.cursor()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn store(&self) -> &MeasurementStore<NodeId> {
        &self.store
    }

    pub fn labels(&self) -> &LabelLayer {
        &self.labels
    }

    pub fn model(&self) -> Option<NodeId> {
        self.model
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    pub fn point_count(&self) -> usize {
        self.store.point_count()
    }

    pub fn segment_count(&self) -> usize {
        self.store.segment_count()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

impl Default for ViewerEngine {
    fn default() -> Self {
        Self::new(&RendererConfig::default(), MeasureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;
    use tape_renderer::{LabelPlacement, RenderLayer, project_anchor};

    use super::*;

    fn engine_with_cube() -> ViewerEngine {
        let mut engine = ViewerEngine::default();
        engine.set_viewport(1600.0, 900.0);
        engine.install_model(&Model::cube(2.0));
        engine
    }

    fn pixel_of(engine: &ViewerEngine, point: Vec3) -> Vec2 {
        match project_anchor(point, engine.camera(), engine.viewport()) {
            LabelPlacement::Visible(pixel) => pixel,
            LabelPlacement::Hidden => panic!("{point:?} is not in view"),
        }
    }

    #[test]
    fn test_measure_across_cube_face() {
        let mut engine = engine_with_cube();
        engine.toggle_measure_mode();

        let left = pixel_of(&engine, Vec3::new(-0.9999, 0.0, 1.0));
        let right = pixel_of(&engine, Vec3::new(0.9999, 0.0, 1.0));

        let a = engine.pointer_down(left).unwrap();
        let b = engine.pointer_down(right).unwrap();
        assert_relative_eq!(a.position().z, 1.0, epsilon = 1e-3);
        assert_relative_eq!(b.position().z, 1.0, epsilon = 1e-3);

        let segments = engine.store().segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "200.0 cm");
        assert_relative_eq!(segments[0].distance, 200.0, epsilon = 0.1);
        assert_eq!(engine.point_count(), 2);
        assert_eq!(engine.scene().layer_count(RenderLayer::Annotation), 3);

        // Label is placed on the next frame, at the face centre
        engine.frame(1.0 / 60.0);
        let label = engine.labels().visible().next().unwrap();
        assert_eq!(label.text, "200.0 cm");
        let position = label.screen_position.unwrap();
        assert_relative_eq!(position.x, 800.0, epsilon = 1.0);
        assert_relative_eq!(position.y, 450.0, epsilon = 1.0);

        // Back to idle: clicks no longer place points
        assert_eq!(engine.toggle_measure_mode(), MeasureMode::Idle);
        assert!(engine.pointer_down(left).is_none());
        assert_eq!(engine.point_count(), 2);

        engine.clear_measurements();
        assert_eq!(engine.point_count(), 0);
        assert_eq!(engine.segment_count(), 0);
        assert_eq!(engine.label_count(), 0);
        assert_eq!(engine.scene().layer_count(RenderLayer::Annotation), 0);
    }

    #[test]
    fn test_clicks_ignored_while_idle() {
        let mut engine = engine_with_cube();
        assert_eq!(engine.mode(), MeasureMode::Idle);
        assert!(engine.pointer_down(Vec2::new(800.0, 450.0)).is_none());
        assert_eq!(engine.point_count(), 0);
        assert_eq!(engine.scene().layer_count(RenderLayer::Annotation), 0);
    }

    #[test]
    fn test_miss_places_nothing() {
        let mut engine = engine_with_cube();
        engine.toggle_measure_mode();
        assert!(engine.pointer_down(Vec2::new(5.0, 5.0)).is_none());
        assert_eq!(engine.point_count(), 0);
    }

    #[test]
    fn test_no_model_places_nothing() {
        let mut engine = ViewerEngine::default();
        engine.set_viewport(800.0, 600.0);
        engine.toggle_measure_mode();
        assert!(engine.pointer_down(Vec2::new(400.0, 300.0)).is_none());
    }

    #[test]
    fn test_pending_point_has_no_label() {
        let mut engine = engine_with_cube();
        engine.toggle_measure_mode();
        engine.pointer_down(Vec2::new(800.0, 450.0)).unwrap();

        assert_eq!(engine.point_count(), 1);
        assert_eq!(engine.segment_count(), 0);
        assert_eq!(engine.label_count(), 0);
        assert!(engine.store().pending().is_some());
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut engine = engine_with_cube();
        engine.toggle_measure_mode();
        for x in [780.0, 820.0, 800.0] {
            engine.pointer_down(Vec2::new(x, 450.0)).unwrap();
        }
        assert_eq!(engine.scene().layer_count(RenderLayer::Annotation), 4);

        let report = engine.clear_measurements();
        assert_eq!(report.nodes_released, 4);
        assert_eq!(report.labels_removed, 1);
        assert_eq!(engine.point_count(), 0);
        assert_eq!(engine.segment_count(), 0);
        assert_eq!(engine.label_count(), 0);
        assert_eq!(engine.scene().layer_count(RenderLayer::Annotation), 0);

        // Mode is left alone and clearing again is harmless
        assert_eq!(engine.mode(), MeasureMode::Measuring);
        assert!(engine.clear_measurements().is_empty());
    }

    #[test]
    fn test_mode_gates_camera_controls() {
        let mut engine = engine_with_cube();
        assert!(engine.orbit(Vec2::new(10.0, 0.0)));

        engine.toggle_measure_mode();
        let yaw = engine.camera().yaw;
        assert!(!engine.orbit(Vec2::new(10.0, 0.0)));
        assert!(!engine.zoom(1.0));
        assert_eq!(engine.camera().yaw, yaw);

        engine.toggle_measure_mode();
        assert!(engine.orbit(Vec2::new(10.0, 0.0)));
        assert_eq!(engine.cursor(), CursorHint::Grab);
    }

    #[test]
    fn test_reset_camera_restores_framed_view() {
        let mut engine = engine_with_cube();
        let framed = engine.camera().state();

        engine.orbit(Vec2::new(120.0, -40.0));
        engine.zoom(2.0);
        assert_ne!(engine.camera().state(), framed);

        assert!(engine.reset_camera());
        assert_eq!(engine.camera().state(), framed);
    }

    #[test]
    fn test_swap_preserves_measurements_by_default() {
        let mut engine = engine_with_cube();
        let first_model = engine.model().unwrap();
        engine.toggle_measure_mode();
        for x in [780.0, 820.0, 800.0] {
            engine.pointer_down(Vec2::new(x, 450.0)).unwrap();
        }

        engine.install_model(&Model::cube(4.0));

        assert!(!engine.scene().contains(first_model));
        assert_eq!(engine.scene().layer_count(RenderLayer::Model), 1);
        assert_eq!(engine.point_count(), 3);
        assert_eq!(engine.segment_count(), 1);
        assert_eq!(engine.label_count(), 1);
        assert_eq!(engine.scene().layer_count(RenderLayer::Annotation), 4);
        assert_eq!(engine.mode(), MeasureMode::Measuring);
    }

    #[test]
    fn test_swap_with_clear_policy() {
        let mut engine = engine_with_cube();
        engine.set_swap_policy(SwapPolicy::Clear);
        engine.toggle_measure_mode();
        engine.pointer_down(Vec2::new(780.0, 450.0)).unwrap();
        engine.pointer_down(Vec2::new(820.0, 450.0)).unwrap();

        engine.install_model(&Model::cube(4.0));

        assert_eq!(engine.point_count(), 0);
        assert_eq!(engine.label_count(), 0);
        assert_eq!(engine.scene().layer_count(RenderLayer::Annotation), 0);
        assert_eq!(engine.model_name(), Some("Cube"));
    }

    #[test]
    fn test_swap_reframes_camera() {
        let mut engine = engine_with_cube();
        let small = engine.camera().distance;
        engine.install_model(&Model::cube(4.0));
        assert_relative_eq!(engine.camera().distance, small * 2.0, epsilon = 1e-4);
        assert_eq!(engine.camera().target, Vec3::ZERO);
    }

    #[test]
    fn test_viewport_resize_updates_aspect() {
        let mut engine = ViewerEngine::default();
        engine.set_viewport(1600.0, 900.0);
        assert_relative_eq!(engine.camera().aspect, 1600.0 / 900.0);

        // Collapsed panels keep the last usable aspect
        engine.set_viewport(0.0, 0.0);
        assert_relative_eq!(engine.camera().aspect, 1600.0 / 900.0);
    }

    #[test]
    fn test_unit_change_applies_to_new_segments() {
        let mut engine = engine_with_cube();
        engine.toggle_measure_mode();
        let left = pixel_of(&engine, Vec3::new(-0.5, 0.0, 1.0));
        let right = pixel_of(&engine, Vec3::new(0.5, 0.0, 1.0));
        engine.pointer_down(left).unwrap();
        engine.pointer_down(right).unwrap();

        engine.set_unit(LengthUnit::Millimeters);
        engine.pointer_down(left).unwrap();
        engine.pointer_down(right).unwrap();

        let segments = engine.store().segments();
        assert_eq!(segments[0].text, "100.0 cm");
        assert_eq!(engine.labels().get(segments[0].label).unwrap().text, "100.0 cm");
        assert_eq!(segments[1].text, "1000.0 mm");
    }

    #[test]
    fn test_no_picks_while_replacement_loads() {
        let mut engine = engine_with_cube();
        engine.toggle_measure_mode();

        engine.begin_load();
        assert!(engine.pointer_down(Vec2::new(800.0, 450.0)).is_none());
        assert_eq!(engine.point_count(), 0);

        engine.finish_load();
        assert!(engine.pointer_down(Vec2::new(800.0, 450.0)).is_some());
    }
}
