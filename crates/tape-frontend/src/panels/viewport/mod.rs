//! 3D Viewport panel

mod labels;

use glam::Vec2;

use tape_core::{CursorHint, MeasureMode};

use crate::panels::Panel;
use crate::state::{AppAction, SharedAppState, SharedViewportState, ViewerEngine};

use labels::paint_labels;

/// Scroll distance (points) treated as one zoom step
const SCROLL_STEP: f32 = 50.0;

/// 3D viewport panel
pub struct ViewportPanel {
    last_size: egui::Vec2,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            last_size: egui::Vec2::ZERO,
        }
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for ViewportPanel {
    fn name(&self) -> &str {
        "3D Viewport"
    }

    fn needs_render_context(&self) -> bool {
        true
    }

    fn ui(&mut self, ui: &mut egui::Ui, _app_state: &SharedAppState) {
        // Fallback when no render context
        let available_size = ui.available_size();
        let (response, painter) =
            ui.allocate_painter(available_size, egui::Sense::click_and_drag());

        painter.rect_filled(response.rect, 0.0, egui::Color32::from_rgb(30, 30, 30));
        painter.text(
            response.rect.center(),
            egui::Align2::CENTER_CENTER,
            "3D Viewport\n(WebGPU not available)",
            egui::FontId::proportional(16.0),
            egui::Color32::GRAY,
        );

        self.last_size = available_size;
    }

    fn ui_with_render_context(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        render_state: &egui_wgpu::RenderState,
        viewport_state: &SharedViewportState,
    ) {
        let available_size = ui.available_size();
        let width = available_size.x as u32;
        let height = available_size.y as u32;

        if width == 0 || height == 0 {
            return;
        }

        let dt = ui.input(|i| i.stable_dt);
        let mut app = app_state.lock();
        app.engine.set_viewport(available_size.x, available_size.y);
        app.engine.frame(dt);

        // Ensure texture and render
        let texture_id = {
            let mut state = viewport_state.lock();
            let mut egui_renderer = render_state.renderer.write();
            let tex_id = state.ensure_texture(width, height, &mut egui_renderer);
            state.render(&mut app.engine);
            tex_id
        };

        // Display the rendered texture
        let response = ui.add(
            egui::Image::new(egui::load::SizedTexture::new(
                texture_id,
                [available_size.x, available_size.y],
            ))
            .sense(egui::Sense::click_and_drag()),
        );

        handle_input(ui, &response, &mut app.engine);

        if response.hovered() {
            ui.ctx()
                .set_cursor_icon(cursor_icon(app.engine.cursor(), &response));
        }

        paint_labels(ui, response.rect, app.engine.labels());

        if app.engine.controls().is_moving() {
            ui.ctx().request_repaint();
        }
        drop(app);

        response.context_menu(|ui| {
            if ui.button("Reset View").clicked() {
                app_state.lock().queue_action(AppAction::ResetCamera);
                ui.close_menu();
            }
            if ui.button("Clear Measurements").clicked() {
                app_state.lock().queue_action(AppAction::ClearMeasurements);
                ui.close_menu();
            }
        });

        self.last_size = available_size;
    }
}

/// Route pointer input to the engine.
///
/// A primary press places a point while measuring. Drags and scrolling go
/// to the orbit controls, which ignore them while measuring.
fn handle_input(ui: &egui::Ui, response: &egui::Response, engine: &mut ViewerEngine) {
    let origin = response.rect.min;

    if response.hovered()
        && engine.mode() == MeasureMode::Measuring
        && ui.input(|i| i.pointer.primary_pressed())
        && let Some(pos) = response.hover_pos()
    {
        let local = pos - origin;
        if engine.pointer_down(Vec2::new(local.x, local.y)).is_none() {
            tracing::trace!("Pointer at ({:.0}, {:.0}) missed the model", local.x, local.y);
        }
    }

    if response.dragged_by(egui::PointerButton::Primary) {
        let delta = response.drag_delta();
        engine.orbit(Vec2::new(delta.x, delta.y));
    }

    if response.dragged_by(egui::PointerButton::Secondary)
        || response.dragged_by(egui::PointerButton::Middle)
    {
        let delta = response.drag_delta();
        engine.pan(Vec2::new(delta.x, delta.y));
    }

    if response.hovered() {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta != 0.0 {
            engine.zoom(scroll_delta / SCROLL_STEP);
        }
    }
}

fn cursor_icon(hint: CursorHint, response: &egui::Response) -> egui::CursorIcon {
    match hint {
        CursorHint::Crosshair => egui::CursorIcon::Crosshair,
        CursorHint::Grab if response.dragged() => egui::CursorIcon::Grabbing,
        CursorHint::Grab => egui::CursorIcon::Grab,
    }
}
