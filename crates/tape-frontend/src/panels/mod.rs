//! UI panels

mod library;
mod measurements;
mod viewport;

pub use library::LibraryPanel;
pub use measurements::MeasurementsPanel;
pub use viewport::ViewportPanel;

use crate::state::{SharedAppState, SharedViewportState};

/// Panel trait for dockable UI panels
pub trait Panel {
    /// Panel name for tab title
    fn name(&self) -> &str;

    /// Draw the panel UI
    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState);

    /// Draw with render context (for 3D viewport)
    fn ui_with_render_context(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        render_state: &egui_wgpu::RenderState,
        viewport_state: &SharedViewportState,
    ) {
        // Default: just call ui()
        let _ = (render_state, viewport_state);
        self.ui(ui, app_state);
    }

    /// Whether this panel needs render context
    fn needs_render_context(&self) -> bool {
        false
    }
}
