//! Dock layout and tab viewer

use egui_dock::{DockState, NodeIndex, TabViewer};

use crate::panels::{LibraryPanel, MeasurementsPanel, Panel, ViewportPanel};
use crate::state::{SharedAppState, SharedViewportState};

/// Panel types for the dock system
pub enum PanelType {
    Viewport(ViewportPanel),
    Library(LibraryPanel),
    Measurements(MeasurementsPanel),
}

impl PanelType {
    pub fn name(&self) -> &str {
        match self {
            PanelType::Viewport(p) => p.name(),
            PanelType::Library(p) => p.name(),
            PanelType::Measurements(p) => p.name(),
        }
    }
}

/// Tab viewer for dock area
pub struct TapeTabViewer<'a> {
    pub app_state: &'a SharedAppState,
    pub render_state: Option<&'a egui_wgpu::RenderState>,
    pub viewport_state: &'a Option<SharedViewportState>,
}

impl TabViewer for TapeTabViewer<'_> {
    type Tab = PanelType;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        tab.name().into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        match tab {
            PanelType::Viewport(panel) => {
                if let (Some(render_state), Some(viewport_state)) =
                    (self.render_state, self.viewport_state)
                {
                    panel.ui_with_render_context(ui, self.app_state, render_state, viewport_state);
                } else {
                    panel.ui(ui, self.app_state);
                }
            }
            PanelType::Library(panel) => panel.ui(ui, self.app_state),
            PanelType::Measurements(panel) => panel.ui(ui, self.app_state),
        }
    }
}

/// Create the default dock layout
pub fn create_dock_layout() -> DockState<PanelType> {
    let mut dock_state = DockState::new(vec![PanelType::Viewport(ViewportPanel::new())]);

    let surface = dock_state.main_surface_mut();

    // Measurements on the right
    let [_viewport, _right] = surface.split_right(
        NodeIndex::root(),
        0.78,
        vec![PanelType::Measurements(MeasurementsPanel::new())],
    );

    // Library on the left
    let [_left, _viewport] = surface.split_left(
        NodeIndex::root(),
        0.18,
        vec![PanelType::Library(LibraryPanel::new())],
    );

    dock_state
}
