//! Main application module

mod dock;
mod menu;

use std::sync::Arc;

use egui_dock::{DockArea, DockState, Style};
use parking_lot::Mutex;

use crate::actions::{ActionContext, dispatch_action};
use crate::config::{SharedConfig, create_shared_config};
use crate::state::{
    AppAction, SharedAppState, SharedViewportState, ViewportState, create_shared_state,
};

pub use dock::{PanelType, TapeTabViewer, create_dock_layout};
pub use menu::{MenuAction, render_menu_bar};

/// Main application
pub struct TapeApp {
    dock_state: DockState<PanelType>,
    app_state: SharedAppState,
    viewport_state: Option<SharedViewportState>,
    config: SharedConfig,
}

impl TapeApp {
    /// Create a new app
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = create_shared_config();
        let app_config = config.read().config().clone();

        // Create viewport state if WGPU is available
        let viewport_state = cc.wgpu_render_state.as_ref().map(|render_state| {
            let device = render_state.device.clone();
            let queue = render_state.queue.clone();
            let format = render_state.target_format;

            Arc::new(Mutex::new(ViewportState::new(
                device,
                queue,
                format,
                &app_config.renderer,
            )))
        });
        if viewport_state.is_none() {
            tracing::warn!("WGPU render state unavailable, viewport disabled");
        }

        let app_state = create_shared_state(&app_config);
        app_state.lock().queue_action(AppAction::LoadPrimitiveCube);

        Self {
            dock_state: create_dock_layout(),
            app_state,
            viewport_state,
            config,
        }
    }

    /// Process pending actions
    fn process_actions(&mut self) {
        let actions = self.app_state.lock().take_pending_actions();
        let ctx = ActionContext::new(&self.app_state, &self.viewport_state, &self.config);

        for action in actions {
            dispatch_action(action, &ctx);
        }
    }

    /// Queue loads for files dropped onto the window
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut state = self.app_state.lock();
        for file in dropped {
            if let Some(bytes) = file.bytes {
                state.queue_action(AppAction::LoadModelBytes {
                    name: file.name,
                    data: bytes.to_vec(),
                });
            } else if let Some(path) = file.path {
                state.queue_action(AppAction::LoadModel(path));
            }
        }
    }
}

impl eframe::App for TapeApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.process_actions();

        {
            let mut state = self.app_state.lock();
            let outcome = state.poll_loads();
            if outcome.installed.is_some() || outcome.failed.is_some() {
                ctx.request_repaint();
            }
            if state.loader.is_loading() {
                ctx.request_repaint_after(std::time::Duration::from_millis(50));
            }
        }

        if let Some(menu_action) = render_menu_bar(ctx, &self.app_state, &self.config) {
            match menu_action {
                MenuAction::ResetLayout => {
                    self.dock_state = create_dock_layout();
                }
            }
        }

        // Dock area
        let render_state = frame.wgpu_render_state();

        DockArea::new(&mut self.dock_state)
            .style(Style::from_egui(ctx.style().as_ref()))
            .show(
                ctx,
                &mut TapeTabViewer {
                    app_state: &self.app_state,
                    render_state,
                    viewport_state: &self.viewport_state,
                },
            );
    }
}
