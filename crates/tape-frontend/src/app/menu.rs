//! Menu bar and measurement toolbar

use tape_core::{MeasureMode, ModelFormat};

use crate::actions::MAX_LIGHT_INTENSITY;
use crate::config::SharedConfig;
use crate::state::{AppAction, SharedAppState};

/// Actions handled by the app itself rather than the action queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ResetLayout,
}

/// Render the menu bar and toolbar, returning any app-level action
pub fn render_menu_bar(
    ctx: &egui::Context,
    app_state: &SharedAppState,
    config: &SharedConfig,
) -> Option<MenuAction> {
    let mut menu_action = None;

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Model...").clicked() {
                    open_model_dialog(app_state);
                    ui.close_menu();
                }
                if ui.button("Load Cube").clicked() {
                    app_state.lock().queue_action(AppAction::LoadPrimitiveCube);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Save Settings").clicked() {
                    app_state.lock().queue_action(AppAction::SaveConfig);
                    ui.close_menu();
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                }
            });
            ui.menu_button("View", |ui| {
                if ui.button("Reset Camera").clicked() {
                    app_state.lock().queue_action(AppAction::ResetCamera);
                    ui.close_menu();
                }
                if ui.button("Reset Layout").clicked() {
                    menu_action = Some(MenuAction::ResetLayout);
                    ui.close_menu();
                }
            });
        });
    });

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            render_toolbar(ui, app_state, config);
        });
    });

    menu_action
}

fn render_toolbar(ui: &mut egui::Ui, app_state: &SharedAppState, config: &SharedConfig) {
    let measuring = app_state.lock().engine.mode() == MeasureMode::Measuring;

    let label = if measuring {
        "Stop Measuring"
    } else {
        "Measure"
    };
    if ui.selectable_label(measuring, label).clicked() {
        app_state.lock().queue_action(AppAction::ToggleMeasureMode);
    }
    if ui.button("Clear").clicked() {
        app_state.lock().queue_action(AppAction::ClearMeasurements);
    }
    if ui.button("Reset Camera").clicked() {
        app_state.lock().queue_action(AppAction::ResetCamera);
    }
    if ui.button("Open...").clicked() {
        open_model_dialog(app_state);
    }

    ui.separator();

    let mut intensity = config.read().config().renderer.lighting.multiplier;
    let slider = egui::Slider::new(&mut intensity, 0.0..=MAX_LIGHT_INTENSITY)
        .text("Light")
        .fixed_decimals(2);
    if ui.add(slider).changed() {
        app_state
            .lock()
            .queue_action(AppAction::SetLightIntensity(intensity));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_model_dialog(app_state: &SharedAppState) {
    if let Some(path) = rfd::FileDialog::new()
        .add_filter("3D models", ModelFormat::EXTENSIONS)
        .pick_file()
    {
        app_state.lock().queue_action(AppAction::LoadModel(path));
    }
}

#[cfg(target_arch = "wasm32")]
fn open_model_dialog(app_state: &SharedAppState) {
    let app_state = app_state.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(file) = rfd::AsyncFileDialog::new()
            .add_filter("3D models", ModelFormat::EXTENSIONS)
            .pick_file()
            .await
        {
            let name = file.file_name();
            let data = file.read().await;
            app_state
                .lock()
                .queue_action(AppAction::LoadModelBytes { name, data });
        }
    });
}
