//! Model library panel

use crate::panels::Panel;
use crate::state::{AppAction, SharedAppState};

/// Models that can be opened with one click
pub struct LibraryPanel;

impl LibraryPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LibraryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for LibraryPanel {
    fn name(&self) -> &str {
        "Library"
    }

    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState) {
        let mut actions = Vec::new();
        {
            let state = app_state.lock();

            if let Some(name) = state.engine.model_name() {
                ui.label(format!("Viewing: {name}"));
            }
            if state.loader.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
            if let Some(error) = state.loader.last_error() {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error);
            }
            ui.separator();

            if ui.button("Cube").clicked() {
                actions.push(AppAction::LoadPrimitiveCube);
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for entry in state.library.entries() {
                    let response = ui
                        .button(&entry.name)
                        .on_hover_text(entry.path.display().to_string());
                    if response.clicked() {
                        actions.push(AppAction::LoadLibraryEntry(entry.id.clone()));
                    }
                }
            });

            #[cfg(not(target_arch = "wasm32"))]
            {
                ui.separator();
                if ui.button("Import library...").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("Library manifest", &["json"])
                        .pick_file()
                {
                    actions.push(AppAction::ImportLibrary(path));
                }
            }
        }

        let mut state = app_state.lock();
        for action in actions {
            state.queue_action(action);
        }
    }
}
