//! Measurement list panel

use tape_core::{LengthUnit, SwapPolicy};

use crate::panels::Panel;
use crate::state::{AppAction, SharedAppState};

/// Lists measured segments and the pending point
pub struct MeasurementsPanel;

impl MeasurementsPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MeasurementsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for MeasurementsPanel {
    fn name(&self) -> &str {
        "Measurements"
    }

    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState) {
        let mut actions = Vec::new();
        {
            let state = app_state.lock();
            let engine = &state.engine;
            let store = engine.store();

            ui.horizontal(|ui| {
                ui.label("Unit:");
                let current = store.config().unit;
                egui::ComboBox::from_id_salt("measure_unit")
                    .selected_text(current.name())
                    .show_ui(ui, |ui| {
                        for unit in LengthUnit::ALL {
                            if ui.selectable_label(current == *unit, unit.name()).clicked()
                                && current != *unit
                            {
                                actions.push(AppAction::SetUnit(*unit));
                            }
                        }
                    });
            });

            ui.horizontal(|ui| {
                ui.label("On model change:");
                let current = engine.swap_policy();
                egui::ComboBox::from_id_salt("swap_policy")
                    .selected_text(current.name())
                    .show_ui(ui, |ui| {
                        for policy in [SwapPolicy::Preserve, SwapPolicy::Clear] {
                            if ui.selectable_label(current == policy, policy.name()).clicked()
                                && current != policy
                            {
                                actions.push(AppAction::SetSwapPolicy(policy));
                            }
                        }
                    });
            });

            ui.separator();

            if store.is_empty() {
                ui.weak("No measurements. Enable measuring and click two points on the model.");
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (i, segment) in store.segments().iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(format!("#{}", i + 1));
                        ui.strong(&segment.text);
                    });
                }
                if let Some(pending) = store.pending() {
                    let p = pending.point.position();
                    ui.weak(format!(
                        "Waiting for second point (first at {:.3}, {:.3}, {:.3})",
                        p.x, p.y, p.z
                    ));
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} points, {} segments",
                    engine.point_count(),
                    engine.segment_count()
                ));
                if ui
                    .add_enabled(!store.is_empty(), egui::Button::new("Clear"))
                    .clicked()
                {
                    actions.push(AppAction::ClearMeasurements);
                }
            });
        }

        let mut state = app_state.lock();
        for action in actions {
            state.queue_action(action);
        }
    }
}
