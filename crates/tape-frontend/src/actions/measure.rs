//! Measurement command handlers

use tape_core::{LengthUnit, SwapPolicy};

use crate::state::AppAction;

use super::ActionContext;

/// Handle measurement commands
pub fn handle_measure_action(action: AppAction, ctx: &ActionContext) {
    match action {
        AppAction::ToggleMeasureMode => {
            ctx.app_state.lock().engine.toggle_measure_mode();
        }
        AppAction::ClearMeasurements => {
            ctx.app_state.lock().engine.clear_measurements();
        }
        AppAction::ResetCamera => {
            if !ctx.app_state.lock().engine.reset_camera() {
                tracing::debug!("No saved camera view to reset to");
            }
        }
        AppAction::SetUnit(unit) => handle_set_unit(unit, ctx),
        AppAction::SetSwapPolicy(policy) => handle_set_swap_policy(policy, ctx),
        _ => {}
    }
}

fn handle_set_unit(unit: LengthUnit, ctx: &ActionContext) {
    ctx.app_state.lock().engine.set_unit(unit);
    ctx.config.write().config_mut().measure.unit = unit;
    tracing::info!("Display unit set to {}", unit.name());
}

fn handle_set_swap_policy(policy: SwapPolicy, ctx: &ActionContext) {
    ctx.app_state.lock().engine.set_swap_policy(policy);
    ctx.config.write().config_mut().measure.swap_policy = policy;
    tracing::info!("Model swap policy: {}", policy.name());
}
