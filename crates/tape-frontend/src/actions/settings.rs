//! Lighting and configuration action handlers

use crate::state::AppAction;

use super::ActionContext;

/// Upper bound of the light intensity slider
pub const MAX_LIGHT_INTENSITY: f32 = 2.0;

/// Handle settings actions
pub fn handle_settings_action(action: AppAction, ctx: &ActionContext) {
    match action {
        AppAction::SetLightIntensity(value) => handle_set_light_intensity(value, ctx),
        AppAction::SaveConfig => {
            if let Err(e) = ctx.config.read().save() {
                tracing::error!("Failed to save config: {}", e);
            }
        }
        _ => {}
    }
}

fn handle_set_light_intensity(value: f32, ctx: &ActionContext) {
    let value = value.clamp(0.0, MAX_LIGHT_INTENSITY);
    ctx.config.write().config_mut().renderer.lighting.multiplier = value;
    if let Some(viewport_state) = ctx.viewport_state {
        viewport_state.lock().set_light_multiplier(value);
    }
}
