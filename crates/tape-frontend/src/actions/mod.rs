//! Action handling module
//!
//! Actions are queued in AppState by the UI and processed once per frame.

mod measure;
mod model;
mod settings;

use crate::config::SharedConfig;
use crate::state::{AppAction, SharedAppState, SharedViewportState};

pub use measure::handle_measure_action;
pub use model::handle_model_action;
pub use settings::{MAX_LIGHT_INTENSITY, handle_settings_action};

/// Context for action handlers
pub struct ActionContext<'a> {
    pub app_state: &'a SharedAppState,
    pub viewport_state: &'a Option<SharedViewportState>,
    pub config: &'a SharedConfig,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        app_state: &'a SharedAppState,
        viewport_state: &'a Option<SharedViewportState>,
        config: &'a SharedConfig,
    ) -> Self {
        Self {
            app_state,
            viewport_state,
            config,
        }
    }
}

/// Dispatch an action to the appropriate handler
pub fn dispatch_action(action: AppAction, ctx: &ActionContext) {
    match action {
        AppAction::ToggleMeasureMode
        | AppAction::ClearMeasurements
        | AppAction::ResetCamera
        | AppAction::SetUnit(_)
        | AppAction::SetSwapPolicy(_) => handle_measure_action(action, ctx),

        AppAction::LoadModel(_)
        | AppAction::LoadModelBytes { .. }
        | AppAction::LoadLibraryEntry(_)
        | AppAction::LoadPrimitiveCube
        | AppAction::ImportLibrary(_) => handle_model_action(action, ctx),

        AppAction::SetLightIntensity(_) | AppAction::SaveConfig => {
            handle_settings_action(action, ctx)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use parking_lot::RwLock;

    use crate::config::{AppConfig, ConfigManager, SharedConfig};
    use crate::state::{SharedAppState, create_shared_state};

    /// App state and in-memory config without a GPU viewport
    pub fn headless() -> (SharedAppState, SharedConfig) {
        let config = AppConfig::default();
        let app_state = create_shared_state(&config);
        let config = Arc::new(RwLock::new(ConfigManager::in_memory(config)));
        (app_state, config)
    }

    /// Poll the loader until the latest request has been applied
    pub fn wait_for_load(app_state: &SharedAppState) {
        for _ in 0..500 {
            let mut state = app_state.lock();
            state.poll_loads();
            if !state.loader.is_loading() {
                return;
            }
            drop(state);
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("load did not finish");
    }
}
