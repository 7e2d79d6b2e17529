//! Application state module

mod engine;
mod model_swap;
mod viewport;

pub use engine::ViewerEngine;
pub use model_swap::{LoadTicket, ModelLoader, ModelSource, PollOutcome};
pub use viewport::{SharedViewportState, ViewportState};

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use tape_core::{LengthUnit, SwapPolicy};

use crate::config::{AppConfig, ModelLibrary};

/// Actions that can be performed on the app state
#[derive(Debug, Clone)]
pub enum AppAction {
    // Measurement commands
    /// Switch between orbiting and placing points
    ToggleMeasureMode,
    /// Remove all measurements
    ClearMeasurements,
    /// Return the camera to the framed view
    ResetCamera,
    /// Change the display unit
    SetUnit(LengthUnit),
    /// Change what happens to measurements on model swap
    SetSwapPolicy(SwapPolicy),

    // Scene actions
    /// Scale all lights
    SetLightIntensity(f32),

    // Model actions
    /// Load a model file (native only)
    LoadModel(PathBuf),
    /// Load a model from bytes (web file picker, dropped files)
    LoadModelBytes { name: String, data: Vec<u8> },
    /// Load a model listed in the library
    LoadLibraryEntry(String),
    /// Load the built-in cube
    LoadPrimitiveCube,
    /// Read a JSON library manifest and merge it into the library
    ImportLibrary(PathBuf),

    // Config actions
    /// Persist the current configuration
    SaveConfig,
}

/// Application state
pub struct AppState {
    /// Measurement engine and its scene
    pub engine: ViewerEngine,
    /// Model loads in flight
    pub loader: ModelLoader,
    /// Models offered in the library panel
    pub library: ModelLibrary,
    /// Pending actions
    pending_actions: Vec<AppAction>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            engine: ViewerEngine::new(&config.renderer, config.measure.clone()),
            loader: ModelLoader::new(),
            library: config.library.clone(),
            pending_actions: Vec::new(),
        }
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: AppAction) {
        self.pending_actions.push(action);
    }

    /// Take all pending actions
    pub fn take_pending_actions(&mut self) -> Vec<AppAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Apply finished model loads to the engine
    pub fn poll_loads(&mut self) -> PollOutcome {
        self.loader.poll(&mut self.engine)
    }

    /// Start loading a model; supersedes any load in flight.
    ///
    /// The current model stops being a pick target until the load resolves.
    pub fn request_model(&mut self, source: ModelSource) -> LoadTicket {
        self.engine.begin_load();
        self.loader.request(source)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

/// Shared app state
pub type SharedAppState = Arc<Mutex<AppState>>;

/// Create shared app state
pub fn create_shared_state(config: &AppConfig) -> SharedAppState {
    Arc::new(Mutex::new(AppState::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_queue_drains_in_order() {
        let mut state = AppState::default();
        state.queue_action(AppAction::ToggleMeasureMode);
        state.queue_action(AppAction::ClearMeasurements);

        let actions = state.take_pending_actions();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], AppAction::ToggleMeasureMode));
        assert!(matches!(actions[1], AppAction::ClearMeasurements));
        assert!(state.take_pending_actions().is_empty());
    }

    #[test]
    fn test_pointer_ignored_until_requested_model_lands() {
        let mut state = AppState::default();
        state.engine.set_viewport(800.0, 600.0);
        state.engine.install_model(&tape_core::Model::cube(2.0));
        state.engine.toggle_measure_mode();

        state.request_model(ModelSource::Cube(4.0));
        assert!(state.engine.pointer_down(glam::Vec2::new(400.0, 300.0)).is_none());
        assert_eq!(state.engine.point_count(), 0);

        for _ in 0..500 {
            state.poll_loads();
            if !state.loader.is_loading() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(!state.engine.is_loading());
        assert!(state.engine.pointer_down(glam::Vec2::new(400.0, 300.0)).is_some());
    }

    #[test]
    fn test_engine_uses_configured_policy() {
        let mut config = AppConfig::default();
        config.measure.swap_policy = SwapPolicy::Clear;
        let state = AppState::new(&config);
        assert_eq!(state.engine.swap_policy(), SwapPolicy::Clear);
    }
}
