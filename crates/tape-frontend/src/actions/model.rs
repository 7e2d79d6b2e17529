//! Model loading action handlers

use std::path::PathBuf;

use crate::config::ModelLibrary;
use crate::state::{AppAction, ModelSource};

use super::ActionContext;

/// Edge length of the built-in demo cube (world units)
const DEMO_CUBE_SIZE: f32 = 1.0;

/// Handle model-related actions
pub fn handle_model_action(action: AppAction, ctx: &ActionContext) {
    match action {
        AppAction::LoadModel(path) => handle_load_model(path, ctx),
        AppAction::LoadModelBytes { name, data } => {
            ctx.app_state
                .lock()
                .request_model(ModelSource::Bytes { name, data });
        }
        AppAction::LoadLibraryEntry(id) => handle_load_library_entry(&id, ctx),
        AppAction::LoadPrimitiveCube => {
            ctx.app_state
                .lock()
                .request_model(ModelSource::Cube(DEMO_CUBE_SIZE));
        }
        AppAction::ImportLibrary(path) => handle_import_library(path, ctx),
        _ => {}
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn handle_load_model(path: PathBuf, ctx: &ActionContext) {
    ctx.app_state.lock().request_model(ModelSource::Path(path));
}

#[cfg(target_arch = "wasm32")]
fn handle_load_model(path: PathBuf, _ctx: &ActionContext) {
    tracing::warn!(
        "Loading from a path is not supported in WASM: {}",
        path.display()
    );
}

fn handle_load_library_entry(id: &str, ctx: &ActionContext) {
    let entry = ctx.app_state.lock().library.get(id).cloned();
    let Some(entry) = entry else {
        tracing::warn!("Unknown library entry: {}", id);
        return;
    };
    tracing::info!("Opening library entry '{}'", entry.name);
    handle_load_model(entry.path, ctx);
}

fn handle_import_library(path: PathBuf, ctx: &ActionContext) {
    match ModelLibrary::load(&path) {
        Ok(library) => {
            let (added, merged) = {
                let mut state = ctx.app_state.lock();
                let added = state.library.merge(library);
                (added, state.library.clone())
            };
            ctx.config.write().config_mut().library = merged;
            tracing::info!("Imported {} library entries from {}", added, path.display());
        }
        Err(e) => {
            tracing::error!("Failed to import library {}: {}", path.display(), e);
        }
    }
}
