//! Tape frontend
//!
//! egui application for measuring point-to-point distances on 3D models.

pub mod actions;
pub mod app;
pub mod config;
pub mod panels;
pub mod state;

// Re-exports for convenience
pub use app::TapeApp;
pub use config::{AppConfig, ConfigManager, SharedConfig};
pub use state::{AppAction, AppState, SharedAppState, ViewerEngine};
