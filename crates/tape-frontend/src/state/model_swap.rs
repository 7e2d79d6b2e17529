//! Model loading with last-requested-wins semantics
//!
//! Every [`ModelLoader::request`] supersedes the ones before it. Results are
//! queued as they complete and applied by [`ModelLoader::poll`]; anything
//! that is not the newest request is discarded there.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use tape_core::{Model, ModelError, load_model, load_model_from_bytes};

use super::engine::ViewerEngine;

/// Where a model comes from
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// A file on disk (native only)
    Path(PathBuf),
    /// File contents picked in the browser or dropped onto the window
    Bytes { name: String, data: Vec<u8> },
    /// A cube of the given edge length
    Cube(f32),
}

impl ModelSource {
    /// Short description for logs and the status bar
    pub fn describe(&self) -> String {
        match self {
            ModelSource::Path(path) => path.display().to_string(),
            ModelSource::Bytes { name, .. } => name.clone(),
            ModelSource::Cube(size) => format!("cube ({size})"),
        }
    }

    fn load(self) -> Result<Model, ModelError> {
        match self {
            ModelSource::Path(path) => load_model(path),
            ModelSource::Bytes { name, data } => load_model_from_bytes(&name, &data),
            ModelSource::Cube(size) => Ok(Model::cube(size)),
        }
    }
}

/// Identifies one load request; later requests compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

struct LoadResult {
    ticket: LoadTicket,
    source: String,
    result: Result<Model, ModelError>,
}

/// What a [`ModelLoader::poll`] call did
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollOutcome {
    /// Name of the model that was installed, if any
    pub installed: Option<String>,
    /// Results dropped because a newer request exists
    pub stale: usize,
    /// Error of the latest request, if it failed
    pub failed: Option<String>,
}

/// Coordinates asynchronous model loads for one [`ViewerEngine`]
pub struct ModelLoader {
    next_ticket: u64,
    latest: Option<LoadTicket>,
    /// Set until the latest request's result has been polled
    waiting: bool,
    completed: Arc<Mutex<Vec<LoadResult>>>,
    last_error: Option<String>,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self {
            next_ticket: 0,
            latest: None,
            waiting: false,
            completed: Arc::new(Mutex::new(Vec::new())),
            last_error: None,
        }
    }

    /// Start loading `source`, superseding every earlier request.
    ///
    /// Callers mark the engine with [`ViewerEngine::begin_load`] so the
    /// superseded model is not picked in the meantime.
    pub fn request(&mut self, source: ModelSource) -> LoadTicket {
        let ticket = self.issue_ticket();
        let description = source.describe();
        tracing::info!("Loading model {} (request {})", description, ticket.0);
        self.spawn(ticket, description, source);
        ticket
    }

    fn issue_ticket(&mut self) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.latest = Some(ticket);
        self.waiting = true;
        ticket
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn(&self, ticket: LoadTicket, description: String, source: ModelSource) {
        let completed = Arc::clone(&self.completed);
        std::thread::spawn(move || {
            let result = source.load();
            completed.lock().push(LoadResult {
                ticket,
                source: description,
                result,
            });
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn(&self, ticket: LoadTicket, description: String, source: ModelSource) {
        let result = source.load();
        self.completed.lock().push(LoadResult {
            ticket,
            source: description,
            result,
        });
    }

    /// Apply finished loads to `engine`.
    ///
    /// Only the latest request's result is used. A failure is logged and
    /// leaves the current model and measurements untouched.
    pub fn poll(&mut self, engine: &mut ViewerEngine) -> PollOutcome {
        let results = std::mem::take(&mut *self.completed.lock());
        let mut outcome = PollOutcome::default();

        for LoadResult {
            ticket,
            source,
            result,
        } in results
        {
            if Some(ticket) != self.latest {
                tracing::debug!(
                    "Discarding stale load of {} (request {})",
                    source,
                    ticket.0
                );
                outcome.stale += 1;
                continue;
            }

            self.waiting = false;
            engine.finish_load();
            match result {
                Ok(model) => {
                    engine.install_model(&model);
                    self.last_error = None;
                    outcome.installed = Some(model.name);
                }
                Err(e) => {
                    tracing::error!("Failed to load model {}: {}", source, e);
                    let message = format!("{source}: {e}");
                    self.last_error = Some(message.clone());
                    outcome.failed = Some(message);
                }
            }
        }

        outcome
    }

    /// Whether the latest request has not completed yet
    pub fn is_loading(&self) -> bool {
        self.waiting
    }

    pub fn latest(&self) -> Option<LoadTicket> {
        self.latest
    }

    /// Error of the most recent failed load, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tape_renderer::RenderLayer;

    use super::*;

    const TRIANGLE_OBJ: &str = "o tri
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

    fn deliver(loader: &ModelLoader, ticket: LoadTicket, result: Result<Model, ModelError>) {
        loader.completed.lock().push(LoadResult {
            ticket,
            source: "test".to_string(),
            result,
        });
    }

    fn poll_until_idle(loader: &mut ModelLoader, engine: &mut ViewerEngine) -> PollOutcome {
        for _ in 0..500 {
            let outcome = loader.poll(engine);
            if !loader.is_loading() {
                return outcome;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("load did not finish");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut loader = ModelLoader::new();
        let mut engine = ViewerEngine::default();

        let first = loader.issue_ticket();
        let second = loader.issue_ticket();
        assert!(second > first);

        // The newer request finishes first, then the older one arrives
        deliver(&loader, second, Ok(Model::cube(2.0)));
        let outcome = loader.poll(&mut engine);
        assert_eq!(outcome.installed.as_deref(), Some("Cube"));
        let installed = engine.model();

        deliver(&loader, first, Ok(Model::cube(8.0)));
        let outcome = loader.poll(&mut engine);
        assert_eq!(outcome.stale, 1);
        assert!(outcome.installed.is_none());
        assert_eq!(engine.model(), installed);
        assert_eq!(engine.scene().layer_count(RenderLayer::Model), 1);
    }

    #[test]
    fn test_only_latest_of_a_batch_is_installed() {
        let mut loader = ModelLoader::new();
        let mut engine = ViewerEngine::default();
        let tickets: Vec<_> = (0..3).map(|_| loader.issue_ticket()).collect();

        for (i, ticket) in tickets.iter().enumerate() {
            deliver(&loader, *ticket, Ok(Model::cube(1.0 + i as f32)));
        }
        let outcome = loader.poll(&mut engine);

        assert_eq!(outcome.stale, 2);
        assert!(outcome.installed.is_some());
        assert!(!loader.is_loading());
        let bounds = engine
            .scene()
            .subtree_bounds(engine.model().unwrap())
            .unwrap();
        assert_eq!(bounds.max.x, 1.5);
    }

    #[test]
    fn test_stale_result_keeps_engine_loading() {
        let mut loader = ModelLoader::new();
        let mut engine = ViewerEngine::default();

        let first = loader.issue_ticket();
        engine.begin_load();
        let second = loader.issue_ticket();

        deliver(&loader, first, Ok(Model::cube(2.0)));
        loader.poll(&mut engine);
        assert!(engine.is_loading());
        assert!(engine.model().is_none());

        deliver(&loader, second, Err(ModelError::Parse("truncated".to_string())));
        loader.poll(&mut engine);
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_failure_keeps_current_model() {
        let mut loader = ModelLoader::new();
        let mut engine = ViewerEngine::default();

        let ticket = loader.issue_ticket();
        deliver(&loader, ticket, Ok(Model::cube(2.0)));
        loader.poll(&mut engine);
        let model = engine.model();

        let ticket = loader.issue_ticket();
        deliver(&loader, ticket, Err(ModelError::Parse("bad facet".to_string())));
        let outcome = loader.poll(&mut engine);

        assert!(outcome.failed.is_some());
        assert!(loader.last_error().unwrap().contains("bad facet"));
        assert_eq!(engine.model(), model);
        assert!(engine.scene().contains(model.unwrap()));
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_request_loads_bytes_in_background() {
        let mut loader = ModelLoader::new();
        let mut engine = ViewerEngine::default();

        loader.request(ModelSource::Bytes {
            name: "tri.obj".to_string(),
            data: TRIANGLE_OBJ.as_bytes().to_vec(),
        });
        assert!(loader.is_loading());

        let outcome = poll_until_idle(&mut loader, &mut engine);
        assert_eq!(outcome.installed.as_deref(), Some("tri"));
        assert_eq!(engine.model_name(), Some("tri"));
    }

    #[test]
    fn test_request_unsupported_format_fails() {
        let mut loader = ModelLoader::new();
        let mut engine = ViewerEngine::default();

        loader.request(ModelSource::Bytes {
            name: "chair.glb".to_string(),
            data: Vec::new(),
        });
        let outcome = poll_until_idle(&mut loader, &mut engine);

        assert!(outcome.failed.is_some());
        assert!(engine.model().is_none());
    }
}
