use std::sync::Arc;

use parley_answer::Answerer;
use parley_source::Fetcher;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// Everything here is read-only after startup; each question runs its own
/// fetch, so requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Arc<Fetcher>,
    pub answerer: Answerer,
}

impl AppState {
    pub fn new(config: Config, fetcher: Fetcher, answerer: Answerer) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            answerer,
        }
    }
}
