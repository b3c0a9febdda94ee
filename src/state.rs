use crate::config::Config;
use crate::registry::QuestionRegistry;
use crate::store::ScoreStore;
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<QuestionRegistry>,
    pub store: Arc<ScoreStore>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<QuestionRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}

impl FromRef<AppState> for Arc<ScoreStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
