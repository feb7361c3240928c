// storefront/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::store::Store;
use crate::workflow::Workflows;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub workflows: Arc<Workflows<AppError>>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  /// Builds the shared state and registers every application pipeline.
  pub fn new(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
    let workflows = Arc::new(Workflows::<AppError>::new());
    pipelines::register_all_pipelines(&workflows);
    Self {
      store,
      workflows,
      config,
    }
  }
}
