// storefront/src/pipelines/mod.rs

//! Multi-step business processes run through the workflow registry.

use crate::errors::AppError;
use crate::workflow::Workflows;

pub mod checkout_pipeline;
pub mod contexts;
pub mod merge_pipeline;

/// Registers every application pipeline. Called once when `AppState` is built.
pub fn register_all_pipelines(workflows: &Workflows<AppError>) {
  checkout_pipeline::register_checkout_pipeline(workflows);
  merge_pipeline::register_merge_pipeline(workflows);
  tracing::info!("All application pipelines registered.");
}
