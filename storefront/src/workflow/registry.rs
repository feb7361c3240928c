// storefront/src/workflow/registry.rs

//! `Workflows<E>`: pipelines keyed by their context data type.

use super::context_data::ContextData;
use super::control::PipelineResult;
use super::error::WorkflowError;
use super::pipeline::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait AnyPipelineRunner<E>: Send + Sync
where
  E: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` for the wrapped pipeline's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, E>;
}

struct PipelineRunner<TData, E>
where
  TData: 'static + Send + Sync,
  E: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, E>>,
}

#[async_trait]
impl<TData, E> AnyPipelineRunner<E> for PipelineRunner<TData, E>
where
  TData: 'static + Send + Sync,
  E: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, E> {
    let ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Context object type mismatch.");
        return Err(E::from(WorkflowError::TypeMismatch { expected_type }));
      }
    };
    self.pipeline.run(ctx_data).await
  }
}

/// Registry of every pipeline the application runs, one per context type.
pub struct Workflows<E>
where
  E: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn AnyPipelineRunner<E>>>>,
}

impl<E> Default for Workflows<E>
where
  E: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<E> Workflows<E>
where
  E: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for its context type, replacing any earlier one.
  pub fn register_pipeline<TData>(&self, pipeline: Pipeline<TData, E>)
  where
    TData: 'static + Send + Sync,
  {
    event!(Level::DEBUG, context_type = %std::any::type_name::<TData>(), "Registering pipeline.");
    let runner = PipelineRunner {
      pipeline: Arc::new(pipeline),
    };
    self.registry.write().insert(TypeId::of::<TData>(), Arc::new(runner));
  }

  pub fn is_registered<TData: 'static + Send + Sync>(&self) -> bool {
    self.registry.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData` against `ctx_data`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, E>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self
      .registry
      .read()
      .get(&TypeId::of::<TData>())
      .cloned()
      .ok_or_else(|| {
        let type_name = std::any::type_name::<TData>().to_string();
        event!(Level::ERROR, %type_name, "No pipeline registered.");
        E::from(WorkflowError::NotRegistered { type_name })
      })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}
