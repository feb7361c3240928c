// storefront/src/workflow/mod.rs

//! A small step-pipeline engine for multi-step business processes.
//!
//! A process is described as a `Pipeline<TData, Err>`: an ordered list of named
//! steps, each with async handlers operating on a shared `ContextData<TData>`.
//! Pipelines are registered in a `Workflows<Err>` registry keyed by `TData`, so
//! callers only need to build the initial context and hand it to `run`.

pub mod context_data;
pub mod control;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use error::WorkflowError;
pub use pipeline::{Handler, Pipeline, StepDef};
pub use registry::Workflows;
