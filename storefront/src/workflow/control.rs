// storefront/src/workflow/control.rs

/// Signal from a handler: keep going or halt the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt immediately; no later handler or step runs.
  Stop,
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (or was an optional step without handlers).
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
