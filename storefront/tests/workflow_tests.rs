// tests/workflow_tests.rs
mod common;

use common::*;
use serial_test::serial;
use storefront::workflow::{ContextData, Pipeline, PipelineControl, PipelineResult, Workflows};

#[tokio::test]
#[serial]
async fn test_pipeline_runs_steps_in_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("step1", false), ("step2", false), ("step3", false)]);

  pipeline.on_step("step1", create_simple_handler("step1", " S1"));
  pipeline.on_step("step2", create_simple_handler("step2", " S2"));
  pipeline.on_step("step3", create_simple_handler("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_multiple_handlers_on_one_step_run_in_registration_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("only", false)]);
  pipeline.on_step("only", create_simple_handler("first", "a"));
  pipeline.on_step("only", create_simple_handler("second", "b"));

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().message, "ab");
}

#[tokio::test]
#[serial]
async fn test_pipeline_stops_on_pipeline_control_stop() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("stepA", false), ("stopStep", false), ("stepC", false)]);

  pipeline.on_step("stepA", create_simple_handler("stepA", "A"));
  pipeline.on_step("stopStep", |ctx: ContextData<TestContext>| async move {
    ctx.write().steps_executed.push("stopStep".to_string());
    Ok::<_, TestError>(PipelineControl::Stop)
  });
  pipeline.on_step("stepC", create_simple_handler("stepC", "C"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.counter, 1);
  assert_eq!(guard.steps_executed, vec!["stepA", "stopStep"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_propagates_handler_error() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("good_step", false), ("bad_step", false), ("another_step", false)]);

  pipeline.on_step("good_step", create_simple_handler("good_step", "Good"));
  pipeline.on_step("bad_step", create_failing_handler("bad_step", "I am a bad step!"));
  pipeline.on_step("another_step", create_simple_handler("another_step", "NeverRun"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap_err(), TestError::Handler("I am a bad step!".to_string()));
  let guard = ctx.read();
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.steps_executed, vec!["good_step", "bad_step"]);
}

#[tokio::test]
#[serial]
async fn test_missing_handler_for_required_step_fails() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("present", false), ("absent", false)]);
  pipeline.on_step("present", create_simple_handler("present", "P"));

  let ctx = ContextData::new(TestContext::default());
  let err = pipeline.run(ctx.clone()).await.unwrap_err();

  assert!(matches!(err, TestError::Workflow(ref m) if m.contains("absent")));
  assert_eq!(ctx.read().steps_executed, vec!["present"]);
}

#[tokio::test]
#[serial]
async fn test_optional_step_without_handler_is_skipped() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("first", false), ("maybe", true), ("last", false)]);
  pipeline.on_step("first", create_simple_handler("first", "1"));
  pipeline.on_step("last", create_simple_handler("last", "3"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().message, "13");
}

#[test]
#[should_panic(expected = "not found in pipeline definition")]
fn test_registering_handler_for_unknown_step_panics() {
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("real", false)]);
  pipeline.on_step("typo", create_simple_handler("typo", ""));
}

#[tokio::test]
#[serial]
async fn test_registry_dispatches_by_context_type() {
  setup_tracing();
  let workflows = Workflows::<TestError>::new();
  assert!(!workflows.is_registered::<TestContext>());

  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("only", false)]);
  pipeline.on_step("only", create_simple_handler("only", "ran"));
  workflows.register_pipeline(pipeline);
  assert!(workflows.is_registered::<TestContext>());

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(workflows.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().message, "ran");
}

#[tokio::test]
#[serial]
async fn test_registry_rejects_unregistered_context_type() {
  setup_tracing();
  let workflows = Workflows::<TestError>::new();

  let err = workflows.run(ContextData::new(TestContext::default())).await.unwrap_err();

  assert!(matches!(err, TestError::Workflow(ref m) if m.contains("No pipeline registered")));
}

#[tokio::test]
#[serial]
async fn test_stop_signal_from_shared_context() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("a", false), ("b", false), ("c", false)]);
  pipeline.on_step("a", create_simple_handler("a", "A"));
  pipeline.on_step("b", create_simple_handler("b", "B"));
  pipeline.on_step("c", create_simple_handler("c", "C"));

  let ctx = ContextData::new(TestContext {
    should_stop_at: Some("b".to_string()),
    ..TestContext::default()
  });
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().message, "AB");
}
