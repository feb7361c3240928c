// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset of these helpers.

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

use storefront::config::AppConfig;
use storefront::models::{Category, Product, Size, User};
use storefront::services::auth_service;
use storefront::state::AppState;
use storefront::store::{MemoryStore, Store};
use storefront::workflow::{ContextData, Handler, PipelineControl, WorkflowError};

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Application fixtures ---

pub struct TestApp {
  pub state: AppState,
  /// Concrete handle on the same store, for seeding and inspection.
  pub store: Arc<MemoryStore>,
}

pub fn test_app() -> TestApp {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let dyn_store: Arc<dyn Store> = store.clone();
  let state = AppState::new(dyn_store, Arc::new(AppConfig::default()));
  TestApp { state, store }
}

/// A product created `age_secs` seconds ago.
pub fn product_aged(name: &str, price: Decimal, stock: i32, sizes: &[Size], category: Category, age_secs: i64) -> Product {
  let created_at = Utc::now() - Duration::seconds(age_secs);
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: format!("{} description", name),
    price,
    image_url: format!("https://img.example/{}.png", name.to_lowercase().replace(' ', "-")),
    category,
    sizes: sizes.to_vec(),
    stock,
    created_at,
    updated_at: created_at,
  }
}

pub fn product(name: &str, price: Decimal, stock: i32, sizes: &[Size]) -> Product {
  product_aged(name, price, stock, sizes, Category::Men, 0)
}

impl TestApp {
  pub fn add_product(&self, product: Product) -> Product {
    self.store.put_product(product.clone());
    product
  }

  pub async fn stock_of(&self, product_id: Uuid) -> i32 {
    self
      .state
      .store
      .find_product(product_id)
      .await
      .unwrap()
      .expect("product exists")
      .stock
  }

  pub async fn register_user(&self, email: &str) -> User {
    auth_service::signup(&self.state, email, "password123").await.unwrap()
  }
}

pub fn dec(units: i64, scale: u32) -> Decimal {
  Decimal::new(units, scale)
}

// --- Workflow engine fixtures ---

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Workflow error: {0}")]
  Workflow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<WorkflowError> for TestError {
  fn from(err: WorkflowError) -> Self {
    TestError::Workflow(err.to_string())
  }
}

pub fn create_simple_handler(step_name: &'static str, message_to_append: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(step_name: &'static str, error_message: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}
