// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use storefront::config::{AppConfig, LogFormat};
use storefront::seed;
use storefront::state::AppState;
use storefront::store::{MemoryStore, PgStore, Store};
use storefront::web::configure_app_routes;

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
  match &config.database_url {
    Some(url) => {
      let store = PgStore::connect(url, config.database_max_connections)
        .await
        .context("Failed to connect to the database")?;
      store.migrate().await.context("Failed to apply database migrations")?;
      tracing::info!("Connected to the database and applied migrations.");
      Ok(Arc::new(store))
    }
    None => {
      tracing::warn!("DATABASE_URL not set; using the in-memory store. Data is lost on exit.");
      Ok(Arc::new(MemoryStore::new()))
    }
  }
}

fn init_tracing(format: LogFormat) {
  let builder = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Config comes first so LOG_FORMAT can pick the subscriber.
  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  init_tracing(app_config.log_format);

  tracing::info!("Starting storefront server...");
  tracing::info!(
    server_host = %app_config.server_host,
    server_port = app_config.server_port,
    persistent = app_config.database_url.is_some(),
    seed_db = app_config.seed_db,
    log_format = ?app_config.log_format,
    "Application configuration loaded successfully."
  );
  let store = build_store(&app_config).await?;

  if app_config.seed_db {
    if let Err(e) = seed::seed_catalog(store.as_ref()).await {
      tracing::error!(error = %e, "Failed to seed the catalog.");
    }
  }

  let app_state = AppState::new(store.clone(), app_config.clone());

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  store.close().await;
  tracing::info!("Server stopped.");
  Ok(())
}
