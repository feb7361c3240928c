// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::catalog_service::{self, ProductQuery};
use crate::state::AppState;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ProductQuery>,
) -> Result<HttpResponse, AppError> {
  let params = query_params.parse()?;
  let page = catalog_service::search(&app_state, &params).await?;
  info!(count = page.products.len(), total = page.total, "Products listed.");

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "count": page.products.len(),
      "total": page.total,
      "page": page.page,
      "pages": page.pages,
      "data": page.products,
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product = catalog_service::get_product(&app_state, &path).await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": product,
  })))
}
