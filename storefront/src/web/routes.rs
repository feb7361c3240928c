// storefront/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, cart_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed JSON bodies and query strings become 400s in the usual envelope.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()));
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  extractor_configs(cfg);
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler)),
      )
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/item/{item_id}", web::put().to(cart_handlers::update_cart_item_handler))
          .route("/item/{item_id}", web::delete().to(cart_handlers::remove_cart_item_handler))
          .route("/clear", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/merge", web::post().to(cart_handlers::merge_carts_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/checkout", web::post().to(order_handlers::checkout_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      ),
  );
}
