// tests/api_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use common::*;
use storefront::models::Size;
use storefront::web::configure_app_routes;

macro_rules! init_app {
  ($app:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($app.state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

/// Registers `$email` and signs in, yielding the bearer token.
macro_rules! signup_and_signin {
  ($service:expr, $email:expr) => {{
    let credentials = json!({ "email": $email, "password": "password123" });
    let req = test::TestRequest::post()
      .uri("/api/auth/signup")
      .set_json(&credentials)
      .to_request();
    let resp = test::call_service($service, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
      .uri("/api/auth/signin")
      .set_json(&credentials)
      .to_request();
    let body: Value = test::call_and_read_body_json($service, req).await;
    body["token"].as_str().expect("token in signin response").to_string()
  }};
}

#[actix_web::test]
async fn health_check() {
  let app = test_app();
  let service = init_app!(app);

  let req = test::TestRequest::get().uri("/api/health").to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;

  assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn guest_gets_a_session_id_and_keeps_it() {
  let app = test_app();
  let tee = app.add_product(product("Tee", dec(2000, 2), 5, &[Size::S]));
  let service = init_app!(app);

  let req = test::TestRequest::get().uri("/api/cart").to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["success"], true);
  let session_id = body["sessionId"].as_str().expect("issued session id").to_string();
  assert_eq!(session_id.len(), 64);

  let req = test::TestRequest::post()
    .uri("/api/cart/add")
    .insert_header(("x-session-id", session_id.as_str()))
    .set_json(json!({ "productId": tee.id, "size": "S", "quantity": 2 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;

  assert_eq!(body["message"], "Item added to cart");
  assert_eq!(body["sessionId"], session_id.as_str());
  assert_eq!(body["data"]["items"][0]["quantity"], 2);
  assert_eq!(body["data"]["items"][0]["product"]["name"], "Tee");
  assert_eq!(body["data"]["items"][0]["product"]["price"], 20.0);
}

#[actix_web::test]
async fn add_validates_payload() {
  let app = test_app();
  let service = init_app!(app);

  let req = test::TestRequest::post()
    .uri("/api/cart/add")
    .insert_header(("x-session-id", "guest"))
    .set_json(json!({ "size": "S" }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "success": false, "message": "Product ID and size are required" }));

  let req = test::TestRequest::post()
    .uri("/api/cart/add")
    .insert_header(("x-session-id", "guest"))
    .set_json(json!({ "productId": uuid::Uuid::new_v4(), "size": "S" }))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);

  let req = test::TestRequest::post()
    .uri("/api/cart/add")
    .insert_header(("content-type", "application/json"))
    .set_payload("{not json")
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn checkout_requires_authentication() {
  let app = test_app();
  let service = init_app!(app);

  let req = test::TestRequest::post().uri("/api/orders/checkout").to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::post()
    .uri("/api/orders/checkout")
    .insert_header(("Authorization", "Bearer not-a-real-token"))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn invalid_bearer_on_cart_routes_falls_back_to_guest() {
  let app = test_app();
  let service = init_app!(app);

  let req = test::TestRequest::get()
    .uri("/api/cart")
    .insert_header(("Authorization", "Bearer expired-or-bogus"))
    .insert_header(("x-session-id", "guest-xyz"))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;

  assert_eq!(body["sessionId"], "guest-xyz");
  assert_eq!(body["data"]["user"], Value::Null);
}

#[actix_web::test]
async fn guest_to_checkout_flow() {
  let app = test_app();
  let tee = app.add_product(product("Tee", dec(2000, 2), 5, &[Size::S, Size::M]));
  let service = init_app!(app);

  // Guest fills a cart.
  let req = test::TestRequest::post()
    .uri("/api/cart/add")
    .insert_header(("x-session-id", "guest-flow"))
    .set_json(json!({ "productId": tee.id, "size": "S", "quantity": 3 }))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

  // Signs in and merges.
  let token = signup_and_signin!(&service, "flow@example.com");
  let bearer = format!("Bearer {}", token);
  let req = test::TestRequest::post()
    .uri("/api/cart/merge")
    .insert_header(("Authorization", bearer.as_str()))
    .insert_header(("x-session-id", "guest-flow"))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["message"], "Carts merged successfully");
  assert_eq!(body["data"]["items"][0]["quantity"], 3);

  // Authenticated cart responses carry no session id.
  let req = test::TestRequest::post()
    .uri("/api/cart/add")
    .insert_header(("Authorization", bearer.as_str()))
    .set_json(json!({ "productId": tee.id, "size": "S", "quantity": 2 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["sessionId"], Value::Null);
  assert_eq!(body["data"]["items"][0]["quantity"], 5);

  let req = test::TestRequest::post()
    .uri("/api/orders/checkout")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Order created successfully");
  assert_eq!(body["data"]["totalPrice"], 100.0);
  assert_eq!(body["data"]["status"], "pending");
  let order_id = body["data"]["id"].as_str().unwrap().to_string();

  let req = test::TestRequest::get()
    .uri("/api/orders")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["data"][0]["id"], order_id.as_str());

  let req = test::TestRequest::get()
    .uri("/api/products")
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["data"][0]["stock"], 0);

  // Someone else cannot read the order.
  let other = signup_and_signin!(&service, "other@example.com");
  let req = test::TestRequest::get()
    .uri(&format!("/api/orders/{}", order_id))
    .insert_header(("Authorization", format!("Bearer {}", other)))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn signout_invalidates_the_token() {
  let app = test_app();
  let service = init_app!(app);
  let token = signup_and_signin!(&service, "leaving@example.com");
  let bearer = format!("Bearer {}", token);

  let req = test::TestRequest::post()
    .uri("/api/auth/signout")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

  let req = test::TestRequest::get()
    .uri("/api/orders")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn signup_and_signin_errors() {
  let app = test_app();
  let service = init_app!(app);
  signup_and_signin!(&service, "dupe@example.com");

  let req = test::TestRequest::post()
    .uri("/api/auth/signup")
    .set_json(json!({ "email": "DUPE@example.com", "password": "password123" }))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::post()
    .uri("/api/auth/signin")
    .set_json(json!({ "email": "dupe@example.com", "password": "wrong-password" }))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn product_routes() {
  let app = test_app();
  let tee = app.add_product(product("Tee", dec(2000, 2), 5, &[Size::S]));
  let service = init_app!(app);

  let req = test::TestRequest::get()
    .uri("/api/products?category=All&limit=5")
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["total"], 1);
  assert_eq!(body["page"], 1);
  assert_eq!(body["pages"], 1);

  let req = test::TestRequest::get()
    .uri("/api/products?limit=9223372036854775807")
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["pages"], 1);

  let req = test::TestRequest::get()
    .uri(&format!("/api/products/{}", tee.id))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["data"]["imageUrl"], tee.image_url.as_str());

  for uri in ["/api/products?page=0", "/api/products?category=Pets", "/api/products?minPrice=abc"] {
    let req = test::TestRequest::get().uri(uri).to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::BAD_REQUEST, "{}", uri);
  }

  let req = test::TestRequest::get().uri("/api/products/not-a-uuid").to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn cart_item_routes_report_missing_resources() {
  let app = test_app();
  let service = init_app!(app);

  let req = test::TestRequest::delete()
    .uri("/api/cart/clear")
    .insert_header(("x-session-id", "no-cart-yet"))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);

  let req = test::TestRequest::put()
    .uri("/api/cart/item/whatever")
    .insert_header(("x-session-id", "no-cart-yet"))
    .set_json(json!({ "quantity": 0 }))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::delete()
    .uri("/api/cart/item/whatever")
    .insert_header(("x-session-id", "no-cart-yet"))
    .to_request();
  assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);
}
