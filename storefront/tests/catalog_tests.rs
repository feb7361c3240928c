// tests/catalog_tests.rs
mod common;

use common::*;
use storefront::errors::AppError;
use storefront::models::{Category, Size};
use storefront::seed;
use storefront::services::catalog_service::{self, ProductQuery};

fn q() -> ProductQuery {
  ProductQuery::default()
}

fn seed_sample(app: &TestApp) {
  // Oldest first; the listing is newest first.
  app.add_product(product_aged("Denim Jacket", dec(7999, 2), 10, &[Size::M, Size::L], Category::Men, 50));
  app.add_product(product_aged("Summer Dress", dec(6499, 2), 10, &[Size::S], Category::Women, 40));
  app.add_product(product_aged("Kids Jeans", dec(2999, 2), 10, &[Size::S, Size::M], Category::Kids, 30));
  app.add_product(product_aged("Leather Jacket", dec(19999, 2), 10, &[Size::XL], Category::Women, 20));
  app.add_product(product_aged("Graphic Tee", dec(1999, 2), 10, &[Size::S, Size::XL], Category::Kids, 10));
}

async fn names(app: &TestApp, query: ProductQuery) -> Vec<String> {
  let params = query.parse().unwrap();
  catalog_service::search(&app.state, &params)
    .await
    .unwrap()
    .products
    .into_iter()
    .map(|p| p.name)
    .collect()
}

#[tokio::test]
async fn unfiltered_search_is_newest_first() {
  let app = test_app();
  seed_sample(&app);

  assert_eq!(
    names(&app, q()).await,
    vec!["Graphic Tee", "Leather Jacket", "Kids Jeans", "Summer Dress", "Denim Jacket"]
  );
}

#[tokio::test]
async fn text_search_is_case_insensitive_over_name_and_description() {
  let app = test_app();
  seed_sample(&app);

  let query = ProductQuery {
    search: Some("JACKET".to_string()),
    ..q()
  };
  assert_eq!(names(&app, query).await, vec!["Leather Jacket", "Denim Jacket"]);

  let query = ProductQuery {
    search: Some("dress description".to_string()),
    ..q()
  };
  assert_eq!(names(&app, query).await, vec!["Summer Dress"]);
}

#[tokio::test]
async fn filters_combine() {
  let app = test_app();
  seed_sample(&app);

  let query = ProductQuery {
    category: Some("Women".to_string()),
    size: Some("XL".to_string()),
    ..q()
  };
  assert_eq!(names(&app, query).await, vec!["Leather Jacket"]);

  let query = ProductQuery {
    min_price: Some("29.99".to_string()),
    max_price: Some("79.99".to_string()),
    ..q()
  };
  assert_eq!(names(&app, query).await, vec!["Kids Jeans", "Summer Dress", "Denim Jacket"]);

  let query = ProductQuery {
    category: Some("All".to_string()),
    size: Some("S".to_string()),
    ..q()
  };
  assert_eq!(names(&app, query).await, vec!["Graphic Tee", "Kids Jeans", "Summer Dress"]);
}

#[tokio::test]
async fn pagination_slices_and_reports_totals() {
  let app = test_app();
  seed_sample(&app);

  let params = ProductQuery {
    page: Some("2".to_string()),
    limit: Some("2".to_string()),
    ..q()
  }
  .parse()
  .unwrap();
  let page = catalog_service::search(&app.state, &params).await.unwrap();

  assert_eq!(page.products.len(), 2);
  assert_eq!(page.products[0].name, "Kids Jeans");
  assert_eq!(page.total, 5);
  assert_eq!(page.page, 2);
  assert_eq!(page.pages, 3);

  let params = ProductQuery {
    page: Some("3".to_string()),
    limit: Some("2".to_string()),
    ..q()
  }
  .parse()
  .unwrap();
  assert_eq!(catalog_service::search(&app.state, &params).await.unwrap().products.len(), 1);
}

#[tokio::test]
async fn page_beyond_range_is_empty_with_same_totals() {
  let app = test_app();
  seed_sample(&app);

  let params = ProductQuery {
    page: Some("9".to_string()),
    limit: Some("2".to_string()),
    ..q()
  }
  .parse()
  .unwrap();
  let page = catalog_service::search(&app.state, &params).await.unwrap();

  assert!(page.products.is_empty());
  assert_eq!(page.total, 5);
  assert_eq!(page.pages, 3);
}

#[tokio::test]
async fn largest_limit_is_a_single_page() {
  let app = test_app();
  seed_sample(&app);

  let params = ProductQuery {
    limit: Some(i64::MAX.to_string()),
    ..q()
  }
  .parse()
  .unwrap();
  let page = catalog_service::search(&app.state, &params).await.unwrap();

  assert_eq!(page.products.len(), 5);
  assert_eq!(page.total, 5);
  assert_eq!(page.pages, 1);
}

#[tokio::test]
async fn get_product_by_id() {
  let app = test_app();
  let tee = app.add_product(product("Tee", dec(1000, 2), 1, &[Size::S]));

  let found = catalog_service::get_product(&app.state, &tee.id.to_string()).await.unwrap();
  assert_eq!(found.name, "Tee");

  for missing in [uuid::Uuid::new_v4().to_string(), "nope".to_string()] {
    let err = catalog_service::get_product(&app.state, &missing).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
  }
}

#[tokio::test]
async fn seeding_replaces_the_catalog() {
  let app = test_app();
  app.add_product(product("Leftover", dec(100, 2), 1, &[Size::S]));

  let seeded = seed::seed_catalog(app.state.store.as_ref()).await.unwrap();

  let params = ProductQuery {
    limit: Some("100".to_string()),
    ..q()
  }
  .parse()
  .unwrap();
  let page = catalog_service::search(&app.state, &params).await.unwrap();
  assert_eq!(page.total as usize, seeded);
  assert!(page.products.iter().all(|p| p.name != "Leftover"));
  for category in Category::ALL {
    assert!(page.products.iter().any(|p| p.category == category));
  }
}
