// storefront/src/services/catalog_service.rs

//! Filtered, paginated product search and lookup by id.

use crate::errors::AppError;
use crate::models::{Category, Product, Size};
use crate::state::AppState;
use crate::store::ProductFilter;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, instrument};
use uuid::Uuid;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw query string parameters; everything is validated by `parse`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
  pub search: Option<String>,
  pub category: Option<String>,
  pub size: Option<String>,
  pub min_price: Option<String>,
  pub max_price: Option<String>,
  pub page: Option<String>,
  pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
  pub filter: ProductFilter,
  pub page: i64,
  pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct CatalogPage {
  pub products: Vec<Product>,
  pub total: i64,
  pub page: i64,
  pub pages: i64,
}

/// Blank values count as absent.
fn present(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_positive(value: &Option<String>, name: &str, default: i64) -> Result<i64, AppError> {
  match present(value) {
    None => Ok(default),
    Some(raw) => raw
      .parse::<i64>()
      .ok()
      .filter(|n| *n >= 1)
      .ok_or_else(|| AppError::Validation(format!("{} must be a positive integer", name))),
  }
}

fn parse_price(value: &Option<String>, name: &str) -> Result<Option<Decimal>, AppError> {
  present(value)
    .map(|raw| Decimal::from_str(raw).map_err(|_| AppError::Validation(format!("{} must be a number", name))))
    .transpose()
}

impl ProductQuery {
  pub fn parse(&self) -> Result<SearchParams, AppError> {
    let category = match present(&self.category) {
      None | Some("All") => None,
      Some(raw) => Some(
        raw
          .parse::<Category>()
          .map_err(|e| AppError::Validation(e.to_string()))?,
      ),
    };
    let size = present(&self.size)
      .map(|raw| raw.parse::<Size>().map_err(|e| AppError::Validation(e.to_string())))
      .transpose()?;

    Ok(SearchParams {
      filter: ProductFilter {
        search: present(&self.search).map(str::to_string),
        category,
        size,
        min_price: parse_price(&self.min_price, "minPrice")?,
        max_price: parse_price(&self.max_price, "maxPrice")?,
      },
      page: parse_positive(&self.page, "page", DEFAULT_PAGE)?,
      limit: parse_positive(&self.limit, "limit", DEFAULT_LIMIT)?,
    })
  }
}

/// `ceil(total / limit)`; zero when nothing matches.
pub fn page_count(total: i64, limit: i64) -> i64 {
  if total <= 0 {
    0
  } else {
    total / limit + i64::from(total % limit != 0)
  }
}

#[instrument(name = "catalog_service::search", skip(state))]
pub async fn search(state: &AppState, params: &SearchParams) -> Result<CatalogPage, AppError> {
  let offset = (params.page - 1)
    .checked_mul(params.limit)
    .ok_or_else(|| AppError::Validation("page is out of range".to_string()))?;

  let (products, total) = state
    .store
    .search_products(&params.filter, offset, params.limit)
    .await?;
  debug!(returned = products.len(), total, "Catalog search finished.");

  Ok(CatalogPage {
    products,
    total,
    page: params.page,
    pages: page_count(total, params.limit),
  })
}

#[instrument(name = "catalog_service::get_product", skip(state))]
pub async fn get_product(state: &AppState, product_id: &str) -> Result<Product, AppError> {
  let not_found = || AppError::NotFound("Product not found".to_string());
  let id = Uuid::parse_str(product_id).map_err(|_| not_found())?;
  state.store.find_product(id).await?.ok_or_else(not_found)
}
