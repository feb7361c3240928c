// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A label that does not belong to a fixed enumeration (category, size, status).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
  pub kind: &'static str,
  pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  Men,
  Women,
  Kids,
}

impl Category {
  pub const ALL: [Category; 3] = [Category::Men, Category::Women, Category::Kids];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Men => "Men",
      Category::Women => "Women",
      Category::Kids => "Kids",
    }
  }
}

impl FromStr for Category {
  type Err = UnknownLabel;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::ALL
      .into_iter()
      .find(|c| c.as_str() == s)
      .ok_or_else(|| UnknownLabel {
        kind: "category",
        value: s.to_string(),
      })
  }
}

impl TryFrom<String> for Category {
  type Error = UnknownLabel;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
  S,
  M,
  L,
  XL,
}

impl Size {
  pub const ALL: [Size; 4] = [Size::S, Size::M, Size::L, Size::XL];

  pub fn as_str(&self) -> &'static str {
    match self {
      Size::S => "S",
      Size::M => "M",
      Size::L => "L",
      Size::XL => "XL",
    }
  }
}

impl FromStr for Size {
  type Err = UnknownLabel;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Size::ALL
      .into_iter()
      .find(|size| size.as_str() == s)
      .ok_or_else(|| UnknownLabel {
        kind: "size",
        value: s.to_string(),
      })
  }
}

impl fmt::Display for Size {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub image_url: String,
  #[sqlx(try_from = "String")]
  pub category: Category,
  #[sqlx(json)]
  pub sizes: Vec<Size>,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  pub fn offers_size(&self, size: Size) -> bool {
    self.sizes.contains(&size)
  }
}
