// storefront/src/models/order.rs

use super::product::{Size, UnknownLabel};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl FromStr for OrderStatus {
  type Err = UnknownLabel;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(OrderStatus::Pending),
      "processing" => Ok(OrderStatus::Processing),
      "shipped" => Ok(OrderStatus::Shipped),
      "delivered" => Ok(OrderStatus::Delivered),
      "cancelled" => Ok(OrderStatus::Cancelled),
      other => Err(UnknownLabel {
        kind: "order status",
        value: other.to_string(),
      }),
    }
  }
}

impl TryFrom<String> for OrderStatus {
  type Error = UnknownLabel;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

/// Snapshot of one purchased line, copied from the product at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub product_image: String,
  pub size: Size,
  pub quantity: i32,
  /// Unit price at purchase time.
  pub price: Decimal,
}

impl OrderItem {
  pub fn line_total(&self) -> Decimal {
    self.price * Decimal::from(self.quantity)
  }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  #[sqlx(json)]
  pub items: Vec<OrderItem>,
  pub total_price: Decimal,
  pub order_date: DateTime<Utc>,
  #[sqlx(try_from = "String")]
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  /// A new pending order whose total is derived from `items` once, here.
  pub fn place(user_id: Uuid, items: Vec<OrderItem>) -> Self {
    let now = Utc::now();
    let total_price = items.iter().map(OrderItem::line_total).sum();
    Self {
      id: Uuid::new_v4(),
      user_id,
      items,
      total_price,
      order_date: now,
      status: OrderStatus::Pending,
      created_at: now,
      updated_at: now,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(price: Decimal, quantity: i32) -> OrderItem {
    OrderItem {
      id: Uuid::new_v4(),
      product_id: Uuid::new_v4(),
      product_name: "Tee".to_string(),
      product_image: "tee.png".to_string(),
      size: Size::M,
      quantity,
      price,
    }
  }

  #[test]
  fn placed_order_totals_lines_exactly() {
    let order = Order::place(
      Uuid::new_v4(),
      vec![line(Decimal::new(2499, 2), 3), line(Decimal::new(10, 1), 7)],
    );
    assert_eq!(order.total_price, Decimal::new(8197, 2));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.order_date, order.created_at);
  }

  #[test]
  fn status_labels_round_trip() {
    for status in [
      OrderStatus::Pending,
      OrderStatus::Processing,
      OrderStatus::Shipped,
      OrderStatus::Delivered,
      OrderStatus::Cancelled,
    ] {
      assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
    }
    assert!("lost".parse::<OrderStatus>().is_err());
  }
}
