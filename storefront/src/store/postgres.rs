// storefront/src/store/postgres.rs

//! PostgreSQL store. Uses runtime queries only, so building the crate needs no
//! live database.

use super::{AccountStore, CartStore, CatalogStore, OrderStore, ProductFilter, Store, StoreError, StoreResult};
use crate::models::{Cart, CartItem, CartOwner, Order, Product, Session, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::{info, instrument, warn};
use uuid::Uuid;

const PRODUCT_COLUMNS: &str =
  "id, name, description, price, image_url, category, sizes, stock, created_at, updated_at";
const CART_COLUMNS: &str = "id, user_id, session_id, items, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, user_id, items, total_price, order_date, status, created_at, updated_at";

#[derive(Debug, FromRow)]
struct CartRow {
  id: Uuid,
  user_id: Option<Uuid>,
  session_id: Option<String>,
  items: Json<Vec<CartItem>>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<CartRow> for Cart {
  type Error = StoreError;

  fn try_from(row: CartRow) -> Result<Self, Self::Error> {
    let owner = CartOwner::from_columns(row.user_id, row.session_id)
      .ok_or_else(|| StoreError::Corrupt(format!("cart {} must have exactly one of user or session", row.id)))?;
    Ok(Cart {
      id: row.id,
      owner,
      items: row.items.0,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!("Successfully connected to the database.");
    Ok(Self { pool })
  }

  /// Applies the embedded schema migrations.
  pub async fn migrate(&self) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    qb.push(" WHERE TRUE");
    if let Some(search) = &filter.search {
      let pattern = format!("%{}%", escape_like(search));
      qb.push(" AND (name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR description ILIKE ")
        .push_bind(pattern)
        .push(")");
    }
    if let Some(category) = filter.category {
      qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(size) = filter.size {
      qb.push(" AND sizes @> ").push_bind(Json(vec![size]));
    }
    if let Some(min_price) = filter.min_price {
      qb.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
      qb.push(" AND price <= ").push_bind(max_price);
    }
  }

  async fn fetch_cart_row(&self, owner: &CartOwner) -> StoreResult<Option<CartRow>> {
    let row = match owner {
      CartOwner::User(user_id) => {
        let sql = format!("SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1");
        sqlx::query_as::<_, CartRow>(&sql)
          .bind(*user_id)
          .fetch_optional(&self.pool)
          .await?
      }
      CartOwner::Guest(token) => {
        let sql = format!("SELECT {CART_COLUMNS} FROM carts WHERE session_id = $1");
        sqlx::query_as::<_, CartRow>(&sql)
          .bind(token.as_str())
          .fetch_optional(&self.pool)
          .await?
      }
    };
    Ok(row)
  }
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
  let mut escaped = String::with_capacity(input.len());
  for ch in input.chars() {
    if matches!(ch, '\\' | '%' | '_') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped
}

#[async_trait]
impl CatalogStore for PgStore {
  #[instrument(name = "pg::search_products", skip(self), err(Display))]
  async fn search_products(&self, filter: &ProductFilter, offset: i64, limit: i64) -> StoreResult<(Vec<Product>, i64)> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
    Self::push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

    let mut page_qb = QueryBuilder::<Postgres>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
    Self::push_filters(&mut page_qb, filter);
    page_qb
      .push(" ORDER BY created_at DESC, id DESC LIMIT ")
      .push_bind(limit)
      .push(" OFFSET ")
      .push_bind(offset);
    let products = page_qb.build_query_as::<Product>().fetch_all(&self.pool).await?;

    Ok((products, total))
  }

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let products = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"))
      .bind(ids.to_vec())
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  #[instrument(name = "pg::replace_catalog", skip_all, fields(count = products.len()), err(Display))]
  async fn replace_catalog(&self, products: &[Product]) -> StoreResult<()> {
    let mut tx = self.pool.begin().await?;
    sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
    for product in products {
      sqlx::query(
        "INSERT INTO products (id, name, description, price, image_url, category, sizes, stock, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
      )
      .bind(product.id)
      .bind(&product.name)
      .bind(&product.description)
      .bind(product.price)
      .bind(&product.image_url)
      .bind(product.category.as_str())
      .bind(Json(&product.sizes))
      .bind(product.stock)
      .bind(product.created_at)
      .bind(product.updated_at)
      .execute(&mut *tx)
      .await?;
    }
    tx.commit().await?;
    Ok(())
  }
}

#[async_trait]
impl CartStore for PgStore {
  async fn find_cart(&self, owner: &CartOwner) -> StoreResult<Option<Cart>> {
    self.fetch_cart_row(owner).await?.map(Cart::try_from).transpose()
  }

  async fn find_or_create_cart(&self, owner: &CartOwner) -> StoreResult<Cart> {
    if let Some(row) = self.fetch_cart_row(owner).await? {
      return Cart::try_from(row);
    }

    // A concurrent request may create the same owner's cart first; the unique
    // owner columns make this insert a no-op in that case.
    let fresh = Cart::new(owner.clone());
    sqlx::query(
      "INSERT INTO carts (id, user_id, session_id, items, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING",
    )
    .bind(fresh.id)
    .bind(owner.user_id())
    .bind(owner.session_id())
    .bind(Json(&fresh.items))
    .bind(fresh.created_at)
    .bind(fresh.updated_at)
    .execute(&self.pool)
    .await?;

    match self.fetch_cart_row(owner).await? {
      Some(row) => Cart::try_from(row),
      None => Err(StoreError::Corrupt("cart vanished right after creation".to_string())),
    }
  }

  async fn save_cart(&self, cart: &Cart) -> StoreResult<()> {
    sqlx::query(
      "INSERT INTO carts (id, user_id, session_id, items, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6) \
       ON CONFLICT (id) DO UPDATE SET items = EXCLUDED.items, updated_at = EXCLUDED.updated_at",
    )
    .bind(cart.id)
    .bind(cart.owner.user_id())
    .bind(cart.owner.session_id())
    .bind(Json(&cart.items))
    .bind(cart.created_at)
    .bind(cart.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn delete_cart(&self, cart_id: Uuid) -> StoreResult<()> {
    sqlx::query("DELETE FROM carts WHERE id = $1")
      .bind(cart_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}

#[async_trait]
impl OrderStore for PgStore {
  #[instrument(name = "pg::commit_checkout", skip_all, fields(order_id = %order.id, %cart_id), err(Display))]
  async fn commit_checkout(&self, order: &Order, cart_id: Uuid) -> StoreResult<()> {
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      "INSERT INTO orders (id, user_id, items, total_price, order_date, status, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(Json(&order.items))
    .bind(order.total_price)
    .bind(order.order_date)
    .bind(order.status.as_str())
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *tx)
    .await?;

    for item in &order.items {
      let updated = sqlx::query(
        "UPDATE products SET stock = stock - $1, updated_at = NOW() WHERE id = $2 AND stock >= $1",
      )
      .bind(item.quantity)
      .bind(item.product_id)
      .execute(&mut *tx)
      .await?;

      if updated.rows_affected() == 0 {
        let available: Option<i32> = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
          .bind(item.product_id)
          .fetch_optional(&mut *tx)
          .await?;
        warn!(product_id = %item.product_id, "Stock changed during checkout; rolling back.");
        // Dropping `tx` without commit rolls back the order insert and earlier decrements.
        return Err(StoreError::InsufficientStock {
          product_name: item.product_name.clone(),
          size: item.size,
          available: available.unwrap_or(0),
          requested: item.quantity,
        });
      }
    }

    sqlx::query("UPDATE carts SET items = '[]'::jsonb, updated_at = NOW() WHERE id = $1")
      .bind(cart_id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    Ok(())
  }

  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(order)
  }

  async fn list_orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY order_date DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(orders)
  }
}

#[async_trait]
impl AccountStore for PgStore {
  async fn insert_user(&self, user: &User) -> StoreResult<()> {
    let result = sqlx::query(
      "INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(&self.pool)
    .await;

    match result {
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        Err(StoreError::DuplicateEmail(user.email.clone()))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  async fn insert_session(&self, session: &Session) -> StoreResult<()> {
    sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)")
      .bind(&session.token)
      .bind(session.user_id)
      .bind(session.created_at)
      .bind(session.expires_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn find_session(&self, token: &str) -> StoreResult<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
      "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(&self.pool)
    .await?;
    Ok(session)
  }

  async fn delete_session(&self, token: &str) -> StoreResult<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
      .bind(token)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}

#[async_trait]
impl Store for PgStore {
  async fn close(&self) {
    self.pool.close().await;
    info!("Database pool closed.");
  }
}
