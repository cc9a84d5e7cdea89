use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::domain::catalog::{CatalogError, Product, ProductRepository};

#[derive(Debug, FromRow)]
struct ProductRow {
  id: String,
  name: String,
  price: Decimal,
  compare_at_price: Option<Decimal>,
  category: Option<String>,
  stock: i64,
  is_active: Option<bool>,
  is_hot: Option<bool>,
  sort_order: Option<i32>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      price: row.price,
      compare_at_price: row.compare_at_price,
      category: row.category,
      stock: row.stock,
      is_active: row.is_active,
      is_hot: row.is_hot,
      sort_order: row.sort_order,
    }
  }
}

pub struct PostgresProductRepository {
  pool: PgPool,
}

impl PostgresProductRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
  /// Stock counts cards that are neither used nor reserved
  async fn list_with_stock(&self) -> Result<Vec<Product>, CatalogError> {
    let rows = sqlx::query_as::<_, ProductRow>(
      r#"
      SELECT p.id, p.name, p.price, p.compare_at_price, p.category,
             p.is_active, p.is_hot, p.sort_order,
             COUNT(c.id) FILTER (
               WHERE c.is_used = FALSE AND c.reserved_order_id IS NULL
             ) AS stock
      FROM products p
      LEFT JOIN cards c ON c.product_id = p.id
      GROUP BY p.id
      ORDER BY COALESCE(p.sort_order, 0), p.created_at
      "#,
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to list products: {}", e);
      CatalogError::Repository(e.to_string())
    })?;

    Ok(rows.into_iter().map(Product::from).collect())
  }
}
