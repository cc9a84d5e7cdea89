use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::domain::catalog::{CatalogError, DashboardStats, PeriodStats, StatsRepository};

#[derive(Debug, FromRow)]
struct StatsRow {
  today_orders: i64,
  today_revenue: Decimal,
  week_orders: i64,
  week_revenue: Decimal,
  month_orders: i64,
  month_revenue: Decimal,
  total_orders: i64,
  total_revenue: Decimal,
}

pub struct PostgresStatsRepository {
  pool: PgPool,
}

impl PostgresStatsRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
  now
    .date_naive()
    .and_hms_opt(0, 0, 0)
    .map(|t| t.and_utc())
    .unwrap_or(now)
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
  async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, CatalogError> {
    let row = sqlx::query_as::<_, StatsRow>(
      r#"
      SELECT
        COUNT(*) FILTER (WHERE created_at >= $1) AS today_orders,
        COALESCE(SUM(amount) FILTER (WHERE created_at >= $1), 0) AS today_revenue,
        COUNT(*) FILTER (WHERE created_at >= $2) AS week_orders,
        COALESCE(SUM(amount) FILTER (WHERE created_at >= $2), 0) AS week_revenue,
        COUNT(*) FILTER (WHERE created_at >= $3) AS month_orders,
        COALESCE(SUM(amount) FILTER (WHERE created_at >= $3), 0) AS month_revenue,
        COUNT(*) AS total_orders,
        COALESCE(SUM(amount), 0) AS total_revenue
      FROM orders
      WHERE status IN ('paid', 'delivered')
      "#,
    )
    .bind(start_of_day(now))
    .bind(now - Duration::days(7))
    .bind(now - Duration::days(30))
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to compute dashboard stats: {}", e);
      CatalogError::Repository(e.to_string())
    })?;

    Ok(DashboardStats {
      today: PeriodStats {
        orders: row.today_orders,
        revenue: row.today_revenue,
      },
      week: PeriodStats {
        orders: row.week_orders,
        revenue: row.week_revenue,
      },
      month: PeriodStats {
        orders: row.month_orders,
        revenue: row.month_revenue,
      },
      total: PeriodStats {
        orders: row.total_orders,
        revenue: row.total_revenue,
      },
    })
  }
}
