use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgArguments;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};

use crate::config;
use crate::list::{ListQuery, Literal, SqlResult};

use super::manager::{DatabaseError, DatabaseManager};
use super::models::NewBaseline;
use super::store::{BaselineWriter, ListStore};

/// PostgreSQL implementation of the storage seams.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn log_query(sql: &SqlResult) {
        if config::config().database.enable_query_logging {
            tracing::debug!(sql = %sql.query, params = sql.params.len(), "executing query");
        }
    }
}

#[async_trait]
impl ListStore for PgStore {
    async fn fetch(&self, query: &ListQuery) -> Result<Vec<Map<String, Value>>, DatabaseError> {
        let sql = query.to_sql();
        Self::log_query(&sql);
        let q = bind_params(sqlx::query_scalar::<_, Json<Map<String, Value>>>(&sql.query), &sql.params);
        let rows = q.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!(sql = %sql.query, error = %e, "list query failed");
            DatabaseError::from_sqlx(e)
        })?;
        Ok(rows.into_iter().map(|Json(row)| row).collect())
    }

    async fn count(&self, query: &ListQuery) -> Result<i64, DatabaseError> {
        let sql = query.to_count_sql();
        Self::log_query(&sql);
        let q = bind_params(sqlx::query_scalar::<_, i64>(&sql.query), &sql.params);
        q.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!(sql = %sql.query, error = %e, "count query failed");
            DatabaseError::from_sqlx(e)
        })
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl BaselineWriter for PgStore {
    async fn create_baseline(&self, account: i32, baseline: &NewBaseline) -> Result<i64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let baseline_id: i64 = sqlx::query_scalar(
            "INSERT INTO baseline (rh_account_id, name, config, description) \
             VALUES ($1, $2, $3, $4) RETURNING id::bigint",
        )
        .bind(account)
        .bind(&baseline.name)
        .bind(baseline.config.clone().map(Json))
        .bind(baseline.description.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        if !baseline.inventory_ids.is_empty() {
            sqlx::query(
                "UPDATE system_platform SET baseline_id = $1 \
                 WHERE rh_account_id = $2 AND inventory_id = ANY($3)",
            )
            .bind(baseline_id)
            .bind(account)
            .bind(baseline.inventory_ids.clone())
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from_sqlx)?;
        }

        tx.commit().await?;
        Ok(baseline_id)
    }
}

fn bind_params<'q, O>(
    mut q: sqlx::query::QueryScalar<'q, Postgres, O, PgArguments>,
    params: &'q [Literal],
) -> sqlx::query::QueryScalar<'q, Postgres, O, PgArguments> {
    for p in params {
        q = match p {
            Literal::Text(s) => q.bind(s.as_str()),
            Literal::Integer(i) => q.bind(*i),
            Literal::Boolean(b) => q.bind(*b),
            Literal::Uuid(u) => q.bind(*u),
        };
    }
    q
}
