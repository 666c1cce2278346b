//! PostgreSQL category store (sqlx)

use super::sql::CategoryStatements;
use crate::config::CategoryTableConfig;
use crate::domain::entities::Category;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{CategoryKey, TransactionOptions};
use crate::ports::outbound::{CategoryStore, CategoryTransaction};
use async_trait::async_trait;
use sqlx::postgres::{PgDatabaseError, PgPool};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tracing::debug;

/// Category table in PostgreSQL
#[derive(Clone)]
pub struct PostgresCategoryStore {
    pool: PgPool,
    statements: Arc<CategoryStatements>,
}

impl PostgresCategoryStore {
    pub fn new(pool: PgPool, table: &CategoryTableConfig) -> Self {
        Self {
            pool,
            statements: Arc::new(CategoryStatements::new(table)),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn sequence_name(&self) -> Result<String, StoreError> {
        let name: Option<String> = sqlx::query_scalar(&self.statements.sequence_name)
            .bind(&self.statements.table_arg)
            .bind(&self.statements.key_column_arg)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        name.ok_or_else(|| StoreError::Query {
            message: format!(
                "no serial sequence backs {}.{}",
                self.statements.table_arg, self.statements.key_column_arg
            ),
        })
    }
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn begin(
        &self,
        options: &TransactionOptions,
    ) -> Result<Box<dyn CategoryTransaction>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        for statement in CategoryStatements::opening(options) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        debug!(isolation = options.isolation.as_sql(), "transaction opened");
        Ok(Box::new(PostgresTransaction {
            tx: Some(tx),
            statements: Arc::clone(&self.statements),
        }))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows: Vec<(i64, String)> = sqlx::query_as(&self.statements.list)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|(key, name)| Category::new(key, name)).collect())
    }

    async fn next_sequence_value(&self) -> Result<CategoryKey, StoreError> {
        let sequence = self.sequence_name().await?;

        sqlx::query_scalar(&CategoryStatements::peek_sequence(&sequence))
            .bind(&sequence)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

/// One open PostgreSQL transaction
pub struct PostgresTransaction {
    /// `None` once committed or rolled back; dropping an open one rolls back
    tx: Option<Transaction<'static, Postgres>>,
    statements: Arc<CategoryStatements>,
}

fn open<'a>(
    tx: &'a mut Option<Transaction<'static, Postgres>>,
) -> Result<&'a mut Transaction<'static, Postgres>, StoreError> {
    tx.as_mut().ok_or(StoreError::TransactionFinished)
}

#[async_trait]
impl CategoryTransaction for PostgresTransaction {
    async fn lock_exclusive(&mut self) -> Result<(), StoreError> {
        let Self { tx, statements } = self;

        sqlx::query(&statements.lock)
            .execute(&mut **open(tx)?)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>, StoreError> {
        let Self { tx, statements } = self;

        let rows: Vec<(i64, String)> = sqlx::query_as(&statements.list)
            .fetch_all(&mut **open(tx)?)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|(key, name)| Category::new(key, name)).collect())
    }

    async fn rekey_by_name(&mut self, name: &str, new_key: CategoryKey) -> Result<u64, StoreError> {
        let Self { tx, statements } = self;

        let result = sqlx::query(&statements.rekey_by_name)
            .bind(new_key)
            .bind(name)
            .execute(&mut **open(tx)?)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn rekey(&mut self, from: CategoryKey, to: CategoryKey) -> Result<u64, StoreError> {
        let Self { tx, statements } = self;

        let result = sqlx::query(&statements.rekey)
            .bind(to)
            .bind(from)
            .execute(&mut **open(tx)?)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn advance_sequence(&mut self) -> Result<CategoryKey, StoreError> {
        let Self { tx, statements } = self;

        let next: Option<i64> = sqlx::query_scalar(&statements.advance_sequence)
            .bind(&statements.table_arg)
            .bind(&statements.key_column_arg)
            .fetch_one(&mut **open(tx)?)
            .await
            .map_err(map_sqlx_error)?;

        next.ok_or_else(|| StoreError::Query {
            message: format!(
                "no serial sequence backs {}.{}",
                statements.table_arg, statements.key_column_arg
            ),
        })
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::TransactionFinished)?;
        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::TransactionFinished)?;
        tx.rollback().await.map_err(map_sqlx_error)
    }
}

/// Classify a sqlx error for the domain.
///
/// SQLSTATE 23505 is a constraint violation with the server's message kept
/// verbatim; class 08 and transport failures are connectivity errors.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => {
            let code = db.code().map(|c| c.into_owned()).unwrap_or_default();
            let mut message = db.message().to_string();
            if let Some(detail) = db
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(PgDatabaseError::detail)
            {
                message = format!("{message}: {detail}");
            }

            if code == "23505" {
                StoreError::UniqueViolation { message }
            } else if code.starts_with("08") || code.starts_with("57P") {
                StoreError::Connection { message }
            } else {
                StoreError::Query { message }
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Connection {
            message: err.to_string(),
        },
        _ => StoreError::Query {
            message: err.to_string(),
        },
    }
}
