//! PostgreSQL account store (sqlx)

use super::sql::AccountStatements;
use crate::config::SchemaConfig;
use crate::domain::entities::{NewUser, User};
use crate::domain::errors::AccountStoreError;
use crate::ports::outbound::AccountStore;
use async_trait::async_trait;
use shared_types::Role;
use sqlx::postgres::{PgDatabaseError, PgPool};
use std::sync::Arc;

type UserRow = (i64, String, String, String, String);

/// Account tables in PostgreSQL
#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
    statements: Arc<AccountStatements>,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool, schema: &SchemaConfig) -> Self {
        Self {
            pool,
            statements: Arc::new(AccountStatements::new(schema)),
        }
    }

    async fn count(&self, sql: &str) -> Result<u64, AccountStoreError> {
        let count: i64 = sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn into_user((id, nim, name, email, role): UserRow) -> Result<User, AccountStoreError> {
    let role: Role = role.parse().map_err(|e: shared_types::TypeError| AccountStoreError::Query {
        message: e.to_string(),
    })?;
    Ok(User {
        id,
        nim,
        name,
        email,
        role,
    })
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn ping(&self) -> Result<(), AccountStoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, AccountStoreError> {
        self.count(&self.statements.count_users).await
    }

    async fn count_categories(&self) -> Result<u64, AccountStoreError> {
        self.count(&self.statements.count_categories).await
    }

    async fn count_posts(&self) -> Result<u64, AccountStoreError> {
        self.count(&self.statements.count_posts).await
    }

    async fn sample_users(&self, limit: u32) -> Result<Vec<User>, AccountStoreError> {
        let rows: Vec<UserRow> = sqlx::query_as(&self.statements.sample_users)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(into_user).collect()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AccountStoreError> {
        let row: Option<UserRow> = sqlx::query_as(&self.statements.find_user_by_email)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(into_user).transpose()
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, AccountStoreError> {
        let row: UserRow = sqlx::query_as(&self.statements.insert_user(user.role))
            .bind(&user.nim)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.password_hash.expose())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        into_user(row)
    }
}

/// SQLSTATE 23505 is a duplicate account; class 08, 28 and transport
/// failures mean the server could not be reached or refused the login.
pub fn map_sqlx_error(err: sqlx::Error) -> AccountStoreError {
    match &err {
        sqlx::Error::Database(db) => {
            let code = db.code().map(|c| c.into_owned()).unwrap_or_default();
            let message = match db
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(PgDatabaseError::detail)
            {
                Some(detail) => format!("{}: {detail}", db.message()),
                None => db.message().to_string(),
            };

            if code == "23505" {
                AccountStoreError::UniqueViolation { message }
            } else if code.starts_with("08") || code.starts_with("28") {
                AccountStoreError::Connection { message }
            } else {
                AccountStoreError::Query { message }
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => AccountStoreError::Connection {
            message: err.to_string(),
        },
        _ => AccountStoreError::Query {
            message: err.to_string(),
        },
    }
}
