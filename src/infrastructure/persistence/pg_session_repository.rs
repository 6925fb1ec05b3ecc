//! PostgreSQL implementation of the session repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Session;
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

/// PostgreSQL repository for session lookups.
///
/// Sessions are written by the session-tracking side of the system; this
/// repository only reads them.
pub struct PgSessionRepository {
    pool: Arc<PgPool>,
}

impl PgSessionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i64,
    token: String,
    timezone: Option<String>,
    country_code: Option<String>,
    state: Option<String>,
    city: Option<String>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            token: row.token,
            timezone: row.timezone,
            country_code: row.country_code,
            state: row.state,
            city: row.city,
        }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, AppError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, token, timezone, country_code, state, city
            FROM sessions
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Session::from))
    }
}
