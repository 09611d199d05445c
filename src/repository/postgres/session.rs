//! Session lookup backed by the `sessions` table

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::{RepositoryError, SessionRepository, SessionUser};

#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn resolve(&self, token_hash: &str) -> Result<Option<SessionUser>, RepositoryError> {
        let record: Option<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT s.user_id, u.email
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(|(user_id, email)| SessionUser { user_id, email }))
    }
}
