use async_trait::async_trait;
use sqlx::{query, query_as};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreateSessionParams, RepoError, SessionWithUser, SessionsRepo};
use crate::domain::entities::{SessionRecord, UserRecord};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    created_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    token_hash: Vec<u8>,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            token_hash: row.token_hash,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionUserRow {
    id: Uuid,
    user_id: Uuid,
    token_hash: Vec<u8>,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
    email: String,
    user_created_at: OffsetDateTime,
}

impl From<SessionUserRow> for SessionWithUser {
    fn from(row: SessionUserRow) -> Self {
        Self {
            user: UserRecord {
                id: row.user_id,
                email: row.email,
                created_at: row.user_created_at,
            },
            session: SessionRecord {
                id: row.id,
                user_id: row.user_id,
                token_hash: row.token_hash,
                created_at: row.created_at,
                expires_at: row.expires_at,
            },
        }
    }
}

#[async_trait]
impl SessionsRepo for PostgresRepositories {
    async fn find_session(&self, id: Uuid) -> Result<Option<SessionWithUser>, RepoError> {
        let row = query_as::<_, SessionUserRow>(
            r#"
            SELECT s.id, s.user_id, s.token_hash, s.created_at, s.expires_at,
                   u.email, u.created_at AS user_created_at
            FROM sessions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SessionWithUser::from))
    }

    async fn upsert_user(&self, email: &str) -> Result<UserRecord, RepoError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<SessionRecord, RepoError> {
        let row = query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token_hash, created_at, expires_at
            "#,
        )
        .bind(params.id)
        .bind(params.user_id)
        .bind(params.token_hash)
        .bind(OffsetDateTime::now_utc())
        .bind(params.expires_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError> {
        query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
