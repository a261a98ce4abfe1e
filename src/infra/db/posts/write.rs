use async_trait::async_trait;
use sqlx::{query, query_as};
use time::OffsetDateTime;

use crate::application::repos::{PostsWriteRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::posts::PostDraft;
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;
use super::types::{POST_COLUMNS, PostRow};

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, draft: PostDraft) -> Result<PostRecord, RepoError> {
        let PostDraft {
            title,
            slug,
            markdown,
        } = draft;
        let now = OffsetDateTime::now_utc();

        let sql = format!(
            "INSERT INTO posts (slug, title, markdown, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {POST_COLUMNS}"
        );
        let row = query_as::<_, PostRow>(&sql)
            .bind(slug)
            .bind(title)
            .bind(markdown)
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_post(&self, draft: PostDraft) -> Result<PostRecord, RepoError> {
        let PostDraft {
            title,
            slug,
            markdown,
        } = draft;

        let sql = format!(
            "UPDATE posts SET title = $2, markdown = $3, updated_at = $4 \
             WHERE slug = $1 RETURNING {POST_COLUMNS}"
        );
        // `fetch_one` turns a missing slug into RowNotFound, mapped to NotFound.
        let row = query_as::<_, PostRow>(&sql)
            .bind(slug)
            .bind(title)
            .bind(markdown)
            .bind(OffsetDateTime::now_utc())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_post(&self, slug: &str) -> Result<(), RepoError> {
        query("DELETE FROM posts WHERE slug = $1")
            .bind(slug)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
