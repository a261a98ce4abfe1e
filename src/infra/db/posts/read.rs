use async_trait::async_trait;
use sqlx::query_as;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::{PostListItem, PostRecord};

use super::PostgresRepositories;
use super::types::{POST_COLUMNS, PostListRow, PostRow};
use crate::infra::db::map_sqlx_error;

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1");
        let row = query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn list_items(&self) -> Result<Vec<PostListItem>, RepoError> {
        let rows = query_as::<_, PostListRow>("SELECT slug, title FROM posts ORDER BY title, slug")
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostListItem::from).collect())
    }

    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY title, slug");
        let rows = query_as::<_, PostRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }
}
