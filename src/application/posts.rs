//! Public post loaders.

use std::sync::Arc;
use std::time::Instant;

use metrics::histogram;
use thiserror::Error;

use crate::application::render::{MarkdownRenderer, RenderError};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::{PostListItem, PostRecord};

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A post together with its rendered body.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostRecord,
    pub html: String,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepo>,
    renderer: Arc<dyn MarkdownRenderer>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostsRepo>, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        Self { posts, renderer }
    }

    pub async fn list_items(&self) -> Result<Vec<PostListItem>, PostError> {
        Ok(self.posts.list_items().await?)
    }

    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, PostError> {
        Ok(self.posts.list_posts().await?)
    }

    pub async fn find(&self, slug: &str) -> Result<Option<PostRecord>, PostError> {
        Ok(self.posts.find_by_slug(slug).await?)
    }

    /// Load a post and render its markdown. Unknown slugs yield `None`.
    pub async fn detail(&self, slug: &str) -> Result<Option<PostDetail>, PostError> {
        let Some(post) = self.posts.find_by_slug(slug).await? else {
            return Ok(None);
        };

        let started = Instant::now();
        let html = self.renderer.render(&post.markdown)?;
        histogram!("quire_markdown_render_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        Ok(Some(PostDetail { post, html }))
    }
}
