//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{PostListItem, PostRecord, SessionRecord, UserRecord};
use crate::domain::posts::PostDraft;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Read side of the post store. Listings are ordered by title, then slug.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn list_items(&self) -> Result<Vec<PostListItem>, RepoError>;

    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, draft: PostDraft) -> Result<PostRecord, RepoError>;

    /// Overwrite title and markdown of the post addressed by `draft.slug`.
    async fn update_post(&self, draft: PostDraft) -> Result<PostRecord, RepoError>;

    /// Remove the post; succeeds when no such post exists.
    async fn delete_post(&self, slug: &str) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: Vec<u8>,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct SessionWithUser {
    pub session: SessionRecord,
    pub user: UserRecord,
}

#[async_trait]
pub trait SessionsRepo: Send + Sync {
    async fn find_session(&self, id: Uuid) -> Result<Option<SessionWithUser>, RepoError>;

    async fn upsert_user(&self, email: &str) -> Result<UserRecord, RepoError>;

    async fn create_session(&self, params: CreateSessionParams)
    -> Result<SessionRecord, RepoError>;

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Liveness probe for the backing store.
#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
