//! Domain entities mirrored from persistent storage.

use quire_api_types::{PostListItemPayload, PostPayload, UserPayload};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A blog post. `slug` is the primary key and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub slug: String,
    pub title: String,
    pub markdown: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostListItem {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: Vec<u8>,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl From<&PostRecord> for PostListItem {
    fn from(post: &PostRecord) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
        }
    }
}

impl From<PostRecord> for PostPayload {
    fn from(post: PostRecord) -> Self {
        Self {
            slug: post.slug,
            title: post.title,
            markdown: post.markdown,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<PostListItem> for PostListItemPayload {
    fn from(item: PostListItem) -> Self {
        Self {
            slug: item.slug,
            title: item.title,
        }
    }
}

impl From<UserRecord> for UserPayload {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
        }
    }
}
