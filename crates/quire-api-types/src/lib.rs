//! JSON payloads returned by the quire loaders.
//!
//! These types are shared between the server and anything that consumes its
//! JSON surface, so they carry no behaviour beyond (de)serialisation.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub slug: String,
    pub title: String,
    pub markdown: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListItemPayload {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostListItemPayload>,
}

/// Full post collection, returned when the caller asks for markdown bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCollectionResponse {
    pub posts: Vec<PostPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostPayload,
    pub html: String,
}

/// Editor loader payload; `post` is `null` in new-post mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorLoaderResponse {
    pub post: Option<PostPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: String,
    pub email: String,
}

/// Browser-safe environment values exposed as `window.ENV`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicEnvPayload {
    #[serde(rename = "ADMIN_EMAIL")]
    pub admin_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootLoaderResponse {
    pub user: Option<UserPayload>,
    #[serde(rename = "ENV")]
    pub env: PublicEnvPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_loader_uses_env_key_names() {
        let payload = RootLoaderResponse {
            user: None,
            env: PublicEnvPayload {
                admin_email: "admin@example.com".into(),
            },
        };

        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["ENV"]["ADMIN_EMAIL"], "admin@example.com");
        assert!(value["user"].is_null());
    }

    #[test]
    fn editor_loader_serializes_missing_post_as_null() {
        let value = serde_json::to_value(EditorLoaderResponse { post: None }).expect("serialize");
        assert!(value["post"].is_null());
    }
}
