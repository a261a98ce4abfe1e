//! JSON loaders mirroring the HTML pages.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quire_api_types::{
    EditorLoaderResponse, PostCollectionResponse, PostDetailResponse, PostListResponse,
    PostPayload, RootLoaderResponse,
};
use serde::Deserialize;

use crate::application::error::HttpError;
use crate::application::session::Viewer;
use crate::domain::posts::EditorRoute;

use super::{AppState, admin_error_to_http, domain_error_to_http, post_error_to_http};

const SOURCE: &str = "infra::http::api";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PostsQuery {
    include: Option<String>,
}

impl PostsQuery {
    fn include_markdown(&self) -> bool {
        self.include
            .as_deref()
            .is_some_and(|value| value.split(',').any(|part| part.trim() == "markdown"))
    }
}

pub(super) async fn root(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Json<RootLoaderResponse> {
    Json(RootLoaderResponse {
        user: viewer.user.map(Into::into),
        env: state.env.public(),
    })
}

pub(super) async fn posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Response {
    if query.include_markdown() {
        return match state.posts.list_posts().await {
            Ok(posts) => Json(PostCollectionResponse {
                posts: posts.into_iter().map(PostPayload::from).collect(),
            })
            .into_response(),
            Err(err) => post_error_to_http(SOURCE, err).into_response(),
        };
    }

    match state.posts.list_items().await {
        Ok(items) => Json(PostListResponse {
            posts: items.into_iter().map(Into::into).collect(),
        })
        .into_response(),
        Err(err) => post_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn post_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    match state.posts.detail(&slug).await {
        Ok(Some(detail)) => Json(PostDetailResponse {
            post: detail.post.into(),
            html: detail.html,
        })
        .into_response(),
        Ok(None) => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Post not found",
            format!("no post with slug `{slug}`"),
        )
        .into_response(),
        Err(err) => post_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn editor(State(state): State<AppState>, Path(param): Path<String>) -> Response {
    let route = match EditorRoute::parse(&param) {
        Ok(route) => route,
        Err(err) => return domain_error_to_http(SOURCE, err).into_response(),
    };

    match state.admin_posts.load_editor(&route).await {
        Ok(post) => Json(EditorLoaderResponse {
            post: post.map(Into::into),
        })
        .into_response(),
        Err(err) => admin_error_to_http(SOURCE, err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_markdown_is_detected_in_lists() {
        let query = |value: &str| PostsQuery {
            include: Some(value.to_string()),
        };
        assert!(query("markdown").include_markdown());
        assert!(query("html, markdown").include_markdown());
        assert!(!query("html").include_markdown());
        assert!(!PostsQuery::default().include_markdown());
    }
}
