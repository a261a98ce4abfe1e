use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, cookie::Cookie};

use crate::application::{error::HttpError, session::Viewer};
use crate::presentation::views::{
    LayoutChrome, LayoutContext, PostDetailTemplate, PostDetailView, PostLinkView,
    PostsIndexTemplate, PostsIndexView, render_not_found_response, render_template_response,
};

use super::{AppState, db_health_response, post_error_to_http};

const POSTS_PATH: &str = "/posts";

pub(super) async fn root() -> Redirect {
    Redirect::to(POSTS_PATH)
}

pub(super) async fn posts_index(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Response {
    let items = match state.posts.list_items().await {
        Ok(items) => items,
        Err(err) => {
            return post_error_to_http("infra::http::public::posts_index", err).into_response();
        }
    };

    let content = PostsIndexView {
        posts: items.into_iter().map(PostLinkView::from).collect(),
    };
    let view = LayoutContext::new(LayoutChrome::new(&state.env, &viewer), content);
    render_template_response(PostsIndexTemplate { view }, StatusCode::OK)
}

pub(super) async fn post_detail(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(slug): Path<String>,
) -> Response {
    let chrome = LayoutChrome::new(&state.env, &viewer);

    match state.posts.detail(&slug).await {
        Ok(Some(detail)) => {
            let content = PostDetailView {
                title: detail.post.title,
                html: detail.html,
            };
            let view = LayoutContext::new(chrome, content);
            render_template_response(PostDetailTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => post_error_to_http("infra::http::public::post_detail", err).into_response(),
    }
}

pub(super) async fn not_found(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Response {
    render_not_found_response(LayoutChrome::new(&state.env, &viewer))
}

/// Drop the session server-side and clear the cookie.
pub(super) async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(&state.session_cookie)
        && let Err(err) = state.sessions.revoke(cookie.value()).await
    {
        return HttpError::from_error(
            "infra::http::public::logout",
            StatusCode::SERVICE_UNAVAILABLE,
            "Failed to end session",
            &err,
        )
        .into_response();
    }

    let removal = Cookie::build((state.session_cookie.to_string(), "")).path("/");
    (jar.remove(removal), Redirect::to(POSTS_PATH)).into_response()
}

pub(super) async fn db_health(State(state): State<AppState>) -> Response {
    db_health_response(state.health.ping().await)
}
