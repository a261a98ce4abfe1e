use crate::application::env::SiteEnv;
use crate::application::error::{ErrorReport, HttpError};
use crate::application::session::Viewer;
use crate::domain::entities::PostListItem;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Per-request values every page needs: the public environment and the viewer.
#[derive(Clone)]
pub struct LayoutChrome {
    pub env_json: String,
    pub viewer_email: Option<String>,
    pub is_admin: bool,
}

impl LayoutChrome {
    pub fn new(env: &SiteEnv, viewer: &Viewer) -> Self {
        Self {
            env_json: env.public_script_json(),
            viewer_email: viewer.user.as_ref().map(|user| user.email.clone()),
            is_admin: viewer.is_admin,
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub env_json: String,
    pub viewer_email: Option<String>,
    pub is_admin: bool,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            env_json: chrome.env_json,
            viewer_email: chrome.viewer_email,
            is_admin: chrome.is_admin,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostLinkView {
    pub slug: String,
    pub title: String,
}

impl From<PostListItem> for PostLinkView {
    fn from(item: PostListItem) -> Self {
        Self {
            slug: item.slug,
            title: item.title,
        }
    }
}

pub struct PostsIndexView {
    pub posts: Vec<PostLinkView>,
}

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct PostsIndexTemplate {
    pub view: LayoutContext<PostsIndexView>,
}

pub struct PostDetailView {
    pub title: String,
    pub html: String,
}

#[derive(Template)]
#[template(path = "posts/detail.html")]
pub struct PostDetailTemplate {
    pub view: LayoutContext<PostDetailView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Not Found".to_string(),
            message: "The page you requested does not exist.".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome(is_admin: bool) -> LayoutChrome {
        LayoutChrome {
            env_json: SiteEnv::new("admin@example.com").public_script_json(),
            viewer_email: None,
            is_admin,
        }
    }

    #[test]
    fn index_shows_admin_link_only_for_admins() {
        let posts = || PostsIndexView {
            posts: vec![PostLinkView {
                slug: "hello".into(),
                title: "Hello".into(),
            }],
        };

        let admin = PostsIndexTemplate {
            view: LayoutContext::new(chrome(true), posts()),
        }
        .render()
        .expect("render");
        assert!(admin.contains(r#"href="/posts/admin""#), "{admin}");
        assert!(admin.contains(r#"<a href="/posts/hello">Hello</a>"#), "{admin}");

        let reader = PostsIndexTemplate {
            view: LayoutContext::new(chrome(false), posts()),
        }
        .render()
        .expect("render");
        assert!(!reader.contains(r#"href="/posts/admin""#), "{reader}");
    }

    #[test]
    fn layout_exposes_public_env() {
        let html = ErrorTemplate {
            view: LayoutContext::new(chrome(false), ErrorPageView::not_found()),
        }
        .render()
        .expect("render");
        assert!(
            html.contains(r#"window.ENV = {"ADMIN_EMAIL":"admin@example.com"};"#),
            "{html}"
        );
    }

    #[test]
    fn not_found_response_carries_report() {
        let response = render_not_found_response(chrome(false));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }
}
