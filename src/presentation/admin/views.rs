use askama::Template;

use crate::application::admin::EditorState;
use crate::domain::entities::{PostListItem, PostRecord};
use crate::domain::posts::{FieldErrors, PostFields};
use crate::presentation::views::LayoutContext;

#[derive(Clone)]
pub struct AdminNavItemView {
    pub slug: String,
    pub title: String,
    pub active: bool,
}

/// Post list shown beside every admin page.
#[derive(Clone)]
pub struct AdminNavView {
    pub posts: Vec<AdminNavItemView>,
}

impl AdminNavView {
    pub fn new(items: Vec<PostListItem>, active: Option<&str>) -> Self {
        let posts = items
            .into_iter()
            .map(|item| AdminNavItemView {
                active: active == Some(item.slug.as_str()),
                slug: item.slug,
                title: item.title,
            })
            .collect();
        Self { posts }
    }
}

pub struct AdminIndexView {
    pub nav: AdminNavView,
}

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub view: LayoutContext<AdminIndexView>,
}

pub struct EditorView {
    pub nav: AdminNavView,
    pub action: String,
    pub title: String,
    pub slug: String,
    pub markdown: String,
    pub errors: FieldErrors,
    pub state: EditorState,
}

impl EditorView {
    /// Fresh editor for `post`, or an empty one in new-post mode.
    pub fn for_post(nav: AdminNavView, action: String, post: Option<&PostRecord>) -> Self {
        Self {
            nav,
            action,
            title: post.map(|p| p.title.clone()).unwrap_or_default(),
            slug: post.map(|p| p.slug.clone()).unwrap_or_default(),
            markdown: post.map(|p| p.markdown.clone()).unwrap_or_default(),
            errors: FieldErrors::default(),
            state: EditorState::derive(post, None),
        }
    }

    /// Editor re-rendered after a rejected submission, keeping what was typed.
    pub fn with_submission(mut self, fields: &PostFields, errors: FieldErrors) -> Self {
        if let Some(title) = fields.title.as_ref() {
            self.title = title.clone();
        }
        if self.state.is_new_post
            && let Some(slug) = fields.slug.as_ref()
        {
            self.slug = slug.clone();
        }
        if let Some(markdown) = fields.markdown.as_ref() {
            self.markdown = markdown.clone();
        }
        self.errors = errors;
        self
    }
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct EditorTemplate {
    pub view: LayoutContext<EditorView>,
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::application::env::SiteEnv;
    use crate::domain::posts::TITLE_REQUIRED;
    use crate::presentation::views::LayoutChrome;

    fn chrome() -> LayoutChrome {
        LayoutChrome {
            env_json: SiteEnv::new("admin@example.com").public_script_json(),
            viewer_email: Some("admin@example.com".into()),
            is_admin: true,
        }
    }

    fn post() -> PostRecord {
        let now = OffsetDateTime::now_utc();
        PostRecord {
            slug: "hello".into(),
            title: "Hello".into(),
            markdown: "# Hello".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn nav() -> AdminNavView {
        AdminNavView::new(
            vec![PostListItem {
                slug: "hello".into(),
                title: "Hello".into(),
            }],
            Some("hello"),
        )
    }

    #[test]
    fn new_post_editor_has_editable_slug_and_create_button() {
        let view = EditorView::for_post(nav(), "/posts/admin/new".into(), None);
        let html = EditorTemplate {
            view: LayoutContext::new(chrome(), view),
        }
        .render()
        .expect("render");

        assert!(html.contains(r#"<input type="text" name="slug" value="">"#), "{html}");
        assert!(html.contains(r#"value="create""#), "{html}");
        assert!(html.contains(r#"data-pending-label="Creating...""#), "{html}");
        assert!(!html.contains(r#"value="delete""#), "{html}");
    }

    #[test]
    fn existing_post_editor_locks_slug_and_offers_delete() {
        let post = post();
        let view = EditorView::for_post(nav(), "/posts/admin/hello".into(), Some(&post));
        let html = EditorTemplate {
            view: LayoutContext::new(chrome(), view),
        }
        .render()
        .expect("render");

        assert!(html.contains(r#"<input type="hidden" name="slug" value="hello">"#), "{html}");
        assert!(html.contains("disabled"), "{html}");
        assert!(html.contains(r#"value="update""#), "{html}");
        assert!(html.contains(r#"value="delete""#), "{html}");
        assert!(html.contains(r#"aria-current="page""#), "{html}");
    }

    #[test]
    fn rejected_submission_keeps_input_and_shows_messages() {
        let fields = PostFields {
            title: Some(String::new()),
            slug: Some("draft".into()),
            markdown: Some("body text".into()),
        };
        let errors = FieldErrors {
            title: Some(TITLE_REQUIRED),
            ..FieldErrors::default()
        };
        let view = EditorView::for_post(nav(), "/posts/admin/new".into(), None)
            .with_submission(&fields, errors);
        let html = EditorTemplate {
            view: LayoutContext::new(chrome(), view),
        }
        .render()
        .expect("render");

        assert!(html.contains(TITLE_REQUIRED), "{html}");
        assert!(html.contains(r#"name="slug" value="draft""#), "{html}");
        assert!(html.contains("body text"), "{html}");
    }
}
