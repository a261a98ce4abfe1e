use axum::{
    Extension, Form, Json,
    extract::{FromRequest, Path, Request, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Multipart, multipart::MultipartError};
use serde::Deserialize;

use crate::application::admin::SubmissionOutcome;
use crate::application::error::{ErrorReport, HttpError};
use crate::application::session::Viewer;
use crate::domain::entities::PostRecord;
use crate::domain::posts::{EditorRoute, FieldErrors, PostFields, PostSubmission};
use crate::presentation::admin::views::{
    AdminIndexTemplate, AdminIndexView, AdminNavView, EditorTemplate, EditorView,
};
use crate::presentation::views::{LayoutChrome, LayoutContext, render_template_response};

use super::{
    AppState, admin_error_to_http, domain_error_to_http, intent_error_to_http, wants_json,
};

const SOURCE: &str = "infra::http::admin";

/// Raw editor form. Every field is optional so presence is judged by the
/// validator rather than by the extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct EditorForm {
    intent: Option<String>,
    title: Option<String>,
    slug: Option<String>,
    markdown: Option<String>,
}

impl EditorForm {
    fn into_parts(self) -> (Option<String>, PostFields) {
        let fields = PostFields {
            title: self.title,
            slug: self.slug,
            markdown: self.markdown,
        };
        (self.intent, fields)
    }
}

/// Editor form read from either a URL-encoded or a multipart body.
pub(super) struct EditorSubmission(EditorForm);

impl<S> FromRequest<S> for EditorSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(request.headers()) {
            let Form(form) = Form::<EditorForm>::from_request(request, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(form));
        }

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(IntoResponse::into_response)?;
        read_multipart_form(&mut multipart)
            .await
            .map(Self)
            .map_err(IntoResponse::into_response)
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

async fn read_multipart_form(multipart: &mut Multipart) -> Result<EditorForm, HttpError> {
    let mut form = EditorForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "intent" => form.intent = Some(value),
            "title" => form.title = Some(value),
            "slug" => form.slug = Some(value),
            "markdown" => form.markdown = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> HttpError {
    HttpError::from_error(SOURCE, err.status(), "Invalid form data", &err)
}

pub(super) async fn index(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Response {
    let items = match state.admin_posts.list_items().await {
        Ok(items) => items,
        Err(err) => return admin_error_to_http(SOURCE, err).into_response(),
    };

    let content = AdminIndexView {
        nav: AdminNavView::new(items, None),
    };
    let view = LayoutContext::new(LayoutChrome::new(&state.env, &viewer), content);
    render_template_response(AdminIndexTemplate { view }, StatusCode::OK)
}

pub(super) async fn editor(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(param): Path<String>,
) -> Response {
    let route = match EditorRoute::parse(&param) {
        Ok(route) => route,
        Err(err) => return domain_error_to_http(SOURCE, err).into_response(),
    };

    let (nav, post) = match load_editor_context(&state, &route).await {
        Ok(context) => context,
        Err(err) => return err.into_response(),
    };

    let content = EditorView::for_post(nav, editor_action(&param), post.as_ref());
    let view = LayoutContext::new(LayoutChrome::new(&state.env, &viewer), content);
    render_template_response(EditorTemplate { view }, StatusCode::OK)
}

pub(super) async fn submit(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(param): Path<String>,
    headers: HeaderMap,
    EditorSubmission(form): EditorSubmission,
) -> Response {
    let route = match EditorRoute::parse(&param) {
        Ok(route) => route,
        Err(err) => return domain_error_to_http(SOURCE, err).into_response(),
    };

    let (intent, fields) = form.into_parts();
    let submission = match PostSubmission::parse(intent.as_deref(), fields.clone()) {
        Ok(submission) => submission,
        Err(err) => return intent_error_to_http(SOURCE, err).into_response(),
    };

    if route == EditorRoute::New && submission == PostSubmission::Delete {
        return HttpError::new(
            SOURCE,
            StatusCode::BAD_REQUEST,
            "Nothing to delete",
            "delete submitted from the new-post editor",
        )
        .into_response();
    }

    match state.admin_posts.submit(&route, submission).await {
        Ok(SubmissionOutcome::Redirect(location)) => Redirect::to(location).into_response(),
        Ok(SubmissionOutcome::Invalid(errors)) => {
            let mut response = if wants_json(&headers) {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            } else {
                rerender_editor(&state, &viewer, &param, &route, &fields, errors).await
            };
            ErrorReport::from_message(
                SOURCE,
                StatusCode::UNPROCESSABLE_ENTITY,
                "post submission failed validation",
            )
            .attach(&mut response);
            response
        }
        Err(err) => admin_error_to_http(SOURCE, err).into_response(),
    }
}

async fn rerender_editor(
    state: &AppState,
    viewer: &Viewer,
    param: &str,
    route: &EditorRoute,
    fields: &PostFields,
    errors: FieldErrors,
) -> Response {
    let (nav, post) = match load_editor_context(state, route).await {
        Ok(context) => context,
        Err(err) => return err.into_response(),
    };

    let content = EditorView::for_post(nav, editor_action(param), post.as_ref())
        .with_submission(fields, errors);
    let view = LayoutContext::new(LayoutChrome::new(&state.env, viewer), content);
    render_template_response(EditorTemplate { view }, StatusCode::UNPROCESSABLE_ENTITY)
}

async fn load_editor_context(
    state: &AppState,
    route: &EditorRoute,
) -> Result<(AdminNavView, Option<PostRecord>), HttpError> {
    let post = state
        .admin_posts
        .load_editor(route)
        .await
        .map_err(|err| admin_error_to_http(SOURCE, err))?;
    let items = state
        .admin_posts
        .list_items()
        .await
        .map_err(|err| admin_error_to_http(SOURCE, err))?;

    Ok((AdminNavView::new(items, route.slug()), post))
}

fn editor_action(param: &str) -> String {
    format!("/posts/admin/{param}")
}
