mod admin;
mod api;
mod middleware;
mod public;
mod state;

pub use state::AppState;

use axum::{
    Router,
    http::{HeaderMap, StatusCode, header::ACCEPT},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::admin::AdminPostError;
use crate::application::error::{ErrorReport, HttpError};
use crate::application::posts::PostError;
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;
use crate::domain::posts::IntentError;

use self::middleware::{log_responses, require_admin, resolve_viewer, set_request_context};

/// Assemble every route of the site around one shared [`AppState`].
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(public::root))
        .route("/posts", get(public::posts_index))
        .route("/posts/{slug}", get(public::post_detail))
        .route("/logout", axum::routing::post(public::logout))
        .route("/_health/db", get(public::db_health))
        .route("/static/{*path}", get(crate::infra::assets::serve))
        .route("/api/root", get(api::root))
        .route("/api/posts", get(api::posts))
        .route("/api/posts/{slug}", get(api::post_detail));

    let admin_routes = Router::new()
        .route("/posts/admin", get(admin::index))
        .route("/posts/admin/{slug}", get(admin::editor).post(admin::submit))
        .route("/api/posts/admin/{slug}", get(api::editor))
        .route_layer(axum_middleware::from_fn(require_admin));

    public_routes
        .merge(admin_routes)
        .fallback(public::not_found)
        .with_state(state.clone())
        .layer(axum_middleware::from_fn_with_state(state, resolve_viewer))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Whether the client asked for JSON rather than an HTML page.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Map a repository error to a consistent HTTP error response.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    match err {
        RepoError::Duplicate { constraint } => {
            HttpError::new(source, StatusCode::CONFLICT, "Duplicate record", constraint)
        }
        RepoError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "resource not found",
        ),
        RepoError::InvalidInput { message } => {
            HttpError::new(source, StatusCode::BAD_REQUEST, "Invalid input", message)
        }
        RepoError::Integrity { message } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Integrity constraint violated",
            message,
        ),
        RepoError::Timeout => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "Database timeout",
        ),
        RepoError::Persistence(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}

fn post_error_to_http(source: &'static str, err: PostError) -> HttpError {
    match err {
        PostError::Repo(err) => repo_error_to_http(source, err),
        PostError::Render(err) => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to render post",
            &err,
        ),
    }
}

fn domain_error_to_http(source: &'static str, err: DomainError) -> HttpError {
    match err {
        DomainError::NotFound { .. } => HttpError::from_error(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            &err,
        ),
        DomainError::Invariant { .. } => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unexpected error occurred",
            &err,
        ),
    }
}

fn admin_error_to_http(source: &'static str, err: AdminPostError) -> HttpError {
    match err {
        AdminPostError::Domain(err) => domain_error_to_http(source, err),
        AdminPostError::Repo(err) => repo_error_to_http(source, err),
    }
}

fn intent_error_to_http(source: &'static str, err: IntentError) -> HttpError {
    HttpError::from_error(source, StatusCode::BAD_REQUEST, "Invalid form intent", &err)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn accept_header_selects_json() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(wants_json(&headers));
    }

    #[test]
    fn repo_errors_map_to_statuses() {
        let cases = [
            (RepoError::NotFound, StatusCode::NOT_FOUND),
            (
                RepoError::Duplicate {
                    constraint: "posts_pkey".into(),
                },
                StatusCode::CONFLICT,
            ),
            (RepoError::Timeout, StatusCode::SERVICE_UNAVAILABLE),
            (
                RepoError::Persistence("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(repo_error_to_http("test", err).status(), status);
        }
    }

    #[test]
    fn invariant_violations_are_server_errors() {
        let err = AdminPostError::Domain(DomainError::invariant("route slug missing"));
        assert_eq!(
            admin_error_to_http("test", err).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_intent_is_a_bad_request() {
        let err = IntentError::Unknown("publish".into());
        assert_eq!(
            intent_error_to_http("test", err).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
