use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::error::DomainError;
use crate::domain::posts::FieldErrors;

/// Where every successful mutation sends the browser.
pub const ADMIN_POSTS_PATH: &str = "/posts/admin";

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Result of one editor submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Redirect(&'static str),
    Invalid(FieldErrors),
}
