//! Submission vocabulary for the post editor.
//!
//! A single editor form can ask for one of three mutations. The raw `intent`
//! field is parsed into [`SubmissionIntent`] and combined with the submitted
//! fields into a [`PostSubmission`], so a delete never carries form fields and
//! an unrecognised intent never reaches the mutation step.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use super::error::DomainError;

/// Route parameter that opens the editor in new-post mode.
pub const NEW_POST_ROUTE: &str = "new";

pub const TITLE_REQUIRED: &str = "Title is required";
pub const SLUG_REQUIRED: &str = "Slug is required";
pub const MARKDOWN_REQUIRED: &str = "Markdown is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionIntent {
    Create,
    Update,
    Delete,
}

impl SubmissionIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionIntent::Create => "create",
            SubmissionIntent::Update => "update",
            SubmissionIntent::Delete => "delete",
        }
    }
}

impl fmt::Display for SubmissionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("form intent is missing")]
    Missing,
    #[error("unknown form intent `{0}`")]
    Unknown(String),
}

impl FromStr for SubmissionIntent {
    type Err = IntentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" => Err(IntentError::Missing),
            "create" => Ok(SubmissionIntent::Create),
            "update" => Ok(SubmissionIntent::Update),
            "delete" => Ok(SubmissionIntent::Delete),
            other => Err(IntentError::Unknown(other.to_string())),
        }
    }
}

/// Raw editor fields exactly as submitted; any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown: Option<String>,
}

/// Fields that passed presence validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub markdown: String,
}

/// Per-field validation messages; `None` serialises as `null` for valid fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub title: Option<&'static str>,
    pub slug: Option<&'static str>,
    pub markdown: Option<&'static str>,
}

impl FieldErrors {
    pub fn has_errors(&self) -> bool {
        self.title.is_some() || self.slug.is_some() || self.markdown.is_some()
    }
}

impl PostFields {
    /// Require every field to be present and non-empty.
    pub fn validate(self) -> Result<PostDraft, FieldErrors> {
        match (
            present(self.title),
            present(self.slug),
            present(self.markdown),
        ) {
            (Some(title), Some(slug), Some(markdown)) => Ok(PostDraft {
                title,
                slug,
                markdown,
            }),
            (title, slug, markdown) => Err(FieldErrors {
                title: title.is_none().then_some(TITLE_REQUIRED),
                slug: slug.is_none().then_some(SLUG_REQUIRED),
                markdown: markdown.is_none().then_some(MARKDOWN_REQUIRED),
            }),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// One editor submission, tagged by intent. Delete carries no fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSubmission {
    Create(PostFields),
    Update(PostFields),
    Delete,
}

impl PostSubmission {
    pub fn parse(intent: Option<&str>, fields: PostFields) -> Result<Self, IntentError> {
        let intent = intent.ok_or(IntentError::Missing)?.parse()?;
        Ok(Self::new(intent, fields))
    }

    pub fn new(intent: SubmissionIntent, fields: PostFields) -> Self {
        match intent {
            SubmissionIntent::Create => PostSubmission::Create(fields),
            SubmissionIntent::Update => PostSubmission::Update(fields),
            SubmissionIntent::Delete => PostSubmission::Delete,
        }
    }

    pub fn intent(&self) -> SubmissionIntent {
        match self {
            PostSubmission::Create(_) => SubmissionIntent::Create,
            PostSubmission::Update(_) => SubmissionIntent::Update,
            PostSubmission::Delete => SubmissionIntent::Delete,
        }
    }
}

/// Which record the editor route addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorRoute {
    New,
    Existing(String),
}

impl EditorRoute {
    pub fn parse(param: &str) -> Result<Self, DomainError> {
        match param {
            "" => Err(DomainError::invariant("editor route slug is missing")),
            NEW_POST_ROUTE => Ok(EditorRoute::New),
            slug => Ok(EditorRoute::Existing(slug.to_string())),
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            EditorRoute::New => None,
            EditorRoute::Existing(slug) => Some(slug.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, slug: &str, markdown: &str) -> PostFields {
        PostFields {
            title: Some(title.to_string()),
            slug: Some(slug.to_string()),
            markdown: Some(markdown.to_string()),
        }
    }

    #[test]
    fn intent_parses_known_tags() {
        assert_eq!("create".parse::<SubmissionIntent>(), Ok(SubmissionIntent::Create));
        assert_eq!("update".parse::<SubmissionIntent>(), Ok(SubmissionIntent::Update));
        assert_eq!("delete".parse::<SubmissionIntent>(), Ok(SubmissionIntent::Delete));
    }

    #[test]
    fn unknown_intent_is_rejected_instead_of_defaulting_to_update() {
        let result = PostSubmission::parse(Some("publish"), fields("Hi", "hi", "# Hi"));
        assert_eq!(result, Err(IntentError::Unknown("publish".into())));
    }

    #[test]
    fn missing_intent_is_rejected() {
        assert_eq!(
            PostSubmission::parse(None, PostFields::default()),
            Err(IntentError::Missing)
        );
        assert_eq!(
            PostSubmission::parse(Some(""), PostFields::default()),
            Err(IntentError::Missing)
        );
    }

    #[test]
    fn intent_tags_match_exactly() {
        for tag in [" delete ", "Delete", "  "] {
            assert_eq!(
                tag.parse::<SubmissionIntent>(),
                Err(IntentError::Unknown(tag.to_string())),
                "{tag:?}"
            );
        }
    }

    #[test]
    fn delete_submission_drops_form_fields() {
        let submission =
            PostSubmission::parse(Some("delete"), fields("Hi", "other", "# Hi")).expect("parse");
        assert_eq!(submission, PostSubmission::Delete);
        assert_eq!(submission.intent(), SubmissionIntent::Delete);
    }

    #[test]
    fn complete_fields_validate_into_draft() {
        let draft = fields("Hi", "hi", "# Hi").validate().expect("valid");
        assert_eq!(
            draft,
            PostDraft {
                title: "Hi".into(),
                slug: "hi".into(),
                markdown: "# Hi".into(),
            }
        );
    }

    #[test]
    fn empty_title_is_reported_alone() {
        let errors = fields("", "hi", "# Hi").validate().expect_err("invalid");
        assert_eq!(
            errors,
            FieldErrors {
                title: Some(TITLE_REQUIRED),
                slug: None,
                markdown: None,
            }
        );
    }

    #[test]
    fn absent_fields_are_all_reported() {
        let errors = PostFields::default().validate().expect_err("invalid");
        assert_eq!(errors.title, Some(TITLE_REQUIRED));
        assert_eq!(errors.slug, Some(SLUG_REQUIRED));
        assert_eq!(errors.markdown, Some(MARKDOWN_REQUIRED));
        assert!(errors.has_errors());
    }

    #[test]
    fn field_errors_serialize_valid_fields_as_null() {
        let errors = fields("", "hi", "# Hi").validate().expect_err("invalid");
        let value = serde_json::to_value(errors).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "title": "Title is required",
                "slug": null,
                "markdown": null,
            })
        );
    }

    #[test]
    fn whitespace_counts_as_present() {
        assert!(fields(" ", "hi", "x").validate().is_ok());
    }

    #[test]
    fn editor_route_distinguishes_new_from_existing() {
        assert_eq!(EditorRoute::parse("new").expect("route"), EditorRoute::New);
        assert_eq!(
            EditorRoute::parse("hello").expect("route"),
            EditorRoute::Existing("hello".into())
        );
        assert!(EditorRoute::parse("").is_err());
        assert_eq!(EditorRoute::New.slug(), None);
    }
}
