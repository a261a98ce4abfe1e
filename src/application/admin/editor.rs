//! Derived state for the post editor form.
//!
//! The same derivation runs twice: on the server with no pending submission,
//! and in the browser (through the `data-pending-label` attributes rendered
//! from [`EditorButton`]) while a submission is in flight.

use crate::domain::entities::PostRecord;
use crate::domain::posts::SubmissionIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorButton {
    pub intent: SubmissionIntent,
    pub label: &'static str,
    pub pending_label: &'static str,
    pub pending: bool,
    pub disabled: bool,
    pub danger: bool,
}

impl EditorButton {
    fn new(
        intent: SubmissionIntent,
        idle: &'static str,
        pending_label: &'static str,
        pending_intent: Option<SubmissionIntent>,
    ) -> Self {
        Self {
            intent,
            label: if pending_intent == Some(intent) {
                pending_label
            } else {
                idle
            },
            pending_label,
            pending: pending_intent == Some(intent),
            disabled: pending_intent.is_some(),
            danger: intent == SubmissionIntent::Delete,
        }
    }

    pub fn intent_value(&self) -> &'static str {
        self.intent.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorState {
    pub is_new_post: bool,
    pub is_creating: bool,
    pub is_updating: bool,
    pub is_deleting: bool,
    pub is_submitting: bool,
    pub primary: EditorButton,
    pub delete: Option<EditorButton>,
}

impl EditorState {
    pub fn derive(loaded: Option<&PostRecord>, pending: Option<SubmissionIntent>) -> Self {
        let is_new_post = loaded.is_none();

        let primary = if is_new_post {
            EditorButton::new(
                SubmissionIntent::Create,
                "Create Post",
                "Creating...",
                pending,
            )
        } else {
            EditorButton::new(
                SubmissionIntent::Update,
                "Update Post",
                "Updating...",
                pending,
            )
        };

        let delete = (!is_new_post).then(|| {
            EditorButton::new(
                SubmissionIntent::Delete,
                "Delete Post",
                "Deleting...",
                pending,
            )
        });

        Self {
            is_new_post,
            is_creating: pending == Some(SubmissionIntent::Create),
            is_updating: pending == Some(SubmissionIntent::Update),
            is_deleting: pending == Some(SubmissionIntent::Delete),
            is_submitting: pending.is_some(),
            primary,
            delete,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn post() -> PostRecord {
        let now = OffsetDateTime::now_utc();
        PostRecord {
            slug: "hi".into(),
            title: "Hi".into(),
            markdown: "# Hi".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn creating_new_post() {
        let state = EditorState::derive(None, Some(SubmissionIntent::Create));

        assert!(state.is_new_post);
        assert!(state.is_creating);
        assert!(!state.is_updating);
        assert!(!state.is_deleting);
        assert!(state.is_submitting);
        assert_eq!(state.primary.label, "Creating...");
        assert!(state.primary.disabled);
        assert!(state.delete.is_none());
    }

    #[test]
    fn idle_existing_post_offers_update_and_delete() {
        let post = post();
        let state = EditorState::derive(Some(&post), None);

        assert!(!state.is_new_post);
        assert!(!state.is_submitting);
        assert_eq!(state.primary.intent_value(), "update");
        assert_eq!(state.primary.label, "Update Post");
        assert!(!state.primary.disabled);

        let delete = state.delete.expect("delete button");
        assert_eq!(delete.label, "Delete Post");
        assert_eq!(delete.pending_label, "Deleting...");
        assert!(delete.danger);
        assert!(!delete.disabled);
    }

    #[test]
    fn pending_delete_disables_update_too() {
        let post = post();
        let state = EditorState::derive(Some(&post), Some(SubmissionIntent::Delete));

        assert!(state.is_deleting);
        assert!(state.primary.disabled);
        assert_eq!(state.primary.label, "Update Post");
        let delete = state.delete.expect("delete button");
        assert!(delete.pending);
        assert_eq!(delete.label, "Deleting...");
    }

    #[test]
    fn at_most_one_pending_flag() {
        let post = post();
        let intents = [
            None,
            Some(SubmissionIntent::Create),
            Some(SubmissionIntent::Update),
            Some(SubmissionIntent::Delete),
        ];
        for loaded in [None, Some(&post)] {
            for pending in intents {
                let state = EditorState::derive(loaded, pending);
                let flags = [state.is_creating, state.is_updating, state.is_deleting];
                let set = flags.iter().filter(|flag| **flag).count();
                assert_eq!(set, usize::from(pending.is_some()));
                assert_eq!(state.is_submitting, pending.is_some());
            }
        }
    }
}
