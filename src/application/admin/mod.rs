//! Application services for the administrative surface.

pub mod editor;
pub mod posts;

pub use editor::{EditorButton, EditorState};
pub use posts::{AdminPostError, AdminPostService, SubmissionOutcome};
