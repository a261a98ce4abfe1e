use metrics::counter;
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::posts::{EditorRoute, PostSubmission, SubmissionIntent};

use super::service::AdminPostService;
use super::types::{ADMIN_POSTS_PATH, AdminPostError, SubmissionOutcome};

const MUTATIONS_COUNTER: &str = "quire_post_mutations_total";

impl AdminPostService {
    /// Apply one editor submission.
    ///
    /// Delete acts on the route slug and skips field validation. Create and
    /// update validate the submitted fields first; an invalid submission
    /// returns the field errors and touches nothing.
    pub async fn submit(
        &self,
        route: &EditorRoute,
        submission: PostSubmission,
    ) -> Result<SubmissionOutcome, AdminPostError> {
        let intent = submission.intent();

        match submission {
            PostSubmission::Delete => {
                let slug = route.slug().ok_or_else(|| {
                    DomainError::invariant("delete requires an existing post route")
                })?;
                self.writer.delete_post(slug).await?;
                info!(target: "quire::admin::posts", slug, "post deleted");
            }
            PostSubmission::Create(fields) => {
                let draft = match fields.validate() {
                    Ok(draft) => draft,
                    Err(errors) => return Ok(SubmissionOutcome::Invalid(errors)),
                };
                let post = self.writer.create_post(draft).await?;
                info!(target: "quire::admin::posts", slug = %post.slug, "post created");
            }
            PostSubmission::Update(fields) => {
                let draft = match fields.validate() {
                    Ok(draft) => draft,
                    Err(errors) => return Ok(SubmissionOutcome::Invalid(errors)),
                };
                let post = self.writer.update_post(draft).await?;
                info!(target: "quire::admin::posts", slug = %post.slug, "post updated");
            }
        }

        record_mutation(intent);
        Ok(SubmissionOutcome::Redirect(ADMIN_POSTS_PATH))
    }
}

fn record_mutation(intent: SubmissionIntent) {
    counter!(MUTATIONS_COUNTER, "intent" => intent.as_str()).increment(1);
}
