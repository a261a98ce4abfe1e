use crate::domain::entities::{PostListItem, PostRecord};
use crate::domain::error::DomainError;
use crate::domain::posts::EditorRoute;

use super::service::AdminPostService;
use super::types::AdminPostError;

impl AdminPostService {
    pub async fn list_items(&self) -> Result<Vec<PostListItem>, AdminPostError> {
        self.reader.list_items().await.map_err(AdminPostError::from)
    }

    /// Post shown in the editor; `None` means new-post mode.
    pub async fn load_editor(
        &self,
        route: &EditorRoute,
    ) -> Result<Option<PostRecord>, AdminPostError> {
        let Some(slug) = route.slug() else {
            return Ok(None);
        };

        match self.reader.find_by_slug(slug).await? {
            Some(post) => Ok(Some(post)),
            None => Err(DomainError::not_found("post", slug).into()),
        }
    }
}
