use std::sync::Arc;

use crate::application::{
    admin::AdminPostService, env::SiteEnv, posts::PostService, repos::HealthRepo,
    session::SessionService,
};

/// Shared handles for every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub env: Arc<SiteEnv>,
    pub posts: Arc<PostService>,
    pub admin_posts: Arc<AdminPostService>,
    pub sessions: Arc<SessionService>,
    pub health: Arc<dyn HealthRepo>,
    pub session_cookie: Arc<str>,
}
