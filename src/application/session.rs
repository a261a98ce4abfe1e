//! Session tokens and admin detection.
//!
//! Tokens look like `qs_<session-id>_<secret>`. Only the SHA-256 hash of the
//! secret is stored; lookups go by session id and the hash is compared in
//! constant time.

use std::sync::Arc;

use metrics::counter;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::application::env::SiteEnv;
use crate::application::repos::{CreateSessionParams, RepoError, SessionsRepo};
use crate::domain::entities::UserRecord;

const TOKEN_PREFIX: &str = "qs";
const MIN_SECRET_LEN: usize = 32;
pub const SESSION_COOKIE: &str = "__session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("invalid email address `{0}`")]
    InvalidEmail(String),
}

/// Who is looking at the page.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub user: Option<UserRecord>,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: UserRecord,
    pub token: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct SessionService {
    repo: Arc<dyn SessionsRepo>,
    env: Arc<SiteEnv>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(repo: Arc<dyn SessionsRepo>, env: Arc<SiteEnv>, ttl: Duration) -> Self {
        Self { repo, env, ttl }
    }

    pub fn is_admin(&self, user: &UserRecord) -> bool {
        user.email == self.env.admin_email()
    }

    /// Resolve the user behind a token; malformed, unknown, or expired tokens
    /// resolve to `None`.
    pub async fn resolve(&self, token: &str) -> Result<Option<UserRecord>, SessionError> {
        let Some(parsed) = parse_token(token) else {
            return Ok(None);
        };

        let Some(found) = self.repo.find_session(parsed.id).await? else {
            return Ok(None);
        };

        if found.session.expires_at <= OffsetDateTime::now_utc() {
            return Ok(None);
        }

        let hashed = hash_secret(&parsed.secret);
        if found.session.token_hash.ct_eq(&hashed).unwrap_u8() == 0 {
            return Ok(None);
        }

        Ok(Some(found.user))
    }

    pub async fn viewer(&self, token: Option<&str>) -> Result<Viewer, SessionError> {
        let user = match token {
            Some(token) => {
                let user = self.resolve(token).await?;
                if user.is_none() {
                    counter!("quire_session_rejections_total").increment(1);
                }
                user
            }
            None => None,
        };
        let is_admin = user.as_ref().is_some_and(|user| self.is_admin(user));
        Ok(Viewer { user, is_admin })
    }

    pub async fn issue(&self, email: &str) -> Result<IssuedSession, SessionError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(SessionError::InvalidEmail(email.to_string()));
        }

        let user = self.repo.upsert_user(email).await?;

        let id = Uuid::new_v4();
        let secret = generate_secret();
        let expires_at = OffsetDateTime::now_utc() + self.ttl;
        self.repo
            .create_session(CreateSessionParams {
                id,
                user_id: user.id,
                token_hash: hash_secret(&secret),
                expires_at,
            })
            .await?;

        Ok(IssuedSession {
            user,
            token: format!("{TOKEN_PREFIX}_{}_{secret}", id.simple()),
            expires_at,
        })
    }

    /// Delete the session behind a token. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parsed) = parse_token(token) {
            self.repo.delete_session(parsed.id).await?;
        }
        Ok(())
    }
}

struct ParsedToken {
    id: Uuid,
    secret: String,
}

fn parse_token(token: &str) -> Option<ParsedToken> {
    let mut parts = token.splitn(3, '_');
    if parts.next()? != TOKEN_PREFIX {
        return None;
    }
    let id = Uuid::parse_str(parts.next()?).ok()?;
    let secret = parts.next()?;
    if secret.len() < MIN_SECRET_LEN {
        return None;
    }
    Some(ParsedToken {
        id,
        secret: secret.to_string(),
    })
}

fn hash_secret(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::application::repos::SessionWithUser;
    use crate::domain::entities::SessionRecord;

    #[derive(Default)]
    struct MemorySessions {
        users: Mutex<Vec<UserRecord>>,
        sessions: Mutex<Vec<SessionRecord>>,
    }

    #[async_trait]
    impl SessionsRepo for MemorySessions {
        async fn find_session(&self, id: Uuid) -> Result<Option<SessionWithUser>, RepoError> {
            let sessions = self.sessions.lock().unwrap();
            let users = self.users.lock().unwrap();
            Ok(sessions.iter().find(|s| s.id == id).and_then(|session| {
                users
                    .iter()
                    .find(|u| u.id == session.user_id)
                    .map(|user| SessionWithUser {
                        session: session.clone(),
                        user: user.clone(),
                    })
            }))
        }

        async fn upsert_user(&self, email: &str) -> Result<UserRecord, RepoError> {
            let mut users = self.users.lock().unwrap();
            if let Some(user) = users.iter().find(|u| u.email == email) {
                return Ok(user.clone());
            }
            let user = UserRecord {
                id: Uuid::new_v4(),
                email: email.to_string(),
                created_at: OffsetDateTime::now_utc(),
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn create_session(
            &self,
            params: CreateSessionParams,
        ) -> Result<SessionRecord, RepoError> {
            let record = SessionRecord {
                id: params.id,
                user_id: params.user_id,
                token_hash: params.token_hash,
                created_at: OffsetDateTime::now_utc(),
                expires_at: params.expires_at,
            };
            self.sessions.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn delete_session(&self, id: Uuid) -> Result<(), RepoError> {
            self.sessions.lock().unwrap().retain(|s| s.id != id);
            Ok(())
        }
    }

    fn service(ttl: Duration) -> SessionService {
        SessionService::new(
            Arc::new(MemorySessions::default()),
            Arc::new(SiteEnv::new("admin@example.com")),
            ttl,
        )
    }

    #[tokio::test]
    async fn issued_token_resolves_to_user() {
        let service = service(Duration::hours(1));
        let issued = service.issue("admin@example.com").await.expect("issue");

        let viewer = service.viewer(Some(&issued.token)).await.expect("viewer");
        assert_eq!(
            viewer.user.map(|u| u.email).as_deref(),
            Some("admin@example.com")
        );
        assert!(viewer.is_admin);
    }

    #[tokio::test]
    async fn non_admin_users_are_not_admin() {
        let service = service(Duration::hours(1));
        let issued = service.issue("reader@example.com").await.expect("issue");

        let viewer = service.viewer(Some(&issued.token)).await.expect("viewer");
        assert!(viewer.user.is_some());
        assert!(!viewer.is_admin);
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() {
        let service = service(Duration::hours(1));
        let issued = service.issue("admin@example.com").await.expect("issue");
        let mut tampered = issued.token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(service.resolve(&tampered).await.expect("resolve").is_none());
        assert!(service.resolve("garbage").await.expect("resolve").is_none());
    }

    #[tokio::test]
    async fn expired_sessions_resolve_to_nobody() {
        let service = service(Duration::seconds(-1));
        let issued = service.issue("admin@example.com").await.expect("issue");
        assert!(service.resolve(&issued.token).await.expect("resolve").is_none());
    }

    #[tokio::test]
    async fn revoked_sessions_resolve_to_nobody() {
        let service = service(Duration::hours(1));
        let issued = service.issue("admin@example.com").await.expect("issue");
        service.revoke(&issued.token).await.expect("revoke");
        assert!(service.resolve(&issued.token).await.expect("resolve").is_none());
    }

    #[tokio::test]
    async fn issue_rejects_blank_email() {
        let service = service(Duration::hours(1));
        assert!(matches!(
            service.issue("  ").await,
            Err(SessionError::InvalidEmail(_))
        ));
    }
}
