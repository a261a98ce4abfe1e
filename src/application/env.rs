//! Environment values resolved once at startup and shared by reference.

use quire_api_types::PublicEnvPayload;

use crate::config::Settings;

/// Immutable environment handed to every component that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEnv {
    admin_email: String,
}

impl SiteEnv {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.admin.email.clone())
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Values that are safe to ship to the browser as `window.ENV`.
    pub fn public(&self) -> PublicEnvPayload {
        PublicEnvPayload {
            admin_email: self.admin_email.clone(),
        }
    }

    /// JSON for an inline `<script>` block; `</` is escaped so a value can
    /// never close the surrounding tag.
    pub fn public_script_json(&self) -> String {
        serde_json::to_string(&self.public())
            .unwrap_or_else(|_| "{}".to_string())
            .replace("</", "<\\/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_env_uses_upper_case_keys() {
        let env = SiteEnv::new("admin@example.com");
        assert_eq!(
            env.public_script_json(),
            r#"{"ADMIN_EMAIL":"admin@example.com"}"#
        );
    }

    #[test]
    fn script_json_cannot_close_the_script_tag() {
        let env = SiteEnv::new("</script><script>alert(1)</script>");
        let json = env.public_script_json();
        assert!(!json.contains("</script>"), "{json}");
    }
}
