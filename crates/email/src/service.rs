//! Email service
//!
//! Maps an email type to its template and subject, renders it for a user and
//! hands the message to the configured [`Mailer`].

use crate::error::{EmailError, EmailResult};
use crate::mailer::{EmailMessage, Mailer};
use crate::template_manager::{TemplateContext, TemplateManager};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use userhub_database::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailType {
    EmailVerification,
    PasswordReset,
    AccountLocked,
}

impl EmailType {
    pub fn template_name(&self) -> &'static str {
        match self {
            EmailType::EmailVerification => "email_verification",
            EmailType::PasswordReset => "password_reset",
            EmailType::AccountLocked => "account_locked",
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            EmailType::EmailVerification => "Verify Your Account",
            EmailType::PasswordReset => "Password Reset Instructions",
            EmailType::AccountLocked => "Account Locked Notification",
        }
    }
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name())
    }
}

impl FromStr for EmailType {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email_verification" => Ok(EmailType::EmailVerification),
            "password_reset" => Ok(EmailType::PasswordReset),
            "account_locked" => Ok(EmailType::AccountLocked),
            other => Err(EmailError::UnknownEmailType(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct EmailService {
    templates: TemplateManager,
    mailer: Arc<dyn Mailer>,
    server_base_url: String,
}

impl EmailService {
    pub fn new(
        templates: TemplateManager,
        mailer: Arc<dyn Mailer>,
        server_base_url: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            mailer,
            server_base_url: server_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn templates(&self) -> &TemplateManager {
        &self.templates
    }

    /// Render `email_type` with `data` and send it to `data["email"]`.
    pub async fn send_user_email(&self, data: &TemplateContext, email_type: &str) -> EmailResult<()> {
        let email_type = email_type.parse::<EmailType>()?;
        let to = data
            .get("email")
            .ok_or_else(|| EmailError::MissingVariable("email".to_string()))?;

        let html_body = self.templates.render_template(email_type.template_name(), data)?;
        let message = EmailMessage {
            to: to.to_string(),
            subject: email_type.subject().to_string(),
            html_body,
        };

        self.mailer.send(&message).await?;
        info!(to = %message.to, email_type = %email_type, "sent user email");
        Ok(())
    }

    pub fn verification_url(&self, user: &User, token: &str) -> String {
        format!("{}/verify-email/{}/{}", self.server_base_url, user.id, token)
    }

    pub async fn send_verification_email(&self, user: &User) -> EmailResult<()> {
        let token = user
            .verification_token
            .as_deref()
            .ok_or_else(|| EmailError::MissingVariable("verification_token".to_string()))?;

        let context = base_context(user).with("verification_url", self.verification_url(user, token));
        self.send_user_email(&context, EmailType::EmailVerification.template_name())
            .await
    }

    pub async fn send_account_locked_email(&self, user: &User) -> EmailResult<()> {
        self.send_user_email(&base_context(user), EmailType::AccountLocked.template_name())
            .await
    }

    pub async fn send_password_reset_email(&self, user: &User, reset_url: &str) -> EmailResult<()> {
        let context = base_context(user).with("reset_url", reset_url);
        self.send_user_email(&context, EmailType::PasswordReset.template_name())
            .await
    }
}

fn base_context(user: &User) -> TemplateContext {
    let name = user.first_name.as_deref().unwrap_or(&user.nickname);
    TemplateContext::new()
        .with("name", name)
        .with("nickname", user.nickname.as_str())
        .with("email", user.email.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MemoryMailer;
    use crate::template_manager::StaticTemplateSource;

    fn service() -> (EmailService, Arc<MemoryMailer>) {
        let templates = TemplateManager::with_source(
            StaticTemplateSource::new()
                .with("header.md", "UserHub")
                .with("footer.md", "Thanks")
                .with("email_verification.md", "Hi {name}, [verify]({verification_url})")
                .with("account_locked.md", "Hi {name}, your account is locked.")
                .with("password_reset.md", "Hi {name}, [reset]({reset_url})"),
        );
        let mailer = Arc::new(MemoryMailer::new());
        let service = EmailService::new(templates, mailer.clone(), "http://localhost:7070/");
        (service, mailer)
    }

    fn user() -> User {
        let mut user = User::new(
            "jane@example.com".to_string(),
            "jane_doe".to_string(),
            "hash".to_string(),
        );
        user.first_name = Some("Jane".to_string());
        user.verification_token = Some("tok123".to_string());
        user
    }

    #[test]
    fn email_types_map_to_subjects() {
        assert_eq!(
            "email_verification".parse::<EmailType>().unwrap().subject(),
            "Verify Your Account"
        );
        assert_eq!(
            "password_reset".parse::<EmailType>().unwrap().subject(),
            "Password Reset Instructions"
        );
        assert_eq!(
            "account_locked".parse::<EmailType>().unwrap().subject(),
            "Account Locked Notification"
        );
    }

    #[tokio::test]
    async fn unknown_email_type_is_rejected() {
        let (service, mailer) = service();
        let data = TemplateContext::new().with("email", "x@example.com");

        let err = service.send_user_email(&data, "newsletter").await.unwrap_err();
        assert!(matches!(err, EmailError::UnknownEmailType(kind) if kind == "newsletter"));
        assert!(mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn verification_email_contains_link() {
        let (service, mailer) = service();
        let user = user();

        service.send_verification_email(&user).await.unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");
        assert_eq!(sent[0].subject, "Verify Your Account");
        let expected = format!("http://localhost:7070/verify-email/{}/tok123", user.id);
        assert!(sent[0].html_body.contains(&expected));
        assert!(sent[0].html_body.contains("Hi Jane"));
    }

    #[tokio::test]
    async fn verification_email_requires_token() {
        let (service, _mailer) = service();
        let mut user = user();
        user.verification_token = None;

        let err = service.send_verification_email(&user).await.unwrap_err();
        assert!(matches!(err, EmailError::MissingVariable(_)));
    }

    #[tokio::test]
    async fn account_locked_email_falls_back_to_nickname() {
        let (service, mailer) = service();
        let mut user = user();
        user.first_name = None;

        service.send_account_locked_email(&user).await.unwrap();

        let sent = mailer.sent_to("jane@example.com").await;
        assert_eq!(sent[0].subject, "Account Locked Notification");
        assert!(sent[0].html_body.contains("Hi jane_doe"));
    }
}
