use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use userhub_config::AppConfig;
use userhub_database::{initialize_database, SqlitePool};
use userhub_email::{EmailService, LogMailer, Mailer, TemplateManager};
use userhub_gateway::AppState;
use userhub_users::{JwtManager, UserRepository, UserService};

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub email_service: Arc<EmailService>,
    pub user_service: Arc<UserService<UserRepository>>,
    pub jwt: JwtManager,
    pub public_base_url: String,
}

impl BackendServices {
    /// Wire every service with a mailer that logs outgoing messages.
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let mailer = Arc::new(LogMailer::new(config.email.sender.clone()));
        Self::initialise_with_mailer(config, mailer).await
    }

    pub async fn initialise_with_mailer(config: &AppConfig, mailer: Arc<dyn Mailer>) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;
        info!(url = %config.database.url, "database ready");

        let templates_dir = Path::new(&config.email.templates_dir);
        if !templates_dir.is_dir() {
            warn!(
                templates_dir = %templates_dir.display(),
                "email template directory not found; emails will fail to render"
            );
        }

        let email_service = Arc::new(EmailService::new(
            TemplateManager::new(templates_dir),
            mailer,
            config.http.public_base_url.clone(),
        ));
        let user_service = Arc::new(UserService::from_pool(
            db_pool.clone(),
            Arc::clone(&email_service),
            config.auth.max_login_attempts,
        ));

        Ok(Self {
            db_pool,
            email_service,
            user_service,
            jwt: JwtManager::from_config(&config.auth),
            public_base_url: config.http.public_base_url.clone(),
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(
            Arc::clone(&self.user_service),
            self.jwt.clone(),
            self.public_base_url.clone(),
        )
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
