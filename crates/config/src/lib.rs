use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "userhub.toml",
    "config/userhub.toml",
    "crates/config/userhub.toml",
    "../userhub.toml",
    "../config/userhub.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
    /// Base URL used when building links and verification URLs.
    #[serde(default = "HttpConfig::default_public_base_url")]
    pub public_base_url: String,
}

impl HttpConfig {
    fn default_public_base_url() -> String {
        "http://localhost:7070".to_string()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
            public_base_url: Self::default_public_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://userhub.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Token signing and login lockout settings.
///
/// ```
/// use userhub_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.max_login_attempts, 3);
/// assert_eq!(auth.access_token_ttl_minutes, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "AuthConfig::default_issuer")]
    pub jwt_issuer: String,
    #[serde(default = "AuthConfig::default_access_token_ttl")]
    pub access_token_ttl_minutes: u64,
    #[serde(default = "AuthConfig::default_max_login_attempts")]
    pub max_login_attempts: u32,
}

impl AuthConfig {
    fn default_issuer() -> String {
        "userhub".to_string()
    }

    const fn default_access_token_ttl() -> u64 {
        30
    }

    const fn default_max_login_attempts() -> u32 {
        3
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: Self::default_issuer(),
            access_token_ttl_minutes: Self::default_access_token_ttl(),
            max_login_attempts: Self::default_max_login_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub templates_dir: String,
    pub sender: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            templates_dir: "email_templates".to_string(),
            sender: "no-reply@userhub.local".to_string(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use userhub_config::load;
///
/// std::env::remove_var("USERHUB_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("http.public_base_url", defaults.http.public_base_url.clone())?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.jwt_secret", defaults.auth.jwt_secret.clone())?
        .set_default("auth.jwt_issuer", defaults.auth.jwt_issuer.clone())?
        .set_default(
            "auth.access_token_ttl_minutes",
            i64::try_from(defaults.auth.access_token_ttl_minutes).unwrap_or(i64::MAX),
        )?
        .set_default(
            "auth.max_login_attempts",
            i64::from(defaults.auth.max_login_attempts),
        )?
        .set_default("email.templates_dir", defaults.email.templates_dir.clone())?
        .set_default("email.sender", defaults.email.sender.clone())?;

    let environment_overrides = config::Environment::with_prefix("USERHUB")
        .separator("__")
        .try_parsing(true);

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("USERHUB_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via USERHUB_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.max_login_attempts == 0 {
        anyhow::bail!("auth.max_login_attempts must be at least 1");
    }

    debug!(
        http.address = %config.http.address,
        http.port = config.http.port,
        database.url = %config.database.url,
        email.templates_dir = %config.email.templates_dir,
        "loaded backend configuration"
    );
    Ok(config)
}
