//! Test plan for the `userhub-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and validation behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use userhub_config::{load, AppConfig, AuthConfig, EmailConfig, HttpConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "USERHUB_CONFIG",
    "USERHUB__AUTH__JWT_SECRET",
    "USERHUB__AUTH__JWT_ISSUER",
    "USERHUB__AUTH__ACCESS_TOKEN_TTL_MINUTES",
    "USERHUB__AUTH__MAX_LOGIN_ATTEMPTS",
    "USERHUB__DATABASE__MAX_CONNECTIONS",
    "USERHUB__DATABASE__URL",
    "USERHUB__EMAIL__SENDER",
    "USERHUB__EMAIL__TEMPLATES_DIR",
    "USERHUB__HTTP__ADDRESS",
    "USERHUB__HTTP__PORT",
    "USERHUB__HTTP__PUBLIC_BASE_URL",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

fn isolated() -> (TempDir, TestContext) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let (_temp_dir, _ctx) = isolated();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.http.public_base_url, defaults.http.public_base_url);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(
        config.database.max_connections,
        defaults.database.max_connections
    );
    assert_eq!(config.auth.jwt_issuer, defaults.auth.jwt_issuer);
    assert_eq!(config.auth.max_login_attempts, defaults.auth.max_login_attempts);
    assert_eq!(config.email.templates_dir, defaults.email.templates_dir);
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "userhub.toml",
        r#"
        [http]
        port = 4242
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/userhub.toml",
        r#"
        [http]
        port = 5151
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "userhub.toml",
        r#"
        [auth]
        max_login_attempts = 5

        [email]
        templates_dir = "/srv/userhub/templates"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.auth.max_login_attempts, 5);
    assert_eq!(config.auth.jwt_secret, defaults.auth.jwt_secret);
    assert_eq!(config.email.templates_dir, "/srv/userhub/templates");
    assert_eq!(config.email.sender, defaults.email.sender);
    assert_eq!(config.http.port, defaults.http.port);
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "userhub.toml",
        r#"
        [http]
        port = 3030
        "#,
    );

    ctx.set_var("USERHUB__HTTP__PORT", "8080");
    ctx.set_var("USERHUB__AUTH__JWT_SECRET", "from-the-environment");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.auth.jwt_secret, "from-the-environment");
}

#[test]
#[serial]
fn load_reads_explicit_config_path() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "elsewhere/custom.toml",
        r#"
        [database]
        url = "sqlite://custom.db"
        max_connections = 2
        "#,
    );
    let path = temp_dir.path().join("elsewhere/custom.toml");
    ctx.set_var("USERHUB_CONFIG", path.display().to_string());

    let config = load().expect("explicit config path should load");
    assert_eq!(config.database.url, "sqlite://custom.db");
    assert_eq!(config.database.max_connections, 2);
}

#[test]
#[serial]
fn load_rejects_zero_login_attempts() {
    let (_temp_dir, mut ctx) = isolated();

    ctx.set_var("USERHUB__AUTH__MAX_LOGIN_ATTEMPTS", "0");

    let error = load().expect_err("zero login attempts should be rejected");
    assert!(error.to_string().contains("max_login_attempts"));
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "userhub.toml",
        r#"
        [http]
        port = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn auth_config_defaults() {
    let defaults = AuthConfig::default();
    assert_eq!(defaults.jwt_issuer, "userhub");
    assert_eq!(defaults.access_token_ttl_minutes, 30);
    assert_eq!(defaults.max_login_attempts, 3);
}

#[test]
fn email_config_defaults_point_at_bundled_templates() {
    let defaults = EmailConfig::default();
    assert_eq!(defaults.templates_dir, "email_templates");
    assert!(defaults.sender.contains('@'));
}

#[test]
fn http_config_defaults_match_expected_host_and_port() {
    let defaults = HttpConfig::default();
    assert_eq!(defaults.address, "127.0.0.1");
    assert_eq!(defaults.port, 7070);
    assert_eq!(defaults.public_base_url, "http://localhost:7070");
}
