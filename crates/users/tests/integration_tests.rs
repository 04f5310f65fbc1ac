//! Integration tests for the users crate with a real database

use std::sync::Arc;

use tempfile::TempDir;
use userhub_config::{AuthConfig, DatabaseConfig};
use userhub_database::initialize_database;
use userhub_email::{EmailService, MemoryMailer, TemplateManager};
use userhub_users::{JwtManager, UserCreate, UserError, UserRole, UserService, UserUpdate};

const PASSWORD: &str = "SecurePassword123!";

struct TestContext {
    service: UserService<userhub_users::UserRepository>,
    mailer: Arc<MemoryMailer>,
    _temp_dir: TempDir,
}

async fn create_test_service() -> TestContext {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", temp_dir.path().join("test_users.db").display()),
        max_connections: 2,
    };
    let pool = initialize_database(&config).await.unwrap();

    let templates = TemplateManager::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../email_templates"));
    let mailer = Arc::new(MemoryMailer::new());
    let email_service = Arc::new(EmailService::new(templates, mailer.clone(), "http://localhost:7070"));

    TestContext {
        service: UserService::from_pool(pool, email_service, 3),
        mailer,
        _temp_dir: temp_dir,
    }
}

#[tokio::test]
async fn test_user_lifecycle() {
    let ctx = create_test_service().await;
    let service = &ctx.service;

    let admin = service
        .create(UserCreate::new("admin@example.com", PASSWORD).with_nickname("admin_user"))
        .await
        .unwrap();
    assert_eq!(admin.role, UserRole::Admin);

    let user = service
        .register(UserCreate::new("john.doe@example.com", PASSWORD))
        .await
        .unwrap();
    assert_eq!(user.role, UserRole::Anonymous);

    let fetched = service.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.email, "john.doe@example.com");
    assert_eq!(
        service.get_by_nickname(&user.nickname).await.unwrap().map(|u| u.id),
        Some(user.id)
    );

    let updated = service
        .update(
            user.id,
            UserUpdate {
                first_name: Some("John".into()),
                github_profile_url: Some("https://github.com/johndoe".into()),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name.as_deref(), Some("John"));
    assert_eq!(
        updated.github_profile_url.as_deref(),
        Some("https://github.com/johndoe")
    );

    assert_eq!(service.count().await.unwrap(), 2);
    assert_eq!(service.list(0, 10).await.unwrap().len(), 2);
    assert_eq!(service.list(1, 10).await.unwrap().len(), 1);

    service.delete(user.id).await.unwrap();
    assert!(matches!(
        service.get_by_id(user.id).await,
        Err(UserError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_verification_email_and_login_flow() {
    let ctx = create_test_service().await;
    let service = &ctx.service;

    service
        .create(UserCreate::new("admin@example.com", PASSWORD))
        .await
        .unwrap();
    let user = service
        .register(UserCreate::new("jane@example.com", PASSWORD))
        .await
        .unwrap();

    assert!(matches!(
        service.login("jane@example.com", PASSWORD).await,
        Err(UserError::InvalidCredentials)
    ));

    let sent = ctx.mailer.sent_to("jane@example.com").await;
    assert_eq!(sent.len(), 1);
    let token = user.verification_token.clone().unwrap();
    assert!(sent[0].html_body.contains(&format!(
        "http://localhost:7070/verify-email/{}/{}",
        user.id, token
    )));

    let verified = service.verify_email(user.id, &token).await.unwrap();
    assert_eq!(verified.role, UserRole::Authenticated);

    let logged_in = service.login("jane@example.com", PASSWORD).await.unwrap();
    let jwt = JwtManager::from_config(&AuthConfig::default());
    let claims = jwt.validate_token(&jwt.generate_token(&logged_in).unwrap()).unwrap();
    assert_eq!(claims.sub, "jane@example.com");
    assert_eq!(claims.role(), Some(UserRole::Authenticated));
}

#[tokio::test]
async fn test_account_lockout_persists() {
    let ctx = create_test_service().await;
    let service = &ctx.service;

    let admin = service
        .create(UserCreate::new("admin@example.com", PASSWORD))
        .await
        .unwrap();

    for _ in 0..3 {
        let _ = service.login("admin@example.com", "WrongPassword9").await;
    }

    let stored = service.get_by_id(admin.id).await.unwrap();
    assert!(stored.is_locked);
    assert_eq!(stored.failed_login_attempts, 3);
    assert!(matches!(
        service.login("admin@example.com", PASSWORD).await,
        Err(UserError::AccountLocked)
    ));

    let sent = ctx.mailer.sent_to("admin@example.com").await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Account Locked Notification");
}

#[tokio::test]
async fn test_duplicate_detection_on_update() {
    let ctx = create_test_service().await;
    let service = &ctx.service;

    service
        .create(UserCreate::new("first@example.com", PASSWORD).with_nickname("first"))
        .await
        .unwrap();
    let second = service
        .create(UserCreate::new("second@example.com", PASSWORD).with_nickname("second"))
        .await
        .unwrap();

    let err = service
        .update(
            second.id,
            UserUpdate {
                email: Some("first@example.com".into()),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::EmailAlreadyExists));

    let err = service
        .update(
            second.id,
            UserUpdate {
                nickname: Some("first".into()),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::NicknameAlreadyExists));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_registrations_create_one_admin() {
    let ctx = create_test_service().await;
    let service = Arc::new(ctx.service);

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .register(UserCreate::new(format!("racer{i}@example.com"), PASSWORD))
                    .await
            })
        })
        .collect();

    let mut roles = Vec::new();
    for task in tasks {
        roles.push(task.await.unwrap().unwrap().role);
    }

    assert_eq!(roles.iter().filter(|role| **role == UserRole::Admin).count(), 1);
    assert_eq!(service.count().await.unwrap(), 4);
    assert_eq!(ctx.mailer.sent().await.len(), 3);
}
