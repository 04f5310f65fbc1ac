use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use userhub_config::load as load_config;
use userhub_database::{initialize_database, UserRepository};
use userhub_email::{TemplateContext, TemplateManager};
use userhub_gateway::create_router;
use userhub_runtime::{telemetry, BackendServices};

#[derive(Parser)]
#[command(name = "userhub-backend")]
#[command(about = "UserHub backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the stored users as a table
    ListUsers {
        #[arg(long, default_value_t = 0)]
        skip: i64,
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
    /// Render an email template to stdout
    RenderEmail {
        /// Template name without the `.md` extension
        template: String,
        /// Template variable as `key=value`; may be repeated
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Migrate => migrate().await,
        Commands::ListUsers { skip, limit } => list_users(skip, limit).await,
        Commands::RenderEmail { template, vars } => render_email(&template, vars),
    }
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting UserHub backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let app = create_router(services.app_state());

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, public_base_url = %config.http.public_base_url, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(userhub_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn migrate() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    let pool = initialize_database(&config.database)
        .await
        .context("database migrations failed")?;
    let users = UserRepository::new(pool.clone())
        .count()
        .await
        .context("failed to count users")?;

    info!(url = %config.database.url, users, "database is up to date");
    pool.close().await;
    Ok(())
}

async fn list_users(skip: i64, limit: i64) -> anyhow::Result<()> {
    if skip < 0 || limit < 1 {
        bail!("skip must be >= 0 and limit must be >= 1");
    }

    let config = load_config().context("failed to load configuration")?;
    let pool = initialize_database(&config.database)
        .await
        .context("failed to initialise database")?;
    let repository = UserRepository::new(pool.clone());

    let total = repository.count().await.context("failed to count users")?;
    let users = repository
        .list(skip, limit)
        .await
        .context("failed to fetch users")?;

    println!("=== USERS ({total} total) ===");
    if users.is_empty() {
        println!("No users found in database");
    } else {
        println!(
            "{:<38} {:<25} {:<35} {:<14} {:<9} {:<7} {:<25}",
            "ID", "Nickname", "Email", "Role", "Verified", "Locked", "Created At"
        );
        println!("{}", "-".repeat(158));

        for user in users {
            println!(
                "{:<38} {:<25} {:<35} {:<14} {:<9} {:<7} {:<25}",
                user.id,
                user.nickname,
                user.email,
                user.role,
                user.email_verified,
                user.is_locked,
                user.created_at.to_rfc3339()
            );
        }
    }

    pool.close().await;
    Ok(())
}

fn render_email(template: &str, vars: Vec<(String, String)>) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    let templates = TemplateManager::new(&config.email.templates_dir);
    let context: TemplateContext = vars.into_iter().collect();

    let html = templates
        .render_template(template, &context)
        .with_context(|| format!("failed to render template '{template}'"))?;
    println!("{html}");
    Ok(())
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
