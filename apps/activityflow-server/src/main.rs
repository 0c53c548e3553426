mod auth;
mod cli;
mod config;
mod error;
mod handlers;
mod routes;
mod services;
mod state;
mod validation;

use std::io;
use std::net::SocketAddr;

use activityflow_db::{init_db, seed::DEMO_PASSWORD};
use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::AppConfig;
use services::password::PasswordHasher;
pub use state::AppState;

#[derive(Parser)]
#[command(name = "activityflow-server")]
#[command(about = "ActivityFlow REST API server", long_about = None)]
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
    /// Insert roles and statuses, optionally demo data
    Seed {
        /// Also create demo users, categories and activities
        #[arg(long)]
        demo: bool,
    },
    /// Administrative tools
    Admin {
        #[command(subcommand)]
        subcommand: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Set a new password for a user
    ResetPassword {
        /// Email of the account
        email: String,
        /// New password
        password: String,
    },
    /// Add a role to a user
    GrantRole {
        email: String,
        /// User, Manager or Admin
        role: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();

    let file_appender = tracing_appender::rolling::never(".", "server.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "activityflow_server=debug,activityflow_db=debug,tower_http=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let config = AppConfig::load()?;
    let pool = init_db(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database initialized");

    let hasher = PasswordHasher::new(config.bcrypt_cost);
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            seed(&pool, hasher, config.seed_demo_data).await?;
            run_server(pool, config).await?;
        }
        Commands::Migrate => {
            // init_db has already applied them
            println!("Migrations are up to date.");
        }
        Commands::Seed { demo } => {
            seed(&pool, hasher, demo || config.seed_demo_data).await?;
            println!("Seed completed.");
        }
        Commands::Admin { subcommand } => match subcommand {
            AdminCommands::ResetPassword { email, password } => {
                cli::reset_password(&pool, hasher, &email, &password).await?;
            }
            AdminCommands::GrantRole { email, role } => {
                cli::grant_role(&pool, &email, &role).await?;
            }
        },
    }

    Ok(())
}

async fn seed(pool: &PgPool, hasher: PasswordHasher, demo: bool) -> Result<()> {
    let demo_hash = if demo { Some(hasher.hash(DEMO_PASSWORD)?) } else { None };
    activityflow_db::seed(pool, demo_hash.as_deref()).await
}

async fn run_server(pool: PgPool, config: AppConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let app = routes::build_router(AppState::new(pool, config));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown requested");
}
