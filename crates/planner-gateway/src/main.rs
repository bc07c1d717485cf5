use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use planner_core::PlannerConfig;
use planner_gateway::{app, db};
use planner_schedule::{ScheduleEngine, SqliteEntryStore};
use planner_users::UserDirectory;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "planner-gateway", version, about = "TeamPlanner HTTP server")]
struct Args {
    /// Path to planner.toml (falls back to $PLANNER_CONFIG, then ./planner.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // load config: --config > PLANNER_CONFIG env > ./planner.toml
    let config_path = args.config.or_else(|| std::env::var("PLANNER_CONFIG").ok());
    let loaded = PlannerConfig::load(config_path.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let default_filter = if config.is_local() {
        "planner_gateway=info,planner_schedule=info,planner_users=info,tower_http=debug"
    } else {
        "planner_gateway=info,planner_schedule=info,planner_users=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    if let Err(e) = loaded {
        tracing::warn!("Config load failed ({}), using defaults", e);
    }

    let db_path = config.database.path.clone();
    info!(path = %db_path, environment = %config.environment, "opening SQLite database");
    db::init_with_retry(
        &db_path,
        config.database.init_attempts,
        Duration::from_millis(config.database.init_retry_delay_ms),
    )
    .await?;

    // each subsystem gets its own connection
    let users = UserDirectory::new(Arc::new(Mutex::new(db::connect(&db_path)?)));
    let schedule = ScheduleEngine::new(SqliteEntryStore::new(Arc::new(Mutex::new(
        db::connect(&db_path)?,
    ))));

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let app_name = config.app_name.clone();
    let state = Arc::new(app::AppState::new(config, users, schedule));
    let router = app::build_router(state);

    info!("{} listening on {}", app_name, addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
