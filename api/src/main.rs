use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use wr_api::app::create_app;
use wr_api::routes::worklogs::AppState;
use wr_core::services::SettlementOrchestrator;
use wr_infra::{
    DatabasePool, LoggingNotifier, MySqlAuditLogRepository, MySqlUserRepository,
    MySqlWorklogRepository,
};
use wr_shared::config::LogFormat;
use wr_shared::{AppConfig, LoggingConfig};

fn init_tracing(logging: &LoggingConfig) {
    // RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(logging.colored)
        .with_target(true);

    match logging.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (reads .env first)
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        "Starting WorkRemit settlement API"
    );

    // Initialize database connections
    let db_pool = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to database")?;

    if !db_pool.health_check().await? {
        anyhow::bail!("database health check failed");
    }
    tracing::info!("{}", db_pool.get_statistics());

    if config.database.run_migrations {
        db_pool
            .run_migrations()
            .await
            .context("failed to run database migrations")?;
    }

    let pool = db_pool.get_pool().clone();

    // Create repository implementations
    let worklog_repo = Arc::new(MySqlWorklogRepository::new(pool.clone()));
    let audit_repo = Arc::new(MySqlAuditLogRepository::new(pool.clone()));
    let user_repo = Arc::new(MySqlUserRepository::new(pool));
    let notifier = Arc::new(LoggingNotifier::new());

    let orchestrator = Arc::new(SettlementOrchestrator::new(
        worklog_repo,
        audit_repo,
        user_repo,
        notifier,
        config.settlement.clone(),
    ));

    let app_state = web::Data::new(AppState::new(orchestrator));

    let bind_address = config.server.bind_address();
    let max_payload_size = config.server.max_payload_size;
    tracing::info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), max_payload_size).wrap(TracingLogger::default())
    })
    .keep_alive(Duration::from_secs(config.server.keep_alive));

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    tracing::info!("Server stopped, closing database pool");
    db_pool.close().await;

    Ok(())
}
