//! Cheque book reorder API server binary.
//!
//! Connects the Postgres pool, applies migrations and serves the REST API
//! until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use chequebook_api::config::{ApiConfig, AppMode};
use chequebook_core::auth::jwt::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, resolve_jwt_secret};
use chequebook_core::store::PgStore;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,chequebook_api=debug,chequebook_core=debug";

/// CLI arguments for the API server. Every flag can also come from the environment.
#[derive(Parser, Debug)]
#[command(name = "chequebook_api_server", about = "Cheque book reorder API server")]
struct Args {
    /// Port to listen on; ignored when `--bind-addr` is given.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Full listen address, e.g. `127.0.0.1:8080`.
    #[arg(long, env = "BIND_ADDR")]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/chequebook"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    /// Connections kept open while idle.
    #[arg(long, env = "DB_MIN_CONNECTIONS", default_value_t = 2)]
    min_connections: u32,

    /// Seconds to wait for a pooled connection before failing the request.
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 60)]
    acquire_timeout_secs: u64,

    /// Session token signing secret. Falls back to `SECRET`, then to a
    /// generated secret persisted in the data directory.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Session token lifetime in seconds, at most one year.
    #[arg(
        long,
        env = "TOKEN_TTL_SECS",
        default_value_t = DEFAULT_TOKEN_TTL_SECS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_SECS)
    )]
    token_ttl_secs: i64,

    /// `production` hides debug error detail in responses.
    #[arg(long, env = "APP_MODE", default_value = "development")]
    app_mode: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let app_mode = AppMode::parse(&args.app_mode);

    info!(port = args.port, ?app_mode, "starting chequebook_api_server");

    info!(
        max_connections = args.max_connections,
        min_connections = args.min_connections,
        acquire_timeout_secs = args.acquire_timeout_secs,
        "configuring connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .min_connections(args.min_connections.min(args.max_connections))
        .acquire_timeout(Duration::from_secs(args.acquire_timeout_secs))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    chequebook_api::migrate(&pool).await?;

    let config = ApiConfig {
        bind_addr: args
            .bind_addr
            .unwrap_or_else(|| format!("0.0.0.0:{}", args.port)),
        jwt_secret: args
            .jwt_secret
            .filter(|s| !s.is_empty())
            .unwrap_or_else(resolve_jwt_secret),
        token_ttl_secs: args.token_ttl_secs,
        app_mode,
    };

    let state = chequebook_api::AppState {
        store: Arc::new(PgStore::new(pool.clone())),
        config: config.clone(),
    };

    let app = chequebook_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("closing database pool");
    pool.close().await;
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received, draining requests");
}
