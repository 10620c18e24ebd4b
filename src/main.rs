//! Artisan Market server binary.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use artisan_market::adapters::gateway::{GatewayConfig, HttpPaymentGateway};
use artisan_market::adapters::http::commission::{commission_router, CommissionAppState};
use artisan_market::adapters::postgres::{
    PostgresAuditLog, PostgresOutstandingReader, PostgresPaymentRequestRepository,
    PostgresProcessedEventStore, PostgresTransactionLedger,
};
use artisan_market::config::AppConfig;
use artisan_market::domain::commission::RateTable;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let gateway = HttpPaymentGateway::new(GatewayConfig::new(
        config.payment.gateway_secret_key.clone(),
        config.payment.gateway_base_url.clone(),
    ));

    let state = CommissionAppState {
        ledger: Arc::new(PostgresTransactionLedger::new(pool.clone())),
        payment_requests: Arc::new(PostgresPaymentRequestRepository::new(pool.clone())),
        gateway: Arc::new(gateway),
        outstanding_reader: Arc::new(PostgresOutstandingReader::new(pool.clone())),
        processed_events: Arc::new(PostgresProcessedEventStore::new(pool.clone())),
        audit_log: Arc::new(PostgresAuditLog::new(pool)),
        webhook_secret: config.payment.webhook_secret.expose_secret().clone(),
        rate_table: RateTable::new(config.commission.rates()),
        overdue_threshold_days: config.commission.overdue_threshold_days,
    };

    let app = Router::new()
        .nest("/api", commission_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "artisan-market listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
