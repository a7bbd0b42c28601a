//! API server binary
//!
//! Starts the HTTP server over the claim processing pipeline, wired with
//! the reference providers and in-process stores.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin instaclaim-api
//!
//! # Run with environment overrides
//! INSTACLAIM_PORT=9090 INSTACLAIM_PIPELINE__PROVIDER_TIMEOUT_MS=200 \
//!     cargo run --bin instaclaim-api
//! ```
//!
//! # Environment Variables
//!
//! * `INSTACLAIM_HOST` - Server host (default: 0.0.0.0)
//! * `INSTACLAIM_PORT` - Server port (default: 8080)
//! * `INSTACLAIM_LOG_LEVEL` - Log level: trace, debug, info, warn, error
//! * `INSTACLAIM_PIPELINE__*` - Pipeline tunables, e.g.
//!   `INSTACLAIM_PIPELINE__PROVIDER_TIMEOUT_MS`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claims_pipeline::dispatch::reference::{
    LoggingAdjusterQueue, LoggingNotificationSender, LoggingPayoutExecutor, TracingAuditSink,
};
use claims_pipeline::{
    ActionDispatcher, CachedPolicyStore, ClaimsPipeline, DuplicateClaimDetector,
    InMemoryDuplicateIndex, InMemoryOutcomeLedger, InMemoryPolicyPort,
};
use core_kernel::{Currency, Money, PolicyId};
use domain_claims::{ClaimType, PolicySnapshot, PolicyStatus};
use interface_api::{config::ApiConfig, create_router};
use risk_engine::{default_registry, EnsembleEngine, ScoringOrchestrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().unwrap_or_default();
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting claims API server"
    );

    let pipeline = build_pipeline(&config).await;
    let app = create_router(pipeline, config.clone());

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wires the pipeline with the reference providers and in-process stores
///
/// A demo policy covering every claim type is seeded so the service is
/// exercisable out of the box; real deployments register a policy port
/// backed by the policy system of record.
async fn build_pipeline(config: &ApiConfig) -> Arc<ClaimsPipeline> {
    let policy_port = Arc::new(InMemoryPolicyPort::new());
    policy_port.seed(demo_policy()).await;

    let registry = Arc::new(default_registry());
    let orchestrator = ScoringOrchestrator::new(registry)
        .with_provider_timeout(config.pipeline.provider_timeout());

    let index = InMemoryDuplicateIndex::new(
        config.pipeline.duplicate_threshold,
        config.pipeline.duplicate_retention(),
    );

    let dispatcher = ActionDispatcher::new(
        Arc::new(LoggingPayoutExecutor),
        Arc::new(LoggingAdjusterQueue),
        Arc::new(LoggingNotificationSender),
        Arc::new(TracingAuditSink),
    );

    Arc::new(ClaimsPipeline::new(
        CachedPolicyStore::new(policy_port, config.pipeline.policy_ttl()),
        DuplicateClaimDetector::new(Arc::new(index)),
        orchestrator,
        EnsembleEngine::default(),
        dispatcher,
        Arc::new(InMemoryOutcomeLedger::new()),
    ))
}

fn demo_policy() -> PolicySnapshot {
    let mut limits = HashMap::new();
    for claim_type in ClaimType::all() {
        limits.insert(claim_type, Money::new(Decimal::new(5000, 0), Currency::USD));
    }
    let policy = PolicySnapshot::new(
        PolicyId::new_v7(),
        PolicyStatus::Active,
        limits,
        Money::new(Decimal::new(500, 0), Currency::USD),
    );
    tracing::info!(policy_id = %policy.id, "seeded demo policy");
    policy
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM)
///
/// Enables graceful shutdown, allowing in-flight evaluations to finish
/// before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
