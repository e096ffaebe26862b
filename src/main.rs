//! datagate gateway server
//!
//! Loads secrets, wires the components, and serves the webhook intake
//! endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use datagate::clients::build_http_client;
use datagate::config::GatewayConfig;
use datagate::secrets::Secrets;
use datagate::store::EncryptedStore;
use datagate::webhook::{webhook_router, AllowedRequesters, AuthorizationPolicy, DenyAll, WebhookProcessor};

/// Secure multi-channel data gateway
#[derive(Parser, Debug)]
#[command(name = "datagate")]
#[command(version)]
#[command(about = "Secure multi-channel data gateway")]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Path of the database file (overrides DATABASE_PATH)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Fail fast: the gateway never runs with partial credentials.
    let secrets = Secrets::from_env().context("refusing to start")?;

    let mut config = GatewayConfig::from_env()?;
    if let Some(db_path) = args.db_path {
        config.db_path = db_path;
    }

    let store = Arc::new(EncryptedStore::new(&config.db_path, &secrets)?);
    store.ensure_schema()?;

    let policy: Arc<dyn AuthorizationPolicy> = if config.allowed_requesters.is_empty() {
        tracing::warn!("no allowed requesters configured; denying all webhook actions");
        Arc::new(DenyAll)
    } else {
        tracing::info!(
            count = config.allowed_requesters.len(),
            "authorization allow-list configured"
        );
        Arc::new(AllowedRequesters::new(config.allowed_requesters.clone()))
    };

    let client = build_http_client(config.request_timeout)?;
    let processor = WebhookProcessor::new(&secrets, &config, store, policy, client)?;

    let app = webhook_router(Arc::new(processor));
    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;

    tracing::info!("datagate listening on {}:{}", args.host, args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
