// [apps/server/src/main.rs]
//! Denul server entry point: loads configuration, opens the blob map,
//! boots the membership summary, and serves the protocol over TLS.

use anyhow::{Context, Result};
use clap::Parser;
use denul_blobstore::BlobStore;
use denul_protocol::Server;
use denul_server_lib::{config::Config, serve, tls};
use tokio::net::TcpListener;
use tracing::{info, instrument};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    denul_telemetry::init_tracing("denul_server");

    let config = Config::parse();
    run(config).await
}

#[instrument(skip(config))]
async fn run(config: Config) -> Result<()> {
    let db_path = config
        .db_path
        .to_str()
        .context("database path must be valid UTF-8")?;
    let blob_map = BlobStore::open(db_path).await.context("opening blob map")?;

    let server = Server::bootstrap(
        blob_map,
        config.vicbf_k,
        config.vicbf_increment_ceiling,
        config.vicbf_min_slots,
    )
    .await
    .context("bootstrapping VICBF from blob map contents")?;

    let tls_config =
        tls::load_tls_config(&config.tls_cert, &config.tls_key).context("loading TLS certificate and key")?;

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding listener on {}", config.bind))?;
    info!(bind = %config.bind, "denul server listening");

    serve(listener, tls_config, server, config.max_message_bytes).await;
    Ok(())
}
