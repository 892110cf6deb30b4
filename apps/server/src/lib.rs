// [apps/server/src/lib.rs]
#![deny(missing_docs)]

//! Boot-time plumbing for the Denul server binary, exposed as a library
//! so integration tests can drive a full in-process instance.

/// CLI / environment configuration surface.
pub mod config;
/// Per-connection read/dispatch/write loop.
pub mod connection;
/// The single task owning `Server` state, reached via a request channel.
pub mod owner;
/// TLS server-config bootstrap from PEM files.
pub mod tls;

pub use crate::config::Config;
pub use crate::connection::{drive, RequestEnvelope, RequestTx};

use denul_protocol::Server;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::warn;

/// Accepts connections on `listener` forever, TLS-wrapping each one and
/// handing it to its own connection task. Never returns under normal
/// operation; intended to be driven inside a `tokio::spawn` by callers
/// (including tests) that want a handle to cancel it.
pub async fn serve(
    listener: TcpListener,
    tls_config: Arc<rustls::ServerConfig>,
    server: Server,
    max_message_bytes: u32,
) {
    let acceptor = TlsAcceptor::from(tls_config);
    let requests = owner::spawn(server);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(%err, "accept failed");
                continue;
            }
        };

        let acceptor = acceptor.clone();
        let requests = requests.clone();
        tokio::spawn(async move {
            match acceptor.accept(socket).await {
                Ok(tls_stream) => {
                    connection::drive(tls_stream, requests, max_message_bytes).await;
                }
                Err(err) => warn!(%err, %peer, "TLS handshake failed"),
            }
        });
    }
}
