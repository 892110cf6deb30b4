// [apps/server/src/owner.rs]
//! The single task that owns the `Server` (blob map + VICBF). Every
//! mutation of shared state happens here, one request at a time, reached
//! only through the request channel.

use crate::connection::{RequestEnvelope, RequestTx};
use denul_protocol::Server;
use tokio::sync::mpsc;

/// Bounded channel depth between connection tasks and the owning task.
const REQUEST_CHANNEL_DEPTH: usize = 256;

/// Spawns the owning task and returns the sender connection tasks use to
/// submit requests to it.
pub fn spawn(mut server: Server) -> RequestTx {
    let (tx, mut rx) = mpsc::channel::<RequestEnvelope>(REQUEST_CHANNEL_DEPTH);

    tokio::spawn(async move {
        while let Some((request, reply_tx)) = rx.recv().await {
            let reply = server.handle(request).await;
            let _ = reply_tx.send(reply);
        }
    });

    tx
}
