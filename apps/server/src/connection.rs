// [apps/server/src/connection.rs]
//! Per-connection I/O: each accepted, TLS-wrapped stream gets its own
//! Tokio task that reads framed requests and forwards them to the single
//! owning task over `RequestTx`, never touching `Server` state directly.

use denul_wire::{read_message, write_message, Message};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};

/// One parsed request paired with a channel to deliver its reply on.
/// `None` on the reply side means the protocol handler silently ignored
/// the message (an unknown/reply-shaped variant used as a request).
pub type RequestEnvelope = (Message, oneshot::Sender<Option<Message>>);

/// Sending half of the owning task's request channel.
pub type RequestTx = mpsc::Sender<RequestEnvelope>;

/// Drives one connection to completion: reads messages, forwards each to
/// the owning task, writes back whatever reply (if any) comes back. Ends
/// on the first I/O, framing, or channel error.
#[instrument(skip(stream, requests, max_message_bytes))]
pub async fn drive<S>(mut stream: S, requests: RequestTx, max_message_bytes: u32)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let request = match read_message(&mut stream, max_message_bytes).await {
            Ok(message) => message,
            Err(err) => {
                debug!(%err, "connection ended on read");
                return;
            }
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        if requests.send((request, reply_tx)).await.is_err() {
            warn!("owning task's request channel is closed; dropping connection");
            return;
        }

        let reply = match reply_rx.await {
            Ok(reply) => reply,
            Err(_) => {
                warn!("owning task dropped a reply sender");
                return;
            }
        };

        if let Some(message) = reply {
            if let Err(err) = write_message(&mut stream, &message).await {
                debug!(%err, "connection ended on write");
                return;
            }
        }
    }
}
